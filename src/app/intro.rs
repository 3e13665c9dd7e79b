use std::time::Duration;

use crate::app::{Effect, TimerId};

pub const LOGIN_DELAY: Duration = Duration::from_millis(1500);
pub const EXIT_DELAY: Duration = Duration::from_millis(500);
/// Narrower terminals skip the welcome splash.
pub const WIDE_MIN_WIDTH: u16 = 80;
pub const NAME_MAX_LEN: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntroStage {
    Welcome,
    Login,
    Exiting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntroTimer {
    ShowLogin,
    Exit,
}

/// Sign-in screen shown before the dashboard. Nothing is authenticated; the
/// name only personalises the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Intro {
    stage: IntroStage,
    name: String,
    epoch: u64,
}

impl Intro {
    pub fn start(width: u16) -> (Self, Vec<Effect>) {
        if width < WIDE_MIN_WIDTH {
            let intro = Self {
                stage: IntroStage::Login,
                name: String::new(),
                epoch: 1,
            };
            return (intro, Vec::new());
        }
        let intro = Self {
            stage: IntroStage::Welcome,
            name: String::new(),
            epoch: 1,
        };
        let effects = vec![Effect::Schedule {
            timer: TimerId::Intro(IntroTimer::ShowLogin),
            epoch: intro.epoch,
            after: LOGIN_DELAY,
        }];
        (intro, effects)
    }

    pub fn stage(&self) -> IntroStage {
        self.stage
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true once the exit delay has elapsed and the dashboard
    /// should take over.
    pub fn timer_fired(&mut self, timer: IntroTimer, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match (timer, self.stage) {
            (IntroTimer::ShowLogin, IntroStage::Welcome) => {
                self.stage = IntroStage::Login;
                false
            }
            (IntroTimer::Exit, IntroStage::Exiting) => true,
            _ => false,
        }
    }

    /// Enter: skip the splash, or leave the login form.
    pub fn advance(&mut self) -> Vec<Effect> {
        match self.stage {
            IntroStage::Welcome => {
                self.stage = IntroStage::Login;
                Vec::new()
            }
            IntroStage::Login => {
                self.stage = IntroStage::Exiting;
                self.name = self.name.trim().to_string();
                vec![Effect::Schedule {
                    timer: TimerId::Intro(IntroTimer::Exit),
                    epoch: self.epoch,
                    after: EXIT_DELAY,
                }]
            }
            IntroStage::Exiting => Vec::new(),
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if self.stage == IntroStage::Login
            && !ch.is_control()
            && self.name.chars().count() < NAME_MAX_LEN
        {
            self.name.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.stage == IntroStage::Login {
            self.name.pop();
        }
    }
}
