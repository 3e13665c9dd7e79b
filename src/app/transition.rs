use std::time::Duration;

use log::debug;

use crate::app::{Effect, TimerId};
use crate::content::Language;

pub const PEAK_AFTER: Duration = Duration::from_millis(50);
pub const FALL_AFTER: Duration = Duration::from_millis(1300);
pub const DONE_AFTER: Duration = Duration::from_millis(2000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    Peak,
    Fall,
    Done,
}

/// Wave shown while switching language. The new language takes effect at
/// the peak, while the screen is covered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LanguageTransition {
    #[default]
    Idle,
    Rising(Language),
    Peaked(Language),
    Falling(Language),
}

impl LanguageTransition {
    pub fn target(self) -> Option<Language> {
        match self {
            LanguageTransition::Idle => None,
            LanguageTransition::Rising(l)
            | LanguageTransition::Peaked(l)
            | LanguageTransition::Falling(l) => Some(l),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Wave {
    state: LanguageTransition,
    epoch: u64,
}

impl Wave {
    pub fn state(&self) -> LanguageTransition {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != LanguageTransition::Idle
    }

    /// Start switching from `current` to `to`. Ignored while a wave runs or
    /// when `to` is already selected.
    pub fn begin(&mut self, current: Language, to: Language) -> Vec<Effect> {
        if self.is_running() || current == to {
            return Vec::new();
        }
        self.epoch += 1;
        self.state = LanguageTransition::Rising(to);
        debug!("language wave {current} -> {to}");
        [
            (WavePhase::Peak, PEAK_AFTER),
            (WavePhase::Fall, FALL_AFTER),
            (WavePhase::Done, DONE_AFTER),
        ]
        .into_iter()
        .map(|(phase, after)| Effect::Schedule {
            timer: TimerId::Wave(phase),
            epoch: self.epoch,
            after,
        })
        .collect()
    }

    /// Advance on a phase timer. Returns the language to apply, exactly once
    /// per wave.
    pub fn advance(&mut self, phase: WavePhase, epoch: u64) -> Option<Language> {
        if epoch != self.epoch {
            return None;
        }
        match (phase, self.state) {
            (WavePhase::Peak, LanguageTransition::Rising(to)) => {
                self.state = LanguageTransition::Peaked(to);
                Some(to)
            }
            (WavePhase::Fall, LanguageTransition::Peaked(to)) => {
                self.state = LanguageTransition::Falling(to);
                None
            }
            (WavePhase::Done, LanguageTransition::Rising(to)) => {
                self.state = LanguageTransition::Idle;
                Some(to)
            }
            (WavePhase::Done, _) => {
                self.state = LanguageTransition::Idle;
                None
            }
            _ => None,
        }
    }
}
