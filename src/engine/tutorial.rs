use std::time::Duration;

use log::debug;

use crate::engine::sections::Section;
use crate::engine::tooltip::{
    Bounds, TooltipPlacement, TooltipSize, Viewport, fallback_target, place_tooltip,
};

pub const FIRST_LOOKUP_DELAY: Duration = Duration::from_millis(200);
pub const RETRY_DELAY: Duration = Duration::from_millis(150);
pub const MAX_LOOKUP_ATTEMPTS: u32 = 10;
pub const LOOKUP_DEADLINE: Duration = Duration::from_millis(2000);
pub const BANNER_DURATION: Duration = Duration::from_millis(2000);

/// A dashboard region the tour can point at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TutorialTarget {
    Header,
    LanguageBar,
    Flashcards,
    SentenceBuilder,
    ProgressContent,
    GrammarContent,
}

pub struct TutorialStep {
    pub title: &'static str,
    pub content: &'static str,
    pub target: TutorialTarget,
    /// Section that must be open for the target to be visible.
    pub section: Option<Section>,
}

pub const STEPS: [TutorialStep; 6] = [
    TutorialStep {
        title: "Welcome to LingoDeck!",
        content: "This short tour shows the features that help you learn Spanish, French, Italian and Portuguese.",
        target: TutorialTarget::Header,
        section: None,
    },
    TutorialStep {
        title: "Switch Languages",
        content: "Press 1-4 to switch language. Vocabulary and exercises change and your session starts fresh.",
        target: TutorialTarget::LanguageBar,
        section: None,
    },
    TutorialStep {
        title: "Interactive Flashcards",
        content: "Your vocabulary cards. Space flips a card to its translation, arrows browse the deck.",
        target: TutorialTarget::Flashcards,
        section: Some(Section::Flashcards),
    },
    TutorialStep {
        title: "Sentence Builder",
        content: "Pick words from the Word Bank with Enter and drop them into the slots to build the sentence.",
        target: TutorialTarget::SentenceBuilder,
        section: Some(Section::Sentences),
    },
    TutorialStep {
        title: "Track Your Progress",
        content: "Words learned, sentences completed and your accuracy, updated after every check.",
        target: TutorialTarget::ProgressContent,
        section: Some(Section::Progress),
    },
    TutorialStep {
        title: "Get Grammar Help",
        content: "Wrong answers bring up a grammar tip here. Dismiss tips once you have them down.",
        target: TutorialTarget::GrammarContent,
        section: Some(Section::Grammar),
    },
];

pub const LAST_STEP: usize = STEPS.len() - 1;

/// Capability supplied by the presentation layer: where a target currently
/// sits on screen, or `None` if it is not laid out yet.
pub trait TargetGeometry {
    fn target_bounds(&self, target: TutorialTarget) -> Option<Bounds>;
}

/// Progress of locating the current step's target. Bounds are in viewport
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetLookup {
    Pending { attempts: u32 },
    Resolved(Bounds),
    Fallback(Bounds),
}

impl TargetLookup {
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            TargetLookup::Pending { .. } => None,
            TargetLookup::Resolved(b) | TargetLookup::Fallback(b) => Some(*b),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TutorialState {
    #[default]
    Inactive,
    Active {
        step: usize,
        lookup: TargetLookup,
    },
    /// Tour just ended; the completion banner is showing.
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TourTimer {
    Lookup,
    Deadline,
    Banner,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TourEffect {
    Schedule {
        timer: TourTimer,
        epoch: u64,
        after: Duration,
    },
    Measure {
        target: TutorialTarget,
        epoch: u64,
    },
    ExpandAll,
    ExpandSection(Section),
    /// Scroll the page so the target is centered.
    Reveal(TutorialTarget),
}

/// The guided tour. Every step entry and every finish bumps the epoch, so
/// timers and measurements issued for an earlier step are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tutorial {
    state: TutorialState,
    epoch: u64,
}

impl Tutorial {
    pub fn state(&self) -> TutorialState {
        self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TutorialState::Active { .. })
    }

    pub fn banner_visible(&self) -> bool {
        self.state == TutorialState::Completed
    }

    pub fn step(&self) -> Option<usize> {
        match self.state {
            TutorialState::Active { step, .. } => Some(step),
            _ => None,
        }
    }

    pub fn current_step(&self) -> Option<&'static TutorialStep> {
        self.step().map(|s| &STEPS[s])
    }

    pub fn lookup(&self) -> Option<TargetLookup> {
        match self.state {
            TutorialState::Active { lookup, .. } => Some(lookup),
            _ => None,
        }
    }

    /// Tooltip position for the current step, once its target is known.
    pub fn placement(&self, viewport: Viewport, size: TooltipSize) -> Option<TooltipPlacement> {
        let bounds = self.lookup()?.bounds()?;
        Some(place_tooltip(bounds, viewport, size))
    }

    pub fn start(&mut self) -> Vec<TourEffect> {
        let mut effects = vec![TourEffect::ExpandAll];
        effects.extend(self.enter(0));
        effects
    }

    pub fn next(&mut self) -> Vec<TourEffect> {
        match self.state {
            TutorialState::Active { step, .. } if step < LAST_STEP => self.enter(step + 1),
            TutorialState::Active { .. } => self.finish(),
            _ => Vec::new(),
        }
    }

    pub fn back(&mut self) -> Vec<TourEffect> {
        match self.state {
            TutorialState::Active { step, .. } if step > 0 => self.enter(step - 1),
            _ => Vec::new(),
        }
    }

    /// End the tour from any step and show the completion banner.
    pub fn finish(&mut self) -> Vec<TourEffect> {
        if !self.is_active() {
            return Vec::new();
        }
        self.epoch += 1;
        self.state = TutorialState::Completed;
        debug!("tutorial finished");
        vec![TourEffect::Schedule {
            timer: TourTimer::Banner,
            epoch: self.epoch,
            after: BANNER_DURATION,
        }]
    }

    /// Close the tour early. Same outcome as finishing.
    pub fn skip(&mut self) -> Vec<TourEffect> {
        self.finish()
    }

    pub fn timer_fired(&mut self, timer: TourTimer, epoch: u64, viewport: Viewport) -> Vec<TourEffect> {
        if epoch != self.epoch {
            return Vec::new();
        }
        match (timer, self.state) {
            (TourTimer::Lookup, TutorialState::Active { step, lookup: TargetLookup::Pending { .. } }) => {
                vec![TourEffect::Measure {
                    target: STEPS[step].target,
                    epoch,
                }]
            }
            (TourTimer::Deadline, TutorialState::Active { step, lookup: TargetLookup::Pending { .. } }) => {
                debug!("tutorial step {step}: deadline hit, using fallback target");
                self.state = TutorialState::Active {
                    step,
                    lookup: TargetLookup::Fallback(fallback_target(viewport)),
                };
                Vec::new()
            }
            (TourTimer::Banner, TutorialState::Completed) => {
                self.state = TutorialState::Inactive;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    pub fn target_measured(
        &mut self,
        epoch: u64,
        bounds: Option<Bounds>,
        viewport: Viewport,
    ) -> Vec<TourEffect> {
        if epoch != self.epoch {
            return Vec::new();
        }
        let TutorialState::Active { step, lookup } = self.state else {
            return Vec::new();
        };
        let bounds = bounds.filter(|b| !b.is_empty());

        let (lookup, effects) = match (lookup, bounds) {
            (TargetLookup::Pending { .. }, Some(b)) => (
                TargetLookup::Resolved(b),
                vec![TourEffect::Reveal(STEPS[step].target)],
            ),
            (TargetLookup::Pending { attempts }, None) => {
                let attempts = attempts + 1;
                if attempts >= MAX_LOOKUP_ATTEMPTS {
                    debug!("tutorial step {step}: target never resolved, using fallback");
                    (TargetLookup::Fallback(fallback_target(viewport)), Vec::new())
                } else {
                    (
                        TargetLookup::Pending { attempts },
                        vec![TourEffect::Schedule {
                            timer: TourTimer::Lookup,
                            epoch,
                            after: RETRY_DELAY,
                        }],
                    )
                }
            }
            (_, Some(b)) => (TargetLookup::Resolved(b), Vec::new()),
            (current, None) => (current, Vec::new()),
        };
        self.state = TutorialState::Active { step, lookup };
        effects
    }

    /// The page scrolled or the terminal resized: re-measure a visible target.
    pub fn viewport_changed(&self) -> Vec<TourEffect> {
        match self.state {
            TutorialState::Active { step, lookup } if lookup.bounds().is_some() => {
                vec![TourEffect::Measure {
                    target: STEPS[step].target,
                    epoch: self.epoch,
                }]
            }
            _ => Vec::new(),
        }
    }

    fn enter(&mut self, step: usize) -> Vec<TourEffect> {
        self.epoch += 1;
        self.state = TutorialState::Active {
            step,
            lookup: TargetLookup::Pending { attempts: 0 },
        };
        debug!("tutorial step {step} (epoch {})", self.epoch);

        let mut effects = Vec::with_capacity(3);
        if let Some(section) = STEPS[step].section {
            effects.push(TourEffect::ExpandSection(section));
        }
        effects.push(TourEffect::Schedule {
            timer: TourTimer::Lookup,
            epoch: self.epoch,
            after: FIRST_LOOKUP_DELAY,
        });
        effects.push(TourEffect::Schedule {
            timer: TourTimer::Deadline,
            epoch: self.epoch,
            after: LOOKUP_DEADLINE,
        });
        effects
    }
}
