use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::app::{AppState, Effect, Msg, TimerId, TimerKind};
use crate::engine::tutorial::TargetGeometry;
use crate::store::PreferenceStore;

pub const CAROUSEL_SCROLL: Duration = Duration::from_millis(300);

struct PendingTimer {
    due: Instant,
    timer: TimerId,
    epoch: u64,
}

/// One-shot timers owned by the main loop.
#[derive(Default)]
pub struct Scheduler {
    pending: Vec<PendingTimer>,
}

impl Scheduler {
    pub fn schedule(&mut self, now: Instant, timer: TimerId, epoch: u64, after: Duration) {
        self.pending.push(PendingTimer {
            due: now + after,
            timer,
            epoch,
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.pending.retain(|p| p.timer.kind() != kind);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every timer due at `now`, earliest first.
    pub fn due(&mut self, now: Instant) -> Vec<(TimerId, u64)> {
        let mut fired: Vec<PendingTimer> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                fired.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        fired.sort_by_key(|p| p.due);
        fired.into_iter().map(|p| (p.timer, p.epoch)).collect()
    }
}

/// Ease-out scroll of the card strip.
#[derive(Clone, Copy, Debug)]
pub struct CarouselAnimation {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

impl CarouselAnimation {
    pub fn new(from: f64, to: f64, now: Instant) -> Self {
        Self {
            from,
            to,
            started: now,
            duration: CAROUSEL_SCROLL,
        }
    }

    fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn offset_at(&self, now: Instant) -> f64 {
        let t = self.progress(now);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Carries out effects returned by [`AppState::update`] and feeds the
/// resulting messages back in.
pub struct Runtime {
    scheduler: Scheduler,
    animation: Option<CarouselAnimation>,
    store: Option<PreferenceStore>,
}

impl Runtime {
    pub fn new(store: Option<PreferenceStore>) -> Self {
        Self {
            scheduler: Scheduler::default(),
            animation: None,
            store,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn dispatch<F, G>(&mut self, state: &mut AppState, msg: Msg, now: Instant, geometry: &F)
    where
        F: Fn(&AppState) -> G,
        G: TargetGeometry,
    {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let effects = state.update(msg);
            self.execute(state, effects, now, geometry, &mut queue);
        }
    }

    /// Run effects produced outside of `dispatch`, e.g. at startup.
    pub fn run_effects<F, G>(&mut self, state: &mut AppState, effects: Vec<Effect>, now: Instant, geometry: &F)
    where
        F: Fn(&AppState) -> G,
        G: TargetGeometry,
    {
        let mut queue = VecDeque::new();
        self.execute(state, effects, now, geometry, &mut queue);
        while let Some(msg) = queue.pop_front() {
            let effects = state.update(msg);
            self.execute(state, effects, now, geometry, &mut queue);
        }
    }

    /// Fire due timers and step the carousel animation. Returns true when
    /// anything happened.
    pub fn tick<F, G>(&mut self, state: &mut AppState, now: Instant, geometry: &F) -> bool
    where
        F: Fn(&AppState) -> G,
        G: TargetGeometry,
    {
        let due = self.scheduler.due(now);
        let mut changed = !due.is_empty();
        for (timer, epoch) in due {
            self.dispatch(state, Msg::TimerFired { timer, epoch }, now, geometry);
        }

        if let Some(animation) = self.animation {
            let offset = animation.offset_at(now);
            if animation.is_finished(now) {
                self.animation = None;
            }
            self.dispatch(state, Msg::CarouselScrolled { offset }, now, geometry);
            changed = true;
        }
        changed
    }

    fn execute<F, G>(
        &mut self,
        state: &AppState,
        effects: Vec<Effect>,
        now: Instant,
        geometry: &F,
        queue: &mut VecDeque<Msg>,
    ) where
        F: Fn(&AppState) -> G,
        G: TargetGeometry,
    {
        for effect in effects {
            match effect {
                Effect::Schedule {
                    timer,
                    epoch,
                    after,
                } => self.scheduler.schedule(now, timer, epoch, after),
                Effect::CancelTimers(kind) => self.scheduler.cancel(kind),
                Effect::AnimateCarousel { from, to } => {
                    self.animation = Some(CarouselAnimation::new(from, to, now));
                }
                Effect::StopCarousel => self.animation = None,
                Effect::Measure { target, epoch } => {
                    let bounds = geometry(state).target_bounds(target);
                    debug!("measured {target:?}: {bounds:?}");
                    queue.push_back(Msg::TargetMeasured { epoch, bounds });
                }
                Effect::PersistTheme(dark) => {
                    if let Some(store) = &self.store
                        && let Err(err) = store.save_dark_mode(dark)
                    {
                        warn!("could not save theme preference: {err:#}");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::StartOptions;
    use crate::content::{ContentLibrary, Language};
    use crate::engine::tooltip::{Bounds, TooltipSize, fallback_target};
    use crate::engine::tutorial::{
        MAX_LOOKUP_ATTEMPTS, TargetLookup, TourTimer, TutorialState, TutorialTarget,
    };
    use tempfile::TempDir;

    struct FixedGeometry(Option<Bounds>);

    impl TargetGeometry for FixedGeometry {
        fn target_bounds(&self, _target: TutorialTarget) -> Option<Bounds> {
            self.0
        }
    }

    fn state() -> AppState {
        let library = ContentLibrary::load_seeded(Some(3)).unwrap();
        let (state, _) = AppState::new(
            library,
            StartOptions {
                language: Language::Spanish,
                dark_mode: false,
                skip_intro: true,
                start_tutorial: false,
                tooltip_size: TooltipSize::default(),
                width: 100,
                height: 30,
            },
        );
        state
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_scheduler_fires_in_due_order() {
        let start = Instant::now();
        let mut s = Scheduler::default();
        s.schedule(start, TimerId::Tour(TourTimer::Deadline), 1, ms(300));
        s.schedule(start, TimerId::Tour(TourTimer::Lookup), 1, ms(100));
        s.schedule(start, TimerId::Tour(TourTimer::Banner), 1, ms(900));

        assert!(s.due(start).is_empty());
        let fired = s.due(start + ms(400));
        assert_eq!(
            fired,
            vec![
                (TimerId::Tour(TourTimer::Lookup), 1),
                (TimerId::Tour(TourTimer::Deadline), 1)
            ]
        );
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_scheduler_cancel_by_kind() {
        let start = Instant::now();
        let mut s = Scheduler::default();
        s.schedule(start, TimerId::Tour(TourTimer::Lookup), 1, ms(10));
        s.schedule(
            start,
            TimerId::Intro(crate::app::intro::IntroTimer::Exit),
            1,
            ms(10),
        );
        s.cancel(TimerKind::Intro);
        assert_eq!(s.len(), 1);
        s.cancel(TimerKind::Tour);
        assert!(s.is_empty());
    }

    #[test]
    fn test_animation_eases_out_and_finishes() {
        let start = Instant::now();
        let a = CarouselAnimation::new(0.0, 100.0, start);
        assert_eq!(a.offset_at(start), 0.0);
        let half = a.offset_at(start + CAROUSEL_SCROLL / 2);
        assert!(half > 50.0 && half < 100.0);
        assert!(!a.is_finished(start + ms(100)));
        assert_eq!(a.offset_at(start + CAROUSEL_SCROLL), 100.0);
        assert!(a.is_finished(start + CAROUSEL_SCROLL));
    }

    #[test]
    fn test_tour_falls_back_when_target_never_lays_out() {
        let mut state = state();
        let mut runtime = Runtime::new(None);
        let geometry = |_: &AppState| FixedGeometry(Some(Bounds::new(4, 4, 0, 0)));
        let start = Instant::now();
        runtime.dispatch(&mut state, Msg::StartTutorial, start, &geometry);

        // First lookup at 200ms, then retries every 150ms.
        let mut now = start;
        for _ in 0..MAX_LOOKUP_ATTEMPTS {
            now += ms(150);
            runtime.tick(&mut state, now, &geometry);
            if matches!(state.tutorial.lookup(), Some(TargetLookup::Fallback(_))) {
                break;
            }
        }
        // Whichever comes first, retries or the 2s deadline, the tour settles
        // on the fallback target.
        runtime.tick(&mut state, start + ms(2000), &geometry);
        assert_eq!(
            state.tutorial.lookup(),
            Some(TargetLookup::Fallback(fallback_target(state.viewport())))
        );
    }

    #[test]
    fn test_tour_resolves_and_banner_clears() {
        let mut state = state();
        let mut runtime = Runtime::new(None);
        let geometry = |_: &AppState| FixedGeometry(Some(Bounds::new(0, 0, 100, 3)));
        let start = Instant::now();
        runtime.dispatch(&mut state, Msg::StartTutorial, start, &geometry);
        runtime.tick(&mut state, start + ms(200), &geometry);
        assert!(matches!(
            state.tutorial.lookup(),
            Some(TargetLookup::Resolved(_))
        ));

        let later = start + ms(300);
        runtime.dispatch(&mut state, Msg::TutorialSkip, later, &geometry);
        assert_eq!(state.tutorial.state(), TutorialState::Completed);
        // The first step's deadline is stale and must not matter.
        runtime.tick(&mut state, start + ms(2000), &geometry);
        assert_eq!(state.tutorial.state(), TutorialState::Completed);
        runtime.tick(&mut state, later + ms(2000), &geometry);
        assert_eq!(state.tutorial.state(), TutorialState::Inactive);
    }

    #[test]
    fn test_carousel_animation_drives_index() {
        let mut state = state();
        state.sync_layout(crate::app::LayoutMetrics {
            page_height: 60,
            card_width: 30.0,
        });
        let mut runtime = Runtime::new(None);
        let geometry = |_: &AppState| FixedGeometry(None);
        let start = Instant::now();
        runtime.dispatch(&mut state, Msg::NextCard, start, &geometry);
        assert!(runtime.is_animating());
        assert_eq!(state.carousel.index(), 0);

        runtime.tick(&mut state, start + CAROUSEL_SCROLL, &geometry);
        assert!(!runtime.is_animating());
        assert_eq!(state.carousel.index(), 1);
        assert_eq!(state.carousel.offset(), 30.0);
    }

    #[test]
    fn test_theme_toggle_is_written_through() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut state = state();
        let mut runtime = Runtime::new(Some(store));
        let geometry = |_: &AppState| FixedGeometry(None);
        runtime.dispatch(&mut state, Msg::ToggleTheme, Instant::now(), &geometry);

        let reread = PreferenceStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert!(reread.load_dark_mode());
    }
}
