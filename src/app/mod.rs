pub mod intro;
pub mod transition;

use std::time::Duration;

use log::{debug, info};

use crate::content::{Challenge, ContentLibrary, Language, LanguagePack};
use crate::engine::carousel::Carousel;
use crate::engine::sections::{CollapsedSections, Section};
use crate::engine::tooltip::{Bounds, TooltipPlacement, TooltipSize, Viewport};
use crate::engine::tutorial::{TourEffect, TourTimer, Tutorial, TutorialTarget};
use crate::session::Session;
use crate::session::checker::Verdict;
use crate::session::placement::{DragOrigin, DragPayload};
use intro::{Intro, IntroTimer};
use transition::{Wave, WavePhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerId {
    Tour(TourTimer),
    Wave(WavePhase),
    Intro(IntroTimer),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Tour,
    Wave,
    Intro,
}

impl TimerId {
    pub fn kind(self) -> TimerKind {
        match self {
            TimerId::Tour(_) => TimerKind::Tour,
            TimerId::Wave(_) => TimerKind::Wave,
            TimerId::Intro(_) => TimerKind::Intro,
        }
    }
}

/// Side effects requested by [`AppState::update`]. The runtime carries them
/// out and feeds results back as messages.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Schedule {
        timer: TimerId,
        epoch: u64,
        after: Duration,
    },
    CancelTimers(TimerKind),
    /// Smoothly scroll the card strip; every step arrives as
    /// [`Msg::CarouselScrolled`].
    AnimateCarousel {
        from: f64,
        to: f64,
    },
    StopCarousel,
    Measure {
        target: TutorialTarget,
        epoch: u64,
    },
    PersistTheme(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    Quit,
    Resize { width: u16, height: u16 },
    TimerFired { timer: TimerId, epoch: u64 },
    TargetMeasured { epoch: u64, bounds: Option<Bounds> },
    ToggleTheme,

    IntroInput(char),
    IntroBackspace,
    IntroContinue,

    SelectLanguage(Language),
    ToggleSection(Section),
    FocusNext,
    FocusPrev,
    Focus(Focus),
    ScrollPage(i32),

    NextCard,
    PrevCard,
    FlipCard,
    CarouselScrolled { offset: f64 },
    /// Free scroll of the card strip by a number of cells.
    NudgeCarousel(f64),

    MoveCursor(i32),
    Activate,
    PickUp(DragPayload),
    DropOn(usize),
    CancelDrag,
    Check,
    Reset,
    NextChallenge,
    SelectNote(usize),
    DismissNote,

    StartTutorial,
    TutorialNext,
    TutorialBack,
    TutorialSkip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Intro(Intro),
    Dashboard,
}

/// Which part of the dashboard receives arrows and Enter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Flashcards,
    WordBank,
    Slots,
    Notes,
}

impl Focus {
    pub const ORDER: [Focus; 4] = [Focus::Flashcards, Focus::WordBank, Focus::Slots, Focus::Notes];

    pub fn section(self) -> Section {
        match self {
            Focus::Flashcards => Section::Flashcards,
            Focus::WordBank | Focus::Slots => Section::Sentences,
            Focus::Notes => Section::Grammar,
        }
    }
}

/// Measurements the presentation layer reports back after laying out a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutMetrics {
    pub page_height: i32,
    pub card_width: f64,
}

#[derive(Clone, Debug)]
pub struct StartOptions {
    pub language: Language,
    pub dark_mode: bool,
    pub skip_intro: bool,
    pub start_tutorial: bool,
    pub tooltip_size: TooltipSize,
    pub width: u16,
    pub height: u16,
}

/// The whole view state. Every change goes through [`AppState::update`].
pub struct AppState {
    pub library: ContentLibrary,
    pub screen: Screen,
    pub dark_mode: bool,
    pub user_name: String,
    pub session: Session,
    pub carousel: Carousel,
    pub sections: CollapsedSections,
    pub wave: Wave,
    pub tutorial: Tutorial,
    pub focus: Focus,
    pub bank_cursor: usize,
    pub slot_cursor: usize,
    pub note_cursor: usize,
    pub drag: Option<DragPayload>,
    pub page_scroll: i32,
    pub width: u16,
    pub height: u16,
    pub metrics: LayoutMetrics,
    pub tooltip_size: TooltipSize,
    pub should_quit: bool,
    pending_tour: bool,
}

impl AppState {
    pub fn new(library: ContentLibrary, options: StartOptions) -> (Self, Vec<Effect>) {
        let pack = library.pack(options.language);
        let session = Session::new(pack);
        let carousel = Carousel::new(pack.vocabulary.len());

        let (screen, mut effects) = if options.skip_intro {
            (Screen::Dashboard, Vec::new())
        } else {
            let (intro, effects) = Intro::start(options.width);
            (Screen::Intro(intro), effects)
        };

        let mut state = Self {
            library,
            screen,
            dark_mode: options.dark_mode,
            user_name: String::new(),
            session,
            carousel,
            sections: CollapsedSections::default(),
            wave: Wave::default(),
            tutorial: Tutorial::default(),
            focus: Focus::Flashcards,
            bank_cursor: 0,
            slot_cursor: 0,
            note_cursor: 0,
            drag: None,
            page_scroll: 0,
            width: options.width,
            height: options.height,
            metrics: LayoutMetrics::default(),
            tooltip_size: options.tooltip_size,
            should_quit: false,
            pending_tour: false,
        };

        if options.start_tutorial {
            if state.on_dashboard() {
                effects.extend(state.update(Msg::StartTutorial));
            } else {
                state.pending_tour = true;
            }
        }
        (state, effects)
    }

    pub fn language(&self) -> Language {
        self.session.language
    }

    pub fn pack(&self) -> &LanguagePack {
        self.library.pack(self.session.language)
    }

    pub fn active_challenge(&self) -> Option<&Challenge> {
        self.session.active_challenge(self.pack())
    }

    pub fn on_dashboard(&self) -> bool {
        self.screen == Screen::Dashboard
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(i32::from(self.width), i32::from(self.height)).scrolled(0, self.page_scroll)
    }

    pub fn max_scroll(&self) -> i32 {
        (self.metrics.page_height - i32::from(self.height)).max(0)
    }

    pub fn tooltip_placement(&self) -> Option<TooltipPlacement> {
        self.tutorial.placement(self.viewport(), self.tooltip_size)
    }

    pub fn can_focus(&self, focus: Focus) -> bool {
        !self.sections.is_collapsed(focus.section())
    }

    fn card_scroll_width(&self) -> f64 {
        self.metrics.card_width * self.carousel.len() as f64
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            Msg::Resize { width, height } => self.resize(width, height),
            Msg::TimerFired { timer, epoch } => self.timer_fired(timer, epoch),
            Msg::TargetMeasured { epoch, bounds } => {
                let effects = self.tutorial.target_measured(epoch, bounds, self.viewport());
                self.apply_tour(effects)
            }
            Msg::ToggleTheme => {
                self.dark_mode = !self.dark_mode;
                vec![Effect::PersistTheme(self.dark_mode)]
            }
            Msg::IntroInput(ch) => {
                if let Screen::Intro(intro) = &mut self.screen {
                    intro.type_char(ch);
                }
                Vec::new()
            }
            Msg::IntroBackspace => {
                if let Screen::Intro(intro) = &mut self.screen {
                    intro.backspace();
                }
                Vec::new()
            }
            Msg::IntroContinue => match &mut self.screen {
                Screen::Intro(intro) => intro.advance(),
                Screen::Dashboard => Vec::new(),
            },

            // Everything below only applies to the dashboard.
            _ if !self.on_dashboard() => Vec::new(),

            Msg::SelectLanguage(language) => self.wave.begin(self.session.language, language),
            Msg::ToggleSection(section) => {
                self.sections.toggle(section);
                if !self.can_focus(self.focus) {
                    self.cycle_focus(1);
                }
                Vec::new()
            }
            Msg::FocusNext => {
                self.cycle_focus(1);
                Vec::new()
            }
            Msg::FocusPrev => {
                self.cycle_focus(-1);
                Vec::new()
            }
            Msg::Focus(focus) => {
                if self.can_focus(focus) {
                    self.focus = focus;
                }
                Vec::new()
            }
            Msg::ScrollPage(delta) => self.scroll_to(self.page_scroll + delta),

            Msg::NextCard => self.show_card(self.carousel.next_index()),
            Msg::PrevCard => self.show_card(self.carousel.prev_index()),
            Msg::FlipCard => {
                self.carousel.flip();
                Vec::new()
            }
            Msg::CarouselScrolled { offset } => {
                if self.carousel.on_scroll(offset, self.card_scroll_width()) {
                    debug!("card {} of {}", self.carousel.index() + 1, self.carousel.len());
                }
                Vec::new()
            }
            Msg::NudgeCarousel(delta) => {
                let last = self.carousel.len().saturating_sub(1);
                let max = Carousel::offset_for(last, self.metrics.card_width);
                let offset = (self.carousel.offset() + delta).clamp(0.0, max);
                self.carousel.on_scroll(offset, self.card_scroll_width());
                vec![Effect::StopCarousel]
            }

            Msg::MoveCursor(delta) => {
                self.move_cursor(delta);
                Vec::new()
            }
            Msg::Activate => {
                self.activate();
                Vec::new()
            }
            Msg::PickUp(payload) => {
                self.pick_up(payload);
                Vec::new()
            }
            Msg::DropOn(slot) => {
                self.drop_on(slot);
                Vec::new()
            }
            Msg::CancelDrag => {
                self.drag = None;
                Vec::new()
            }
            Msg::Check => {
                self.check();
                Vec::new()
            }
            Msg::Reset => {
                self.session.reset_placement();
                self.drag = None;
                Vec::new()
            }
            Msg::NextChallenge => {
                let pack = self.library.pack(self.session.language);
                self.session.next_challenge(pack);
                self.drag = None;
                self.bank_cursor = 0;
                self.slot_cursor = 0;
                Vec::new()
            }
            Msg::SelectNote(index) => {
                if index < self.session.notes.len() {
                    self.note_cursor = index;
                    self.focus = Focus::Notes;
                }
                Vec::new()
            }
            Msg::DismissNote => {
                self.dismiss_note();
                Vec::new()
            }

            Msg::StartTutorial => {
                let effects = self.tutorial.start();
                self.apply_tour(effects)
            }
            Msg::TutorialNext => {
                let effects = self.tutorial.next();
                self.apply_tour(effects)
            }
            Msg::TutorialBack => {
                let effects = self.tutorial.back();
                self.apply_tour(effects)
            }
            Msg::TutorialSkip => {
                let effects = self.tutorial.skip();
                self.apply_tour(effects)
            }
        }
    }

    /// Record the metrics of the latest layout pass.
    pub fn sync_layout(&mut self, metrics: LayoutMetrics) -> Vec<Effect> {
        if metrics == self.metrics {
            return Vec::new();
        }
        let mut effects = Vec::new();
        let width_changed = metrics.card_width != self.metrics.card_width;
        self.metrics = metrics;

        if width_changed && metrics.card_width > 0.0 {
            // Keep the same card in view at the new width.
            let offset = Carousel::offset_for(self.carousel.index(), metrics.card_width);
            self.carousel.on_scroll(offset, self.card_scroll_width());
            effects.push(Effect::StopCarousel);
        }
        self.page_scroll = self.page_scroll.clamp(0, self.max_scroll());

        let remeasure = self.tutorial.viewport_changed();
        effects.extend(self.apply_tour(remeasure));
        effects
    }

    fn resize(&mut self, width: u16, height: u16) -> Vec<Effect> {
        self.width = width;
        self.height = height;
        self.page_scroll = self.page_scroll.clamp(0, self.max_scroll());
        let effects = self.tutorial.viewport_changed();
        self.apply_tour(effects)
    }

    fn timer_fired(&mut self, timer: TimerId, epoch: u64) -> Vec<Effect> {
        match timer {
            TimerId::Tour(timer) => {
                let effects = self.tutorial.timer_fired(timer, epoch, self.viewport());
                self.apply_tour(effects)
            }
            TimerId::Wave(phase) => match self.wave.advance(phase, epoch) {
                Some(language) => self.apply_language(language),
                None => Vec::new(),
            },
            TimerId::Intro(timer) => {
                let finished = match &mut self.screen {
                    Screen::Intro(intro) => intro.timer_fired(timer, epoch),
                    Screen::Dashboard => false,
                };
                if finished {
                    self.enter_dashboard()
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn enter_dashboard(&mut self) -> Vec<Effect> {
        if let Screen::Intro(intro) = &self.screen {
            self.user_name = intro.name().to_string();
        }
        self.screen = Screen::Dashboard;
        info!("entering dashboard");
        let mut effects = vec![Effect::CancelTimers(TimerKind::Intro)];
        if std::mem::take(&mut self.pending_tour) {
            effects.extend(self.update(Msg::StartTutorial));
        }
        effects
    }

    /// Switch everything language-scoped over to `language`.
    fn apply_language(&mut self, language: Language) -> Vec<Effect> {
        let pack = self.library.pack(language);
        self.session = Session::new(pack);
        self.carousel = Carousel::new(pack.vocabulary.len());
        self.drag = None;
        self.bank_cursor = 0;
        self.slot_cursor = 0;
        self.note_cursor = 0;
        info!("switched language to {language}");
        vec![Effect::StopCarousel]
    }

    fn apply_tour(&mut self, tour_effects: Vec<TourEffect>) -> Vec<Effect> {
        let mut effects = Vec::new();
        for effect in tour_effects {
            match effect {
                TourEffect::Schedule {
                    timer,
                    epoch,
                    after,
                } => effects.push(Effect::Schedule {
                    timer: TimerId::Tour(timer),
                    epoch,
                    after,
                }),
                TourEffect::Measure { target, epoch } => {
                    effects.push(Effect::Measure { target, epoch })
                }
                TourEffect::ExpandAll => self.sections.expand_all(),
                TourEffect::ExpandSection(section) => {
                    if self.sections.expand(section) {
                        debug!("tour opened {}", section.title());
                    }
                }
                TourEffect::Reveal(_) => effects.extend(self.reveal_tour_target()),
            }
        }
        effects
    }

    /// Scroll so the resolved tour target sits in the middle of the screen.
    fn reveal_tour_target(&mut self) -> Vec<Effect> {
        let Some(bounds) = self.tutorial.lookup().and_then(|l| l.bounds()) else {
            return Vec::new();
        };
        let target = self.page_scroll + bounds.center_y() - i32::from(self.height) / 2;
        self.scroll_to(target)
    }

    fn scroll_to(&mut self, y: i32) -> Vec<Effect> {
        let y = y.clamp(0, self.max_scroll());
        if y == self.page_scroll {
            return Vec::new();
        }
        self.page_scroll = y;
        let effects = self.tutorial.viewport_changed();
        self.apply_tour(effects)
    }

    fn show_card(&self, index: Option<usize>) -> Vec<Effect> {
        match index {
            Some(index) => vec![Effect::AnimateCarousel {
                from: self.carousel.offset(),
                to: Carousel::offset_for(index, self.metrics.card_width),
            }],
            None => Vec::new(),
        }
    }

    fn cycle_focus(&mut self, direction: i32) {
        let len = Focus::ORDER.len() as i32;
        let current = Focus::ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0) as i32;
        for step in 1..=len {
            let candidate = Focus::ORDER[(current + direction * step).rem_euclid(len) as usize];
            if self.can_focus(candidate) {
                self.focus = candidate;
                return;
            }
        }
    }

    fn move_cursor(&mut self, delta: i32) {
        let wrap = |cursor: usize, len: usize| -> usize {
            if len == 0 {
                0
            } else {
                (cursor as i32 + delta).rem_euclid(len as i32) as usize
            }
        };
        match self.focus {
            Focus::Flashcards => {}
            Focus::WordBank => {
                let len = self.active_challenge().map_or(0, |c| c.word_bank.len());
                self.bank_cursor = wrap(self.bank_cursor, len);
            }
            Focus::Slots => {
                self.slot_cursor = wrap(self.slot_cursor, self.session.challenge.placement.len());
            }
            Focus::Notes => {
                let last = self.session.notes.len().saturating_sub(1) as i32;
                self.note_cursor = (self.note_cursor as i32 + delta).clamp(0, last) as usize;
            }
        }
    }

    fn activate(&mut self) {
        match self.focus {
            Focus::Flashcards => self.carousel.flip(),
            Focus::WordBank => {
                let word = self
                    .active_challenge()
                    .and_then(|c| c.word_bank.get(self.bank_cursor))
                    .cloned();
                if let Some(word) = word {
                    self.pick_up(DragPayload::from_bank(&word));
                }
            }
            Focus::Slots => {
                if self.drag.is_some() {
                    self.drop_on(self.slot_cursor);
                } else if let Some(word) = self.session.challenge.placement.get(self.slot_cursor) {
                    let payload = DragPayload::from_slot(word, self.slot_cursor);
                    self.pick_up(payload);
                }
            }
            Focus::Notes => {}
        }
    }

    fn pick_up(&mut self, payload: DragPayload) {
        if !self.session.challenge.can_drag() {
            return;
        }
        match payload.origin {
            DragOrigin::WordBank => {
                self.focus = Focus::Slots;
                let placement = &self.session.challenge.placement;
                if let Some(empty) = (0..placement.len()).find(|&i| placement.get(i).is_none()) {
                    self.slot_cursor = empty;
                }
            }
            DragOrigin::Slot(slot) => {
                self.focus = Focus::Slots;
                self.slot_cursor = slot;
            }
        }
        self.drag = Some(payload);
    }

    fn drop_on(&mut self, slot: usize) {
        let Some(payload) = self.drag.take() else {
            return;
        };
        if self.session.drop_word(&payload, slot) {
            debug!("placed {:?} in slot {slot}", payload.word);
            self.slot_cursor = slot;
        }
        if payload.origin == DragOrigin::WordBank && !self.session.challenge.placement.is_filled() {
            self.focus = Focus::WordBank;
        }
    }

    fn check(&mut self) {
        if self.session.challenge.complete {
            return;
        }
        let pack = self.library.pack(self.session.language);
        let verdict = self.session.check(pack);
        self.drag = None;
        if verdict == Verdict::Incorrect {
            self.note_cursor = 0;
        }
    }

    fn dismiss_note(&mut self) {
        let Some(id) = self.session.notes.get(self.note_cursor).map(|n| n.id.clone()) else {
            return;
        };
        self.session.notes.dismiss(&id);
        self.note_cursor = self
            .note_cursor
            .min(self.session.notes.len().saturating_sub(1));
    }
}
