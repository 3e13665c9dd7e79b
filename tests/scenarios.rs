use std::time::{Duration, Instant};

use lingodeck::app::intro::IntroStage;
use lingodeck::app::transition::LanguageTransition;
use lingodeck::app::{AppState, Msg, Screen, StartOptions};
use lingodeck::content::{ContentLibrary, Language};
use lingodeck::engine::sections::Section;
use lingodeck::engine::tooltip::TooltipSize;
use lingodeck::engine::tutorial::{LAST_STEP, TargetLookup, TutorialState};
use lingodeck::runtime::Runtime;
use lingodeck::session::checker::Verdict;
use lingodeck::session::placement::DragPayload;
use lingodeck::ui::layout::DashboardLayout;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn start(skip_intro: bool, start_tutorial: bool) -> (AppState, Runtime, Instant) {
    let library = ContentLibrary::load_seeded(Some(17)).unwrap();
    let (mut state, effects) = AppState::new(
        library,
        StartOptions {
            language: Language::Spanish,
            dark_mode: false,
            skip_intro,
            start_tutorial,
            tooltip_size: TooltipSize::default(),
            width: 100,
            height: 30,
        },
    );
    let mut runtime = Runtime::new(None);
    let now = Instant::now();
    runtime.run_effects(&mut state, effects, now, &DashboardLayout::compute);
    settle(&mut state, &mut runtime, now);
    (state, runtime, now)
}

/// One pass of what the main loop does before drawing.
fn settle(state: &mut AppState, runtime: &mut Runtime, now: Instant) {
    let metrics = DashboardLayout::compute(state).metrics();
    let effects = state.sync_layout(metrics);
    runtime.run_effects(state, effects, now, &DashboardLayout::compute);
}

fn send(state: &mut AppState, runtime: &mut Runtime, msg: Msg, now: Instant) {
    runtime.dispatch(state, msg, now, &DashboardLayout::compute);
    settle(state, runtime, now);
}

fn tick(state: &mut AppState, runtime: &mut Runtime, now: Instant) {
    runtime.tick(state, now, &DashboardLayout::compute);
    settle(state, runtime, now);
}

fn place(state: &mut AppState, runtime: &mut Runtime, words: &[&str], now: Instant) {
    for (slot, word) in words.iter().enumerate() {
        send(state, runtime, Msg::PickUp(DragPayload::from_bank(word)), now);
        send(state, runtime, Msg::DropOn(slot), now);
    }
}

#[test]
fn correct_sentence_completes_the_challenge() {
    let (mut state, mut rt, now) = start(true, false);
    place(&mut state, &mut rt, &["el", "gato", "bebe", "agua"], now);
    send(&mut state, &mut rt, Msg::Check, now);

    let challenge = &state.session.challenge;
    assert_eq!(challenge.verdict, Some(Verdict::Correct));
    assert!(challenge.complete);
    let progress = &state.session.progress;
    assert!(progress.completed_challenges.contains("es_s1"));
    for word in ["el", "gato", "bebe", "agua"] {
        assert!(progress.learned_words.contains(word));
    }
    assert_eq!((progress.attempts, progress.correct_attempts), (1, 1));
    assert_eq!(progress.accuracy(), 100);

    // Completed challenges refuse further drags.
    send(&mut state, &mut rt, Msg::PickUp(DragPayload::from_bank("sol")), now);
    assert!(state.drag.is_none());
}

#[test]
fn wrong_article_surfaces_the_gender_tip_once() {
    let (mut state, mut rt, now) = start(true, false);
    place(&mut state, &mut rt, &["la", "gato", "bebe", "agua"], now);
    send(&mut state, &mut rt, Msg::Check, now);

    assert_eq!(state.session.challenge.verdict, Some(Verdict::Incorrect));
    let progress = &state.session.progress;
    assert_eq!((progress.attempts, progress.correct_attempts), (1, 0));
    assert_eq!(progress.accuracy(), 0);
    assert_eq!(state.session.notes.len(), 1);
    assert_eq!(state.session.notes.get(0).unwrap().id, "es_gender");

    send(&mut state, &mut rt, Msg::Check, now);
    assert_eq!(state.session.notes.len(), 1);
    assert_eq!(state.session.progress.attempts, 2);

    // Fixing the article and checking again succeeds: accuracy 1 of 3.
    send(&mut state, &mut rt, Msg::PickUp(DragPayload::from_bank("el")), now);
    send(&mut state, &mut rt, Msg::DropOn(0), now);
    assert_eq!(state.session.challenge.verdict, None);
    send(&mut state, &mut rt, Msg::Check, now);
    assert_eq!(state.session.progress.accuracy(), 33);
}

#[test]
fn reset_twice_equals_reset_once() {
    let (mut state, mut rt, now) = start(true, false);
    place(&mut state, &mut rt, &["el", "gato"], now);
    send(&mut state, &mut rt, Msg::Reset, now);
    let once = state.session.challenge.clone();
    send(&mut state, &mut rt, Msg::Reset, now);
    assert_eq!(state.session.challenge, once);
    assert!(once.placement.slots().iter().all(Option::is_none));
    assert_eq!(once.verdict, None);
}

#[test]
fn dragging_between_filled_slots_swaps_them() {
    let (mut state, mut rt, now) = start(true, false);
    place(&mut state, &mut rt, &["el", "gato", "bebe", "agua"], now);
    send(&mut state, &mut rt, Msg::PickUp(DragPayload::from_slot("gato", 1)), now);
    send(&mut state, &mut rt, Msg::DropOn(3), now);

    let placement = &state.session.challenge.placement;
    assert_eq!(placement.get(0), Some("el"));
    assert_eq!(placement.get(1), Some("agua"));
    assert_eq!(placement.get(2), Some("bebe"));
    assert_eq!(placement.get(3), Some("gato"));
}

#[test]
fn language_switch_resets_at_the_wave_peak() {
    let (mut state, mut rt, now) = start(true, false);
    place(&mut state, &mut rt, &["la", "gato", "bebe", "agua"], now);
    send(&mut state, &mut rt, Msg::Check, now);
    send(&mut state, &mut rt, Msg::NextCard, now);
    tick(&mut state, &mut rt, now + ms(300));
    assert_eq!(state.carousel.index(), 1);

    send(&mut state, &mut rt, Msg::SelectLanguage(Language::French), now + ms(400));
    assert_eq!(state.wave.state(), LanguageTransition::Rising(Language::French));
    assert_eq!(state.language(), Language::Spanish);

    // A second selection while the wave runs is ignored.
    send(&mut state, &mut rt, Msg::SelectLanguage(Language::Italian), now + ms(420));
    tick(&mut state, &mut rt, now + ms(450));

    assert_eq!(state.language(), Language::French);
    assert_eq!(state.carousel.index(), 0);
    let progress = &state.session.progress;
    assert!(progress.learned_words.is_empty());
    assert!(progress.completed_challenges.is_empty());
    assert_eq!((progress.attempts, progress.correct_attempts), (0, 0));
    assert!(state.session.notes.is_empty());
    assert_eq!(state.session.challenge.index, 0);

    tick(&mut state, &mut rt, now + ms(2400));
    assert_eq!(state.wave.state(), LanguageTransition::Idle);
    assert_eq!(state.language(), Language::French);
}

#[test]
fn carousel_wraps_in_both_directions() {
    let (mut state, mut rt, now) = start(true, false);
    let last = state.carousel.len() - 1;

    send(&mut state, &mut rt, Msg::PrevCard, now);
    tick(&mut state, &mut rt, now + ms(300));
    assert_eq!(state.carousel.index(), last);

    send(&mut state, &mut rt, Msg::NextCard, now + ms(400));
    tick(&mut state, &mut rt, now + ms(700));
    assert_eq!(state.carousel.index(), 0);
}

#[test]
fn tour_walks_every_step_then_clears() {
    let (mut state, mut rt, now) = start(true, false);
    send(&mut state, &mut rt, Msg::ToggleSection(Section::Progress), now);
    send(&mut state, &mut rt, Msg::StartTutorial, now);
    assert!(!state.sections.is_collapsed(Section::Progress));

    tick(&mut state, &mut rt, now + ms(200));
    assert!(matches!(state.tutorial.lookup(), Some(TargetLookup::Resolved(_))));

    send(&mut state, &mut rt, Msg::TutorialBack, now + ms(250));
    assert_eq!(state.tutorial.step(), Some(0));

    let mut t = now + ms(300);
    for step in 1..=LAST_STEP {
        send(&mut state, &mut rt, Msg::TutorialNext, t);
        t += ms(200);
        tick(&mut state, &mut rt, t);
        assert_eq!(state.tutorial.step(), Some(step));
        assert!(matches!(state.tutorial.lookup(), Some(TargetLookup::Resolved(_))));
        let placement = state.tooltip_placement().unwrap();
        assert!(placement.tooltip.top >= state.page_scroll);
        assert!(placement.tooltip.bottom() <= state.page_scroll + i32::from(state.height));
    }
    // The grammar panel sits below the fold, so the page scrolled to it.
    assert!(state.page_scroll > 0);

    send(&mut state, &mut rt, Msg::TutorialNext, t);
    assert_eq!(state.tutorial.state(), TutorialState::Completed);
    tick(&mut state, &mut rt, t + ms(1999));
    assert_eq!(state.tutorial.state(), TutorialState::Completed);
    tick(&mut state, &mut rt, t + ms(2000));
    assert_eq!(state.tutorial.state(), TutorialState::Inactive);
}

#[test]
fn intro_hands_over_to_a_requested_tour() {
    let (mut state, mut rt, now) = start(false, true);
    let stage = |s: &AppState| match &s.screen {
        Screen::Intro(intro) => Some(intro.stage()),
        Screen::Dashboard => None,
    };
    assert_eq!(stage(&state), Some(IntroStage::Welcome));

    tick(&mut state, &mut rt, now + ms(1500));
    assert_eq!(stage(&state), Some(IntroStage::Login));
    for ch in "Sam".chars() {
        send(&mut state, &mut rt, Msg::IntroInput(ch), now + ms(1600));
    }
    // Dashboard messages do nothing on the intro screen.
    send(&mut state, &mut rt, Msg::NextCard, now + ms(1600));
    assert!(!rt.is_animating());

    send(&mut state, &mut rt, Msg::IntroContinue, now + ms(1700));
    assert_eq!(stage(&state), Some(IntroStage::Exiting));
    tick(&mut state, &mut rt, now + ms(2200));

    assert_eq!(state.screen, Screen::Dashboard);
    assert_eq!(state.user_name, "Sam");
    assert!(state.tutorial.is_active());
}
