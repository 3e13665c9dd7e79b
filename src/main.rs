use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use lingodeck::app::{AppState, Focus, Msg, Screen, StartOptions};
use lingodeck::config::Config;
use lingodeck::content::{ContentLibrary, Language};
use lingodeck::engine::sections::Section;
use lingodeck::event::{AppEvent, EventHandler};
use lingodeck::runtime::Runtime;
use lingodeck::session::placement::{DragOrigin, DragPayload};
use lingodeck::store::PreferenceStore;
use lingodeck::ui;
use lingodeck::ui::layout::{DashboardLayout, Hit};
use lingodeck::ui::theme::Themes;

/// Cells the card strip moves per wheel notch.
const WHEEL_CARD_STEP: f64 = 4.0;
/// Rows the page moves per wheel notch.
const WHEEL_PAGE_STEP: i32 = 3;

#[derive(Parser)]
#[command(
    name = "lingodeck",
    version,
    about = "Terminal language-learning deck with flashcards and a sentence builder"
)]
struct Cli {
    #[arg(short, long, value_parser = parse_language, help = "Language to start with (es, fr, it, pt)")]
    language: Option<Language>,

    #[arg(long, conflicts_with = "light", help = "Start in dark mode")]
    dark: bool,

    #[arg(long, help = "Start in light mode")]
    light: bool,

    #[arg(long, help = "Seed for the word bank shuffle")]
    seed: Option<u64>,

    #[arg(long, help = "Skip the welcome screen")]
    skip_intro: bool,

    #[arg(long, help = "Start the guided tour right away")]
    tutorial: bool,

    #[arg(short, long, help = "Path to config.toml")]
    config: Option<PathBuf>,

    #[arg(long, help = "Write the effective config to the config path and exit")]
    write_config: bool,
}

fn parse_language(code: &str) -> Result<Language, String> {
    Language::from_code(code).ok_or_else(|| format!("unknown language {code:?}, expected es, fr, it or pt"))
}

fn init_logging() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("lingodeck")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("lingodeck.log"))
    else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("LINGODECK_LOG", "warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = Config::load(Some(config_path.as_path()))?;
    if cli.write_config {
        config.save(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let library = ContentLibrary::load_seeded(cli.seed.or(config.shuffle_seed))
        .context("loading bundled content")?;
    let store = match PreferenceStore::new() {
        Ok(store) => Some(store),
        Err(err) => {
            warn!("preferences unavailable: {err:#}");
            None
        }
    };
    let dark_mode = if cli.dark {
        true
    } else if cli.light {
        false
    } else {
        store.as_ref().is_some_and(PreferenceStore::load_dark_mode)
    };
    let themes = Themes::load();

    let (width, height) = crossterm::terminal::size()?;
    let (mut state, effects) = AppState::new(
        library,
        StartOptions {
            language: cli.language.unwrap_or_else(|| config.language()),
            dark_mode,
            skip_intro: cli.skip_intro || config.skip_intro,
            start_tutorial: cli.tutorial,
            tooltip_size: config.tooltip_size(),
            width,
            height,
        },
    );
    let mut runtime = Runtime::new(store);
    runtime.run_effects(&mut state, effects, Instant::now(), &DashboardLayout::compute);
    info!("starting in {} ({}x{})", state.language(), width, height);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(config.tick_rate());

    let result = run_app(&mut terminal, &mut state, &mut runtime, &themes, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    runtime: &mut Runtime,
    themes: &Themes,
    events: &EventHandler,
) -> Result<()> {
    let geometry = DashboardLayout::compute;
    loop {
        let layout = DashboardLayout::compute(state);
        let effects = state.sync_layout(layout.metrics());
        runtime.run_effects(state, effects, Instant::now(), &geometry);

        let layout = DashboardLayout::compute(state);
        let theme = themes.pick(state.dark_mode);
        terminal.draw(|frame| ui::render(frame, &*state, theme, &layout))?;

        match events.next()? {
            AppEvent::Key(key) => {
                if let Some(msg) = key_message(state, key) {
                    runtime.dispatch(state, msg, Instant::now(), &geometry);
                }
            }
            AppEvent::Mouse(mouse) => {
                for msg in mouse_messages(state, &layout, mouse) {
                    runtime.dispatch(state, msg, Instant::now(), &geometry);
                }
            }
            AppEvent::Resize(width, height) => {
                runtime.dispatch(state, Msg::Resize { width, height }, Instant::now(), &geometry);
            }
            AppEvent::Tick => {}
        }
        runtime.tick(state, Instant::now(), &geometry);

        if state.should_quit {
            return Ok(());
        }
    }
}

fn key_message(state: &AppState, key: KeyEvent) -> Option<Msg> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Msg::Quit);
    }

    if let Screen::Intro(_) = state.screen {
        return match key.code {
            KeyCode::Enter => Some(Msg::IntroContinue),
            KeyCode::Backspace => Some(Msg::IntroBackspace),
            KeyCode::Esc => Some(Msg::Quit),
            KeyCode::Char(ch) => Some(Msg::IntroInput(ch)),
            _ => None,
        };
    }

    // The tour is modal: only its own keys get through.
    if state.tutorial.is_active() {
        return match key.code {
            KeyCode::Right | KeyCode::Enter | KeyCode::Char('l') => Some(Msg::TutorialNext),
            KeyCode::Left | KeyCode::Char('h') => Some(Msg::TutorialBack),
            KeyCode::Esc => Some(Msg::TutorialSkip),
            KeyCode::Char('q') => Some(Msg::Quit),
            _ => None,
        };
    }

    let half_page = i32::from(state.height / 2).max(1);
    match key.code {
        KeyCode::Char('q') => Some(Msg::Quit),
        KeyCode::Esc => state.drag.as_ref().map(|_| Msg::CancelDrag),
        KeyCode::Tab => Some(Msg::FocusNext),
        KeyCode::BackTab => Some(Msg::FocusPrev),
        KeyCode::Char(ch @ '1'..='4') => {
            let index = ch as usize - '1' as usize;
            Language::ALL.get(index).map(|l| Msg::SelectLanguage(*l))
        }
        KeyCode::Char('t') => Some(Msg::ToggleTheme),
        KeyCode::Char('?') => Some(Msg::StartTutorial),
        KeyCode::Char(ch) if Section::ALL.iter().any(|s| s.toggle_key() == ch) => Section::ALL
            .into_iter()
            .find(|s| s.toggle_key() == ch)
            .map(Msg::ToggleSection),
        KeyCode::PageDown => Some(Msg::ScrollPage(half_page)),
        KeyCode::PageUp => Some(Msg::ScrollPage(-half_page)),
        KeyCode::Char('c') => state.session.challenge.can_check().then_some(Msg::Check),
        KeyCode::Char('r') => Some(Msg::Reset),
        KeyCode::Char('n') => Some(Msg::NextChallenge),
        KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete
            if state.focus == Focus::Notes =>
        {
            Some(Msg::DismissNote)
        }
        KeyCode::Char(' ') if state.focus == Focus::Flashcards => Some(Msg::FlipCard),
        KeyCode::Left | KeyCode::Char('h') => Some(match state.focus {
            Focus::Flashcards => Msg::PrevCard,
            _ => Msg::MoveCursor(-1),
        }),
        KeyCode::Right | KeyCode::Char('l') => Some(match state.focus {
            Focus::Flashcards => Msg::NextCard,
            _ => Msg::MoveCursor(1),
        }),
        KeyCode::Up | KeyCode::Char('k') => Some(match state.focus {
            Focus::Notes => Msg::MoveCursor(-1),
            _ => Msg::ScrollPage(-1),
        }),
        KeyCode::Down | KeyCode::Char('j') => Some(match state.focus {
            Focus::Notes => Msg::MoveCursor(1),
            _ => Msg::ScrollPage(1),
        }),
        KeyCode::Enter => Some(Msg::Activate),
        _ => None,
    }
}

fn mouse_messages(state: &AppState, layout: &DashboardLayout, mouse: MouseEvent) -> Vec<Msg> {
    if !state.on_dashboard() {
        return Vec::new();
    }
    let hit = layout.hit(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
            let sign = if mouse.kind == MouseEventKind::ScrollDown { 1 } else { -1 };
            if hit == Some(Hit::Card) && !state.tutorial.is_active() {
                vec![Msg::NudgeCarousel(WHEEL_CARD_STEP * f64::from(sign))]
            } else {
                vec![Msg::ScrollPage(WHEEL_PAGE_STEP * sign)]
            }
        }
        _ if state.tutorial.is_active() => Vec::new(),
        MouseEventKind::Down(MouseButton::Left) => press_messages(state, hit),
        MouseEventKind::Up(MouseButton::Left) => match (hit, &state.drag) {
            // Releasing over another slot completes a press-drag-release.
            (Some(Hit::Slot(slot)), Some(drag))
                if drag.origin != DragOrigin::Slot(slot) =>
            {
                vec![Msg::DropOn(slot)]
            }
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn press_messages(state: &AppState, hit: Option<Hit>) -> Vec<Msg> {
    let Some(hit) = hit else {
        return Vec::new();
    };
    match hit {
        Hit::ThemeToggle => vec![Msg::ToggleTheme],
        Hit::TourButton => vec![Msg::StartTutorial],
        Hit::Language(language) => vec![Msg::SelectLanguage(language)],
        Hit::SectionTitle(section) => vec![Msg::ToggleSection(section)],
        Hit::PrevCard => vec![Msg::Focus(Focus::Flashcards), Msg::PrevCard],
        Hit::NextCard => vec![Msg::Focus(Focus::Flashcards), Msg::NextCard],
        Hit::Card => vec![Msg::Focus(Focus::Flashcards), Msg::FlipCard],
        Hit::Slot(slot) => {
            if state.drag.is_some() {
                vec![Msg::DropOn(slot)]
            } else if let Some(word) = state.session.challenge.placement.get(slot) {
                vec![Msg::PickUp(DragPayload::from_slot(word, slot))]
            } else {
                vec![Msg::Focus(Focus::Slots)]
            }
        }
        Hit::BankWord(index) => state
            .active_challenge()
            .and_then(|c| c.word_bank.get(index))
            .map(|word| vec![Msg::PickUp(DragPayload::from_bank(word))])
            .unwrap_or_default(),
        Hit::Check if state.session.challenge.can_check() => vec![Msg::Check],
        Hit::Check => Vec::new(),
        Hit::Reset => vec![Msg::Reset],
        Hit::NextChallenge => vec![Msg::NextChallenge],
        Hit::Note(index) => vec![Msg::SelectNote(index)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use lingodeck::engine::tooltip::TooltipSize;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn state(skip_intro: bool) -> AppState {
        let library = ContentLibrary::load_seeded(Some(9)).unwrap();
        AppState::new(
            library,
            StartOptions {
                language: Language::Spanish,
                dark_mode: false,
                skip_intro,
                start_tutorial: false,
                tooltip_size: TooltipSize::default(),
                width: 100,
                height: 30,
            },
        )
        .0
    }

    #[test]
    fn test_intro_keys_edit_the_name() {
        let s = state(false);
        assert_eq!(key_message(&s, key(KeyCode::Char('q'))), Some(Msg::IntroInput('q')));
        assert_eq!(key_message(&s, key(KeyCode::Enter)), Some(Msg::IntroContinue));
    }

    #[test]
    fn test_dashboard_keys() {
        let s = state(true);
        assert_eq!(key_message(&s, key(KeyCode::Char('q'))), Some(Msg::Quit));
        assert_eq!(
            key_message(&s, key(KeyCode::Char('3'))),
            Some(Msg::SelectLanguage(Language::Italian))
        );
        assert_eq!(
            key_message(&s, key(KeyCode::Char('G'))),
            Some(Msg::ToggleSection(Section::Grammar))
        );
        assert_eq!(key_message(&s, key(KeyCode::Right)), Some(Msg::NextCard));
        // Nothing placed yet, so check is not offered.
        assert_eq!(key_message(&s, key(KeyCode::Char('c'))), None);
        assert_eq!(key_message(&s, key(KeyCode::Esc)), None);
    }

    #[test]
    fn test_tour_is_modal() {
        let mut s = state(true);
        s.update(Msg::StartTutorial);
        assert_eq!(key_message(&s, key(KeyCode::Char('t'))), None);
        assert_eq!(key_message(&s, key(KeyCode::Esc)), Some(Msg::TutorialSkip));
        assert_eq!(key_message(&s, key(KeyCode::Enter)), Some(Msg::TutorialNext));
    }

    #[test]
    fn test_press_on_bank_word_picks_it_up() {
        let s = state(true);
        let layout = DashboardLayout::compute(&s);
        let rect = layout.builder.as_ref().unwrap().bank[0];
        let word = s.active_challenge().unwrap().word_bank[0].clone();
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x,
            row: rect.y,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            mouse_messages(&s, &layout, mouse),
            vec![Msg::PickUp(DragPayload::from_bank(&word))]
        );
    }
}
