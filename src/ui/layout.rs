use ratatui::layout::{Position, Rect};

use crate::app::{AppState, LayoutMetrics};
use crate::content::{Challenge, Language};
use crate::engine::sections::Section;
use crate::engine::tooltip::Bounds;
use crate::engine::tutorial::{TargetGeometry, TutorialTarget};
use crate::session::placement::Placement;

pub const HEADER_HEIGHT: u16 = 3;
pub const LANGUAGE_BAR_HEIGHT: u16 = 3;
pub const CARD_HEIGHT: u16 = 7;
pub const PROGRESS_BAR_HEIGHT: u16 = 3;
/// Columns needed for the tour button and theme toggle side by side.
pub const HEADER_BUTTONS_WIDTH: u16 = 22;
const EMPTY_SLOT: &str = "____";

pub const FOOTER_HINTS: &[&str] = &[
    "[Tab] focus",
    "[←→] move",
    "[Enter] pick/drop",
    "[Space] flip",
    "[c] check",
    "[r] reset",
    "[n] next",
    "[1-4] language",
    "[F/S/P/G] sections",
    "[t] theme",
    "[?] tour",
    "[PgUp/PgDn] scroll",
    "[q] quit",
];

/// Something clickable on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    ThemeToggle,
    TourButton,
    Language(Language),
    SectionTitle(Section),
    PrevCard,
    NextCard,
    Card,
    Slot(usize),
    BankWord(usize),
    Check,
    Reset,
    NextChallenge,
    Note(usize),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionRects {
    pub title: Rect,
    /// Bordered body; `None` while collapsed.
    pub body: Option<Rect>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashcardRects {
    pub cards: Rect,
    pub prev: Rect,
    pub next: Rect,
    pub dots: Rect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuilderRects {
    pub translation: Rect,
    pub slots: Vec<Rect>,
    pub bank_label: Rect,
    pub bank: Vec<Rect>,
    pub check: Rect,
    pub reset: Rect,
    pub next: Rect,
    pub verdict: Rect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarRects {
    pub notes: Vec<Rect>,
    pub empty: Option<Rect>,
}

/// Dashboard geometry in page coordinates. The page can be taller than the
/// terminal; `scroll` is the first visible page row.
#[derive(Clone, Debug)]
pub struct DashboardLayout {
    pub width: u16,
    pub page_height: u16,
    pub scroll: i32,
    pub header: Rect,
    pub theme_toggle: Rect,
    pub tour_button: Rect,
    pub language_bar: Rect,
    pub language_tabs: Vec<(Language, Rect)>,
    pub sections: [SectionRects; 4],
    pub flashcards: Option<FlashcardRects>,
    pub builder: Option<BuilderRects>,
    pub progress: Option<[Rect; 3]>,
    pub grammar: Option<GrammarRects>,
    pub footer: Rect,
    pub footer_lines: Vec<String>,
}

fn section_index(section: Section) -> usize {
    match section {
        Section::Flashcards => 0,
        Section::Sentences => 1,
        Section::Progress => 2,
        Section::Grammar => 3,
    }
}

pub fn chip_width(text: &str) -> u16 {
    (text.chars().count() as u16).saturating_add(4).max(8)
}

/// Text shown in a slot: the placed word, else the template hint, else a
/// blank marker.
pub fn slot_text(challenge: Option<&Challenge>, placement: &Placement, slot: usize) -> String {
    if let Some(word) = placement.get(slot) {
        return word.to_string();
    }
    challenge
        .and_then(|c| c.template.get(slot))
        .and_then(|t| t.hint())
        .unwrap_or(EMPTY_SLOT)
        .to_string()
}

pub fn tab_label(index: usize, language: Language) -> String {
    format!(" {} {} ", index + 1, language.name())
}

/// Lay out chips left to right, wrapping at `max_width`. Returns a rect per
/// chip and the number of rows used (at least one).
pub fn flow_chips(widths: &[u16], x: u16, y: u16, max_width: u16) -> (Vec<Rect>, u16) {
    let mut rects = Vec::with_capacity(widths.len());
    let mut col = 0u16;
    let mut row = 0u16;
    for &w in widths {
        let w = w.min(max_width);
        if col > 0 && col + w > max_width {
            col = 0;
            row += 1;
        }
        rects.push(Rect::new(x + col, y + row, w, 1));
        col += w + 1;
    }
    (rects, row + 1)
}

impl DashboardLayout {
    pub fn compute(state: &AppState) -> Self {
        let width = state.width;
        let inner_width = width.saturating_sub(2);
        let mut y = 0u16;

        let header = Rect::new(0, y, width, HEADER_HEIGHT);
        let theme_toggle = Rect::new(width.saturating_sub(11), 1, 10.min(width), 1);
        // Narrow terminals keep only the theme toggle; `?` still starts the tour.
        let tour_button = if width >= HEADER_BUTTONS_WIDTH {
            Rect::new(width - HEADER_BUTTONS_WIDTH, 1, 10, 1)
        } else {
            Rect::default()
        };
        y += HEADER_HEIGHT;

        let language_bar = Rect::new(0, y, width, LANGUAGE_BAR_HEIGHT);
        let mut tab_x = 2u16;
        let language_tabs = Language::ALL
            .iter()
            .enumerate()
            .map(|(i, &lang)| {
                let w = tab_label(i, lang).chars().count() as u16;
                let rect = Rect::new(tab_x, y + 1, w, 1);
                tab_x += w + 1;
                (lang, rect)
            })
            .collect();
        y += LANGUAGE_BAR_HEIGHT;

        let mut sections: [SectionRects; 4] = Default::default();
        let mut flashcards = None;
        let mut builder = None;
        let mut progress = None;
        let mut grammar = None;

        for section in Section::ALL {
            let title = Rect::new(0, y, width, 1);
            y += 1;
            let body = if state.sections.is_collapsed(section) {
                None
            } else {
                let (x0, y0) = (1, y + 1);
                let inner_height = match section {
                    Section::Flashcards => {
                        let (rects, h) = flashcard_rects(x0, y0, inner_width);
                        flashcards = Some(rects);
                        h
                    }
                    Section::Sentences => {
                        let (rects, h) = builder_rects(state, x0, y0, inner_width);
                        builder = Some(rects);
                        h
                    }
                    Section::Progress => {
                        let bars = [0, 1, 2].map(|i| {
                            Rect::new(x0, y0 + i * PROGRESS_BAR_HEIGHT, inner_width, PROGRESS_BAR_HEIGHT)
                        });
                        progress = Some(bars);
                        PROGRESS_BAR_HEIGHT * 3
                    }
                    Section::Grammar => {
                        let (rects, h) = grammar_rects(state, x0, y0, inner_width);
                        grammar = Some(rects);
                        h
                    }
                };
                let body = Rect::new(0, y, width, inner_height + 2);
                y += body.height;
                Some(body)
            };
            sections[section_index(section)] = SectionRects { title, body };
        }

        let footer_lines = pack_hint_lines(FOOTER_HINTS, width as usize);
        let footer = Rect::new(0, y, width, footer_lines.len() as u16);
        y += footer.height;

        Self {
            width,
            page_height: y,
            scroll: state.page_scroll,
            header,
            theme_toggle,
            tour_button,
            language_bar,
            language_tabs,
            sections,
            flashcards,
            builder,
            progress,
            grammar,
            footer,
            footer_lines,
        }
    }

    pub fn section(&self, section: Section) -> &SectionRects {
        &self.sections[section_index(section)]
    }

    pub fn metrics(&self) -> LayoutMetrics {
        LayoutMetrics {
            page_height: i32::from(self.page_height),
            card_width: self.flashcards.as_ref().map_or(0.0, |f| f64::from(f.cards.width)),
        }
    }

    fn target_rect(&self, target: TutorialTarget) -> Option<Rect> {
        match target {
            TutorialTarget::Header => Some(self.header),
            TutorialTarget::LanguageBar => Some(self.language_bar),
            TutorialTarget::Flashcards => self.section(Section::Flashcards).body,
            TutorialTarget::SentenceBuilder => self.section(Section::Sentences).body,
            TutorialTarget::ProgressContent => self.section(Section::Progress).body,
            TutorialTarget::GrammarContent => self.section(Section::Grammar).body,
        }
    }

    /// What sits under a terminal cell, given in screen coordinates.
    pub fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        let y = u16::try_from(i32::from(row) + self.scroll).ok()?;
        let pos = Position::new(column, y);

        if self.theme_toggle.contains(pos) {
            return Some(Hit::ThemeToggle);
        }
        if self.tour_button.contains(pos) {
            return Some(Hit::TourButton);
        }
        if let Some((lang, _)) = self.language_tabs.iter().find(|(_, r)| r.contains(pos)) {
            return Some(Hit::Language(*lang));
        }
        if let Some(section) = Section::ALL
            .into_iter()
            .find(|s| self.section(*s).title.contains(pos))
        {
            return Some(Hit::SectionTitle(section));
        }
        if let Some(f) = &self.flashcards {
            if f.prev.contains(pos) {
                return Some(Hit::PrevCard);
            }
            if f.next.contains(pos) {
                return Some(Hit::NextCard);
            }
            if f.cards.contains(pos) {
                return Some(Hit::Card);
            }
        }
        if let Some(b) = &self.builder {
            if let Some(i) = b.slots.iter().position(|r| r.contains(pos)) {
                return Some(Hit::Slot(i));
            }
            if let Some(i) = b.bank.iter().position(|r| r.contains(pos)) {
                return Some(Hit::BankWord(i));
            }
            if b.check.contains(pos) {
                return Some(Hit::Check);
            }
            if b.reset.contains(pos) {
                return Some(Hit::Reset);
            }
            if b.next.contains(pos) {
                return Some(Hit::NextChallenge);
            }
        }
        if let Some(g) = &self.grammar
            && let Some(i) = g.notes.iter().position(|r| r.contains(pos))
        {
            return Some(Hit::Note(i));
        }
        None
    }
}

impl TargetGeometry for DashboardLayout {
    fn target_bounds(&self, target: TutorialTarget) -> Option<Bounds> {
        let rect = self.target_rect(target)?;
        Some(Bounds::new(
            i32::from(rect.x),
            i32::from(rect.y) - self.scroll,
            i32::from(rect.width),
            i32::from(rect.height),
        ))
    }
}

fn flashcard_rects(x: u16, y: u16, width: u16) -> (FlashcardRects, u16) {
    let cards = Rect::new(x, y, width, CARD_HEIGHT);
    let nav_y = y + CARD_HEIGHT;
    let button = 8.min(width);
    let rects = FlashcardRects {
        cards,
        prev: Rect::new(x, nav_y, button, 1),
        next: Rect::new(x + width.saturating_sub(button), nav_y, button, 1),
        dots: Rect::new(x + button, nav_y, width.saturating_sub(button * 2), 1),
    };
    (rects, CARD_HEIGHT + 1)
}

pub const BUTTON_LABELS: [&str; 3] = [" [c] Check ", " [r] Reset ", " [n] Next "];

fn builder_rects(state: &AppState, x: u16, y: u16, width: u16) -> (BuilderRects, u16) {
    let challenge = state.active_challenge();
    let placement = &state.session.challenge.placement;
    let mut row = y;

    let translation = Rect::new(x, row, width, 1);
    row += 2;

    let slot_widths: Vec<u16> = (0..placement.len())
        .map(|i| chip_width(&slot_text(challenge, placement, i)))
        .collect();
    let (slots, rows) = flow_chips(&slot_widths, x, row, width);
    row += rows + 1;

    let bank_label = Rect::new(x, row, width, 1);
    row += 1;
    let bank_widths: Vec<u16> = challenge
        .map(|c| c.word_bank.iter().map(|w| chip_width(w)).collect())
        .unwrap_or_default();
    let (bank, rows) = flow_chips(&bank_widths, x, row, width);
    row += rows + 1;

    let button_widths = BUTTON_LABELS.map(|l| l.chars().count() as u16);
    let (buttons, rows) = flow_chips(&button_widths, x, row, width);
    row += rows;
    let verdict = Rect::new(x, row, width, 1);
    row += 1;

    let rects = BuilderRects {
        translation,
        slots,
        bank_label,
        bank,
        check: buttons[0],
        reset: buttons[1],
        next: buttons[2],
        verdict,
    };
    (rects, row - y)
}

pub fn note_lines(rule: &str, example: &str, width: u16) -> u16 {
    let width = width as usize;
    (wrapped_line_count(&format!("• {rule}"), width) + wrapped_line_count(&format!("  e.g. {example}"), width))
        as u16
}

fn grammar_rects(state: &AppState, x: u16, y: u16, width: u16) -> (GrammarRects, u16) {
    let notes = &state.session.notes;
    if notes.is_empty() {
        let rects = GrammarRects {
            notes: Vec::new(),
            empty: Some(Rect::new(x, y, width, 1)),
        };
        return (rects, 1);
    }
    let mut row = y;
    let mut rects = Vec::with_capacity(notes.len());
    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            row += 1;
        }
        let h = note_lines(&note.rule, &note.example, width);
        rects.push(Rect::new(x, row, width, h));
        row += h;
    }
    let rects = GrammarRects {
        notes: rects,
        empty: None,
    };
    (rects, row - y)
}

pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let chars = text.chars().count().max(1);
    chars.div_ceil(width)
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

/// A `width` x `height` box centered in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let left = area.x.saturating_add((area.width - w) / 2);
    let top = area.y.saturating_add((area.height - h) / 2);
    Rect::new(left, top, w, h)
}

/// Convert tooltip-space bounds to a screen rect, clipped to `screen`.
pub fn bounds_to_rect(bounds: Bounds, screen: Rect) -> Option<Rect> {
    let left = bounds.left.max(i32::from(screen.x));
    let top = bounds.top.max(i32::from(screen.y));
    let right = bounds.right().min(i32::from(screen.right()));
    let bottom = bounds.bottom().min(i32::from(screen.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}
