pub mod components;
pub mod layout;
pub mod theme;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::app::{AppState, Focus, Screen};
use crate::engine::sections::Section;
use components::flashcards::FlashcardStrip;
use components::grammar_panel::GrammarPanel;
use components::header::{Header, LanguageBar};
use components::intro_screen::IntroScreen;
use components::progress_bar::ProgressBar;
use components::sentence_builder::SentenceBuilder;
use components::tour_overlay::TourOverlay;
use components::wave::WaveOverlay;
use layout::DashboardLayout;
use theme::Theme;

/// Draw one frame. `layout` must have been computed from `state`.
pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme, layout: &DashboardLayout) {
    let area = frame.area();
    let buf = frame.buffer_mut();
    buf.set_style(area, Style::default().bg(theme.colors.bg()).fg(theme.colors.fg()));

    if let Screen::Intro(intro) = &state.screen {
        IntroScreen { intro, theme }.render(area, buf);
        return;
    }

    let page = render_page(state, theme, layout);
    copy_visible(&page, layout.scroll, area, buf);

    WaveOverlay {
        transition: state.wave.state(),
        theme,
    }
    .render(area, buf);
    TourOverlay {
        tutorial: &state.tutorial,
        placement: state.tooltip_placement(),
        scroll: state.page_scroll,
        theme,
    }
    .render(area, buf);
}

/// Render the whole dashboard page, which may be taller than the terminal.
pub fn render_page(state: &AppState, theme: &Theme, layout: &DashboardLayout) -> Buffer {
    let colors = &theme.colors;
    let mut buf = Buffer::empty(Rect::new(0, 0, layout.width, layout.page_height));
    buf.set_style(buf.area, Style::default().bg(colors.bg()).fg(colors.fg()));

    Header {
        user_name: &state.user_name,
        dark_mode: state.dark_mode,
        tour_button: layout.tour_button,
        theme_toggle: layout.theme_toggle,
        theme,
    }
    .render(layout.header, &mut buf);
    LanguageBar {
        current: state.language(),
        transition: state.wave.state(),
        tabs: &layout.language_tabs,
        theme,
    }
    .render(layout.language_bar, &mut buf);

    for section in Section::ALL {
        render_section_frame(state, theme, layout, section, &mut buf);
    }

    if let Some(rects) = &layout.flashcards {
        FlashcardStrip {
            vocabulary: &state.pack().vocabulary,
            carousel: &state.carousel,
            focused: state.focus == Focus::Flashcards,
            rects,
            theme,
        }
        .render(rects.cards, &mut buf);
    }

    if let Some(rects) = &layout.builder {
        SentenceBuilder {
            challenge: state.active_challenge(),
            state: &state.session.challenge,
            drag: state.drag.as_ref(),
            focus: state.focus,
            bank_cursor: state.bank_cursor,
            slot_cursor: state.slot_cursor,
            rects,
            theme,
        }
        .render(rects.translation, &mut buf);
    }

    if let Some([words, sentences, accuracy]) = layout.progress {
        let pack = state.pack();
        let progress = &state.session.progress;
        ProgressBar::count(
            "Words learned",
            progress.learned_words.len(),
            pack.vocabulary.len(),
            theme,
        )
        .render(words, &mut buf);
        ProgressBar::count(
            "Sentences completed",
            progress.completed_challenges.len(),
            pack.challenges.len(),
            theme,
        )
        .render(sentences, &mut buf);
        ProgressBar::percent("Accuracy", progress.accuracy(), theme).render(accuracy, &mut buf);
    }

    if let Some(rects) = &layout.grammar {
        let selected = (state.focus == Focus::Notes).then_some(state.note_cursor);
        GrammarPanel {
            notes: &state.session.notes,
            selected,
            rects,
            theme,
        }
        .render(layout.section(Section::Grammar).body.unwrap_or_default(), &mut buf);
    }

    let footer: Vec<Line> = layout
        .footer_lines
        .iter()
        .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(colors.text_dim()))))
        .collect();
    Paragraph::new(footer).render(layout.footer, &mut buf);

    buf
}

fn render_section_frame(
    state: &AppState,
    theme: &Theme,
    layout: &DashboardLayout,
    section: Section,
    buf: &mut Buffer,
) {
    let colors = &theme.colors;
    let rects = layout.section(section);
    let focused = state.focus.section() == section;
    let marker = if rects.body.is_some() { "▾" } else { "▸" };
    let title_style = if focused {
        Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD)
    };
    Paragraph::new(Line::from(vec![
        Span::styled(format!(" {marker} {}", section.title()), title_style),
        Span::styled(
            format!(" [{}]", section.toggle_key()),
            Style::default().fg(colors.text_dim()),
        ),
    ]))
    .render(rects.title, buf);

    if let Some(body) = rects.body {
        let border = if focused { colors.border_focused() } else { colors.border() };
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.panel()))
            .render(body, buf);
    }
}

/// Copy the page rows starting at `scroll` into the frame.
fn copy_visible(page: &Buffer, scroll: i32, area: Rect, buf: &mut Buffer) {
    let width = area.width.min(page.area.width);
    for row in 0..area.height {
        let Ok(page_y) = u16::try_from(scroll + i32::from(row)) else {
            continue;
        };
        if page_y >= page.area.height {
            break;
        }
        for col in 0..width {
            buf[(area.x + col, area.y + row)] = page[(col, page_y)].clone();
        }
    }
}
