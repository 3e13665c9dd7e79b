use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::session::grammar::GrammarNotes;
use crate::ui::layout::GrammarRects;
use crate::ui::theme::Theme;

pub const EMPTY_MESSAGE: &str = "Wrong answers bring up grammar tips here.";

/// Split `text` into chunks of at most `width` characters. Matches the row
/// count `note_lines` reserves.
fn chunks(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

pub struct GrammarPanel<'a> {
    pub notes: &'a GrammarNotes,
    /// Highlighted note, when the notes list has focus.
    pub selected: Option<usize>,
    pub rects: &'a GrammarRects,
    pub theme: &'a Theme,
}

impl Widget for GrammarPanel<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        if let Some(empty) = self.rects.empty {
            buf.set_stringn(
                empty.x,
                empty.y,
                EMPTY_MESSAGE,
                empty.width as usize,
                Style::default().fg(colors.text_dim()).add_modifier(Modifier::ITALIC),
            );
            return;
        }

        for (i, (note, rect)) in self.notes.iter().zip(&self.rects.notes).enumerate() {
            let selected = self.selected == Some(i);
            let rule_style = if selected {
                Style::default()
                    .fg(colors.fg())
                    .bg(colors.accent_dim())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let example_style = Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::ITALIC);

            let width = rect.width as usize;
            let rule = chunks(&format!("• {}", note.rule), width);
            let example = chunks(&format!("  e.g. {}", note.example), width);
            let lines = rule
                .into_iter()
                .map(|l| (l, rule_style))
                .chain(example.into_iter().map(|l| (l, example_style)));
            for (row, (line, style)) in lines.enumerate() {
                let y = rect.y + row as u16;
                if y >= rect.bottom() {
                    break;
                }
                buf.set_stringn(rect.x, y, line, width, style);
            }

            if selected {
                let hint = "[d] dismiss";
                let w = hint.len() as u16;
                if rect.width > w {
                    buf.set_string(
                        rect.right() - w,
                        rect.y,
                        hint,
                        Style::default().fg(colors.warning()).bg(colors.accent_dim()),
                    );
                }
            }
        }
    }
}
