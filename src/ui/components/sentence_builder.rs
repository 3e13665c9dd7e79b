use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::app::Focus;
use crate::content::Challenge;
use crate::session::ChallengeState;
use crate::session::checker::Verdict;
use crate::session::placement::{DragOrigin, DragPayload};
use crate::ui::layout::{BUTTON_LABELS, BuilderRects, slot_text};
use crate::ui::theme::Theme;

pub struct SentenceBuilder<'a> {
    pub challenge: Option<&'a Challenge>,
    pub state: &'a ChallengeState,
    pub drag: Option<&'a DragPayload>,
    pub focus: Focus,
    pub bank_cursor: usize,
    pub slot_cursor: usize,
    pub rects: &'a BuilderRects,
    pub theme: &'a Theme,
}

fn chip(buf: &mut Buffer, rect: Rect, text: &str, style: Style) {
    let label = format!("[ {text} ]");
    let pad = rect.width.saturating_sub(label.chars().count() as u16) / 2;
    buf.set_style(rect, style);
    buf.set_stringn(rect.x + pad, rect.y, label, rect.width as usize, style);
}

impl SentenceBuilder<'_> {
    fn render_slots(&self, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let placement = &self.state.placement;
        for (i, rect) in self.rects.slots.iter().enumerate() {
            let text = slot_text(self.challenge, placement, i);
            let placed = placement.get(i);
            let mut style = match placed {
                Some(_) => Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                None => Style::default()
                    .fg(colors.text_dim())
                    .add_modifier(Modifier::ITALIC),
            };
            // A wrong answer only gets the verdict line, never per-slot marks.
            if self.state.verdict == Some(Verdict::Correct) {
                style = style.fg(colors.success());
            }
            if self.drag.is_some_and(|d| d.origin == DragOrigin::Slot(i)) {
                style = style.fg(colors.highlight());
            }
            if self.focus == Focus::Slots && i == self.slot_cursor {
                style = style.bg(colors.accent_dim());
            }
            chip(buf, *rect, &text, style);
        }
    }

    fn render_bank(&self, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(challenge) = self.challenge else {
            return;
        };
        let placed: Vec<&str> = self.state.placement.words().collect();
        for (i, (word, rect)) in challenge.word_bank.iter().zip(&self.rects.bank).enumerate() {
            let mut style = if placed.contains(&word.as_str()) {
                Style::default().fg(colors.text_dim())
            } else {
                Style::default().fg(colors.fg())
            };
            if self
                .drag
                .is_some_and(|d| d.origin == DragOrigin::WordBank && d.word == *word)
            {
                style = style.fg(colors.highlight()).add_modifier(Modifier::BOLD);
            }
            if self.focus == Focus::WordBank && i == self.bank_cursor {
                style = style.bg(colors.accent_dim());
            }
            chip(buf, *rect, word, style);
        }
    }
}

impl Widget for SentenceBuilder<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let translation = self.challenge.map_or("", |c| c.translation.as_str());
        Paragraph::new(Line::from(vec![
            Span::styled("Build: ", Style::default().fg(colors.text_dim())),
            Span::styled(
                format!("\"{translation}\""),
                Style::default().fg(colors.fg()).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .render(self.rects.translation, buf);

        self.render_slots(buf);

        let mut label = vec![Span::styled(
            "Word bank",
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        )];
        if let Some(drag) = self.drag {
            label.push(Span::styled(
                format!("   holding \"{}\": Enter on a slot drops it, Esc cancels", drag.word),
                Style::default().fg(colors.highlight()),
            ));
        }
        Paragraph::new(Line::from(label)).render(self.rects.bank_label, buf);

        self.render_bank(buf);

        let enabled = [
            self.state.can_check(),
            self.state.placement.words().next().is_some() || self.state.verdict.is_some(),
            true,
        ];
        let rects = [self.rects.check, self.rects.reset, self.rects.next];
        for ((label, rect), on) in BUTTON_LABELS.iter().zip(rects).zip(enabled) {
            let style = if on {
                Style::default().fg(colors.bg()).bg(colors.accent())
            } else {
                Style::default().fg(colors.text_dim()).bg(colors.bar_empty())
            };
            buf.set_stringn(rect.x, rect.y, label, rect.width as usize, style);
        }

        if let Some(verdict) = self.state.verdict {
            let color = if verdict.is_correct() { colors.success() } else { colors.error() };
            let mut text = verdict.message().to_string();
            if verdict.is_correct() {
                text.push_str("  Press n for the next sentence.");
            }
            buf.set_stringn(
                self.rects.verdict.x,
                self.rects.verdict.y,
                text,
                self.rects.verdict.width as usize,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }
    }
}
