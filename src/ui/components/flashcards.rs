use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::content::VocabularyEntry;
use crate::engine::carousel::Carousel;
use crate::ui::layout::FlashcardRects;
use crate::ui::theme::Theme;

/// The card strip. Cards sit side by side, one card wide each, and the strip
/// is shifted left by the carousel offset, so mid-scroll two cards show.
pub struct FlashcardStrip<'a> {
    pub vocabulary: &'a [VocabularyEntry],
    pub carousel: &'a Carousel,
    pub focused: bool,
    pub rects: &'a FlashcardRects,
    pub theme: &'a Theme,
}

impl FlashcardStrip<'_> {
    fn render_card(&self, index: usize, entry: &VocabularyEntry, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let current = index == self.carousel.index();
        let border = if current && self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.panel()));
        let inner = block.inner(area);
        block.render(area, buf);

        let show_translation = current && self.carousel.translation_shown();
        let face = if show_translation {
            Span::styled(
                entry.translation.as_str(),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            )
        } else {
            Span::styled(
                entry.word.as_str(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )
        };
        let lines = vec![
            Line::from(Span::styled(
                entry.image.glyph(),
                Style::default().fg(colors.accent()),
            )),
            Line::from(""),
            Line::from(face),
            Line::from(Span::styled(
                entry.category.label(),
                Style::default().fg(colors.text_dim()),
            )),
            Line::from(Span::styled(
                format!("{} / {}", index + 1, self.vocabulary.len()),
                Style::default().fg(colors.text_dim()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }

    fn render_nav(&self, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let dim = Style::default().fg(colors.text_dim());
        buf.set_stringn(self.rects.prev.x, self.rects.prev.y, "◀ prev", self.rects.prev.width as usize, dim);
        buf.set_stringn(self.rects.next.x, self.rects.next.y, "next ▶", self.rects.next.width as usize, dim);

        let dots = self.rects.dots;
        let len = self.carousel.len();
        let text = if len * 2 <= dots.width as usize {
            (0..len)
                .map(|i| if i == self.carousel.index() { "●" } else { "○" })
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            format!("card {} of {}", self.carousel.index() + 1, len)
        };
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(colors.accent()))))
            .alignment(Alignment::Center)
            .render(dots, buf);
    }
}

impl Widget for FlashcardStrip<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let area = self.rects.cards;
        self.render_nav(buf);
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.vocabulary.is_empty() {
            buf.set_string(area.x, area.y, "No cards", Style::default().fg(self.theme.colors.text_dim()));
            return;
        }

        let width = i64::from(area.width);
        let offset = self.carousel.offset().round() as i64;
        let mut card_buf = Buffer::empty(Rect::new(0, 0, area.width, area.height));

        for (index, entry) in self.vocabulary.iter().enumerate() {
            let card_x = index as i64 * width - offset;
            if card_x >= width || card_x + width <= 0 {
                continue;
            }
            card_buf.reset();
            self.render_card(index, entry, card_buf.area, &mut card_buf);

            for cx in 0..area.width {
                let screen_x = card_x + i64::from(cx);
                if !(0..width).contains(&screen_x) {
                    continue;
                }
                for cy in 0..area.height {
                    buf[(area.x + screen_x as u16, area.y + cy)] = card_buf[(cx, cy)].clone();
                }
            }
        }
    }
}
