use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::app::transition::LanguageTransition;
use crate::content::Language;
use crate::ui::layout::tab_label;
use crate::ui::theme::Theme;

pub struct Header<'a> {
    pub user_name: &'a str,
    pub dark_mode: bool,
    pub tour_button: Rect,
    pub theme_toggle: Rect,
    pub theme: &'a Theme,
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let bg = Style::default().bg(colors.header_bg());
        buf.set_style(area, bg);

        let greeting = if self.user_name.is_empty() {
            "  Learn a language one card at a time".to_string()
        } else {
            format!("  Welcome back, {}", self.user_name)
        };
        let title = Line::from(vec![
            Span::styled(
                " LingoDeck ",
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.header_bg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(greeting, Style::default().fg(colors.text_dim()).bg(colors.header_bg())),
        ]);
        let title_area = Rect::new(area.x, area.y + 1, area.width, 1);
        Paragraph::new(title).render(title_area, buf);

        if !self.tour_button.is_empty() {
            buf.set_string(
                self.tour_button.x,
                self.tour_button.y,
                "[?] Tour",
                Style::default().fg(colors.accent()).bg(colors.header_bg()),
            );
        }
        let toggle = if self.dark_mode { "[t] ☾ Dark" } else { "[t] ☀ Light" };
        buf.set_string(
            self.theme_toggle.x,
            self.theme_toggle.y,
            toggle,
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        );
    }
}

pub struct LanguageBar<'a> {
    pub current: Language,
    pub transition: LanguageTransition,
    pub tabs: &'a [(Language, Rect)],
    pub theme: &'a Theme,
}

impl Widget for LanguageBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors.border()))
            .render(area, buf);

        let pending = self.transition.target();
        for (i, (lang, rect)) in self.tabs.iter().enumerate() {
            let style = if *lang == self.current {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else if Some(*lang) == pending {
                Style::default().fg(colors.bg()).bg(colors.highlight())
            } else {
                Style::default().fg(colors.fg())
            };
            buf.set_stringn(rect.x, rect.y, tab_label(i, *lang), rect.width as usize, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_row(width: u16, tour_button: Rect) -> String {
        let theme = Theme::light();
        let mut buf = Buffer::empty(Rect::new(0, 0, width, 3));
        Header {
            user_name: "",
            dark_mode: false,
            tour_button,
            theme_toggle: Rect::new(width.saturating_sub(11), 1, 10.min(width), 1),
            theme: &theme,
        }
        .render(buf.area, &mut buf);
        (0..width).map(|x| buf[(x, 1)].symbol()).collect()
    }

    #[test]
    fn test_tour_button_hidden_without_room() {
        assert!(!header_row(20, Rect::default()).contains("Tour"));
        assert!(header_row(40, Rect::new(18, 1, 10, 1)).contains("[?] Tour"));
    }
}
