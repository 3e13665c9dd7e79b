use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Widget};

use crate::app::transition::LanguageTransition;
use crate::ui::theme::Theme;

/// Band covering part of the screen while the language switches: the top
/// half while rising, everything at the peak, the bottom third while falling.
pub struct WaveOverlay<'a> {
    pub transition: LanguageTransition,
    pub theme: &'a Theme,
}

fn band(transition: LanguageTransition, area: Rect) -> Option<Rect> {
    let (top, height) = match transition {
        LanguageTransition::Idle => return None,
        LanguageTransition::Rising(_) => (0, area.height / 2),
        LanguageTransition::Peaked(_) => (0, area.height),
        LanguageTransition::Falling(_) => {
            let h = area.height / 3;
            (area.height - h, h)
        }
    };
    (height > 0).then(|| Rect::new(area.x, area.y + top, area.width, height))
}

impl Widget for WaveOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(language) = self.transition.target() else {
            return;
        };
        let Some(rect) = band(self.transition, area) else {
            return;
        };
        let colors = &self.theme.colors;
        Clear.render(rect, buf);
        buf.set_style(rect, Style::default().bg(colors.accent()));

        let lines = vec![
            Line::from(Span::styled(
                language.greeting(),
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Switching to {}", language.name()),
                Style::default().fg(colors.bg()).bg(colors.accent()),
            )),
        ];
        let text_top = rect.y + rect.height.saturating_sub(2) / 2;
        let text = Rect::new(rect.x, text_top, rect.width, 2.min(rect.height));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(text, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Language;

    #[test]
    fn test_band_by_phase() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(band(LanguageTransition::Idle, area), None);
        assert_eq!(
            band(LanguageTransition::Rising(Language::French), area),
            Some(Rect::new(0, 0, 80, 12))
        );
        assert_eq!(
            band(LanguageTransition::Peaked(Language::French), area),
            Some(area)
        );
        assert_eq!(
            band(LanguageTransition::Falling(Language::French), area),
            Some(Rect::new(0, 16, 80, 8))
        );
    }

    #[test]
    fn test_peak_shows_greeting() {
        let theme = Theme::light();
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 10));
        WaveOverlay {
            transition: LanguageTransition::Peaked(Language::Italian),
            theme: &theme,
        }
        .render(buf.area, &mut buf);
        let out: String = (0..10)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(out.contains(Language::Italian.greeting()));
        assert!(out.contains("Switching to Italian"));
    }
}
