use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    /// Text centered on the bar, e.g. "3 / 15".
    pub value: String,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, ratio: f64, value: String, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            ratio: if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 },
            value,
            theme,
        }
    }

    /// `done` out of `total`, shown as a count.
    pub fn count(label: &str, done: usize, total: usize, theme: &'a Theme) -> Self {
        let ratio = if total == 0 { 0.0 } else { done as f64 / total as f64 };
        Self::new(label, ratio, format!("{done} / {total}"), theme)
    }

    pub fn percent(label: &str, percent: u32, theme: &'a Theme) -> Self {
        Self::new(label, f64::from(percent) / 100.0, format!("{percent}%"), theme)
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64) as u16;

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(self.value.chars().count() as u16)) / 2;
        buf.set_string(label_x, inner.y, &self.value, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_count_bar_shows_value() {
        let theme = Theme::light();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::count("Words", 3, 15, &theme).render(area, &mut buf);
        assert!(row_text(&buf, 0).contains("Words"));
        assert!(row_text(&buf, 1).contains("3 / 15"));
    }

    #[test]
    fn test_zero_total_is_empty_bar() {
        let theme = Theme::light();
        let bar = ProgressBar::count("Sentences", 0, 0, &theme);
        assert_eq!(bar.ratio, 0.0);
        assert_eq!(ProgressBar::percent("Accuracy", 250, &theme).ratio, 1.0);
    }
}
