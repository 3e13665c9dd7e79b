use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap};

use crate::engine::tooltip::{ArrowEdge, TooltipPlacement};
use crate::engine::tutorial::{LAST_STEP, STEPS, TargetLookup, Tutorial};
use crate::ui::layout::{bounds_to_rect, centered_rect};
use crate::ui::theme::Theme;

pub const BANNER_TEXT: &str = "Tour complete! Press ? to replay.";

/// Tutorial overlay, drawn over the whole terminal in screen coordinates.
pub struct TourOverlay<'a> {
    pub tutorial: &'a Tutorial,
    /// Placement in page coordinates; shifted up by `scroll` to draw.
    pub placement: Option<TooltipPlacement>,
    pub scroll: i32,
    pub theme: &'a Theme,
}

impl TourOverlay<'_> {
    fn render_pending(&self, step: usize, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let rect = centered_rect(30, 3, area);
        Clear.render(rect, buf);
        Paragraph::new(format!("Preparing step {} of {}…", step + 1, STEPS.len()))
            .alignment(Alignment::Center)
            .style(Style::default().fg(colors.fg()).bg(colors.panel()))
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(colors.accent())),
            )
            .render(rect, buf);
    }

    fn render_step(&self, step: usize, placement: TooltipPlacement, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let target = placement.target.translate(0, -self.scroll);
        let tooltip = placement.tooltip.translate(0, -self.scroll);

        if let Some(rect) = bounds_to_rect(target, area) {
            Block::bordered()
                .border_type(BorderType::Double)
                .border_style(
                    Style::default()
                        .fg(colors.highlight())
                        .add_modifier(Modifier::BOLD),
                )
                .render(rect, buf);
        }

        let Some(rect) = bounds_to_rect(tooltip, area) else {
            return;
        };
        let info = &STEPS[step];
        let footer = if step == LAST_STEP {
            "[←] back  [Enter] finish  [Esc] skip"
        } else if step == 0 {
            "[→/Enter] next  [Esc] skip"
        } else {
            "[←] back  [→/Enter] next  [Esc] skip"
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors.accent()))
            .title(Span::styled(
                format!(" Step {}/{} ", step + 1, STEPS.len()),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(Span::styled(
                footer,
                Style::default().fg(colors.text_dim()),
            )))
            .style(Style::default().bg(colors.panel()));
        Clear.render(rect, buf);
        let lines = vec![
            Line::from(Span::styled(
                info.title,
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(info.content, Style::default().fg(colors.fg()))),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(rect, buf);

        let arrow_x = i64::from(tooltip.left) + i64::from(placement.arrow_column());
        let (glyph, arrow_y) = match placement.arrow_edge {
            ArrowEdge::Top => ("▲", i64::from(tooltip.top) - 1),
            ArrowEdge::Bottom => ("▼", i64::from(tooltip.bottom())),
        };
        if let (Ok(x), Ok(y)) = (u16::try_from(arrow_x), u16::try_from(arrow_y))
            && x < area.right()
            && y < area.bottom()
        {
            buf.set_string(x, y, glyph, Style::default().fg(colors.accent()));
        }
    }

    fn render_banner(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let width = BANNER_TEXT.chars().count() as u16 + 4;
        let rect = centered_rect(width, 3, Rect::new(area.x, area.y, area.width, 3.min(area.height)));
        Clear.render(rect, buf);
        Paragraph::new(BANNER_TEXT)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(colors.success())
                    .bg(colors.panel())
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(colors.success())),
            )
            .render(rect, buf);
    }
}

impl Widget for TourOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.tutorial.banner_visible() {
            self.render_banner(area, buf);
            return;
        }
        let (Some(step), Some(lookup)) = (self.tutorial.step(), self.tutorial.lookup()) else {
            return;
        };
        match (lookup, self.placement) {
            (TargetLookup::Pending { .. }, _) | (_, None) => self.render_pending(step, area, buf),
            (_, Some(placement)) => self.render_step(step, placement, area, buf),
        }
    }
}
