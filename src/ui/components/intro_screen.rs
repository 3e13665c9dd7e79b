use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::app::intro::{Intro, IntroStage, NAME_MAX_LEN};
use crate::content::Language;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

const LOGO: [&str; 3] = [
    "╦  ╦╔╗╔╔═╗╔═╗  ╔╦╗╔═╗╔═╗╦╔═",
    "║  ║║║║║ ╦║ ║   ║║║╣ ║  ╠╩╗",
    "╩═╝╩╝╚╝╚═╝╚═╝  ═╩╝╚═╝╚═╝╩ ╩",
];

pub struct IntroScreen<'a> {
    pub intro: &'a Intro,
    pub theme: &'a Theme,
}

impl IntroScreen<'_> {
    fn welcome_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let mut lines: Vec<Line> = LOGO
            .iter()
            .map(|row| {
                Line::from(Span::styled(
                    *row,
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        lines.push(Line::from(""));
        let greetings = Language::ALL
            .iter()
            .map(|l| l.greeting())
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(Line::from(Span::styled(greetings, Style::default().fg(colors.fg()))));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Enter] continue",
            Style::default().fg(colors.text_dim()),
        )));
        lines
    }

    fn login_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let field = format!("{:<width$}", format!("{}_", self.intro.name()), width = NAME_MAX_LEN + 1);
        vec![
            Line::from(Span::styled(
                "Welcome to LingoDeck",
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "What should we call you?",
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                field,
                Style::default()
                    .fg(colors.fg())
                    .bg(colors.accent_dim())
                    .add_modifier(Modifier::UNDERLINED),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] start learning  (leave blank to skip)",
                Style::default().fg(colors.text_dim()),
            )),
        ]
    }

    fn exiting_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let text = if self.intro.name().is_empty() {
            "Let's get started!".to_string()
        } else {
            format!("Let's get started, {}!", self.intro.name())
        };
        vec![Line::from(Span::styled(
            text,
            Style::default().fg(colors.success()).add_modifier(Modifier::BOLD),
        ))]
    }
}

impl Widget for IntroScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        buf.set_style(area, Style::default().bg(colors.bg()));

        let lines = match self.intro.stage() {
            IntroStage::Welcome => self.welcome_lines(),
            IntroStage::Login => self.login_lines(),
            IntroStage::Exiting => self.exiting_lines(),
        };
        let height = lines.len() as u16 + 2;
        let rect = centered_rect(area.width.min(56), height, area);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(colors.border_focused()))
                    .style(Style::default().bg(colors.panel())),
            )
            .render(rect, buf);
    }
}
