//! Intro component - landing panel before any action

use crate::components::Component;
use color_eyre::Result;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use threat_hunter_core::Dashboard;

const TAGLINE: &str =
    "Live packet capture with per-packet, per-file and malicious traffic classification";

/// Landing panel with a short how-to
#[derive(Debug, Default)]
pub struct IntroComponent;

impl IntroComponent {
    pub fn new() -> Self {
        Self
    }

    fn key_line(key: &'static str, text: &'static str) -> Line<'static> {
        Line::from(vec![
            Span::raw("  Press ").dim(),
            Span::raw(key).fg(Color::Yellow),
            Span::raw(format!(" {}", text)).dim(),
        ])
    }
}

impl Component for IntroComponent {
    fn draw(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) -> Result<()> {
        let title = Span::raw("Threat Hunter").white().bold();
        let mut lines = vec![
            Line::from(""),
            Line::from(title),
            Line::from(""),
            Line::from(Span::raw(TAGLINE).dim()),
            Line::from(""),
            Line::from(""),
            Self::key_line("s", "to start capturing packets"),
            Self::key_line("p", "to classify every captured packet"),
            Self::key_line("f", "to analyse the saved capture file"),
            Self::key_line("m", "to run the malicious traffic model"),
            Self::key_line("c", "to cancel a running prediction"),
            Self::key_line("q", "to quit"),
        ];

        let received = dashboard.buffer().total_received();
        if received > 0 {
            let text = format!("{} packets received so far", received);
            lines.push(Line::from(""));
            lines.push(Line::from(Span::raw(text).fg(Color::Cyan)));
        }

        let content = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::NONE));
        frame.render_widget(content, area);

        Ok(())
    }
}
