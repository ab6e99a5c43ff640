//! Prediction table component
//!
//! One instance per paged workflow (per-packet and malicious). Shows the
//! FileKey, a short summary and the current page of labels.

use crate::action::Action;
use crate::components::Component;
use crate::ui_ext::LabelExt;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use threat_hunter_core::{
    Dashboard, PredictionKind, PredictionSet, Workflow, WorkflowPhase, format_file_key,
    truncate_string,
};

/// Longest model description shown in the summary
const MODEL_INFO_CHARS: usize = 80;

/// Paged label table for one prediction workflow
#[derive(Debug)]
pub struct PredictionsComponent {
    kind: PredictionKind,
}

impl PredictionsComponent {
    /// `kind` must be a paged workflow (per-packet or malicious)
    pub fn new(kind: PredictionKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> PredictionKind {
        self.kind
    }

    fn workflow<'a>(&self, dashboard: &'a Dashboard) -> &'a Workflow<PredictionSet> {
        match self.kind {
            PredictionKind::Malicious => dashboard.malicious_workflow(),
            _ => dashboard.packet_workflow(),
        }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            PredictionKind::Malicious => " Malicious Packets ",
            _ => " Packet Predictions ",
        }
    }

    /// Message shown when there is nothing to tabulate
    fn placeholder(&self, workflow: &Workflow<PredictionSet>) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        if workflow.phase() == WorkflowPhase::Running {
            let cyan = Style::default().fg(Color::Cyan);
            Line::from(Span::styled("Reasoning… ([c] cancel)", cyan))
        } else if let Some(error) = workflow.last_error() {
            let red = Style::default().fg(Color::Red);
            Line::from(Span::styled(format!("Request failed: {}", error), red))
        } else if workflow.has_result() {
            Line::from(Span::styled("The model returned no predictions.", dim))
        } else {
            let hint = format!("No results yet. Press {} to run.", self.run_key());
            Line::from(Span::styled(hint, dim))
        }
    }

    fn run_key(&self) -> &'static str {
        match self.kind {
            PredictionKind::Malicious => "m",
            _ => "p",
        }
    }

    fn draw_summary(
        &self,
        frame: &mut Frame,
        area: Rect,
        set: &PredictionSet,
        error: Option<&str>,
    ) {
        let dim = Style::default().add_modifier(Modifier::DIM);

        let key = format_file_key(set.file_key.as_deref());
        let key_line = Line::from(vec![Span::styled("  FileKey: ", dim), Span::raw(key)]);
        let mut lines = vec![key_line];

        let showing = format!("  {}", set.showing_text());
        let mut summary = vec![Span::styled(showing, dim)];
        if self.kind == PredictionKind::Packets {
            let dangerous = set.dangerous_count();
            let style = Style::default().add_modifier(Modifier::BOLD);
            let style = match dangerous {
                0 => style.fg(Color::Green),
                _ => style.fg(Color::Red),
            };
            let text = format!("{} dangerous ({})", dangerous, set.dangerous_percent());
            summary.push(Span::raw("   "));
            summary.push(Span::styled(text, style));
        }
        lines.push(Line::from(summary));

        if let Some(info) = &set.model_info {
            let info = truncate_string(&info.to_string(), MODEL_INFO_CHARS);
            let spans = vec![Span::styled("  Model: ", dim), Span::raw(info)];
            lines.push(Line::from(spans));
        }
        if let Some(error) = error {
            let red = Style::default().fg(Color::Red);
            let text = format!("  Last run failed: {}", error);
            lines.push(Line::from(Span::styled(text, red)));
        }

        let block = Block::default().title(self.title()).borders(Borders::TOP);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, set: &PredictionSet) {
        let rows: Vec<Row> = set
            .page_rows()
            .map(|(number, label)| {
                let style = Style::default().fg(label.color());
                Row::new(vec![
                    Cell::from(format!("Packet: {}", number)),
                    Cell::from(Span::styled(label.text(), style)),
                ])
            })
            .collect();

        let header_style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let header = Row::new(vec!["PACKET", "PREDICTION"]).style(header_style);

        let widths = [Constraint::Length(16), Constraint::Fill(1)];
        let block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
    }

    fn draw_pager(&self, frame: &mut Frame, area: Rect, set: &PredictionSet) {
        let labels = set.labels();
        let active = Style::default().fg(Color::Yellow);
        let inactive = Style::default().fg(Color::DarkGray);
        let arrow = |enabled: bool, text: &'static str| {
            let style = if enabled { active } else { inactive };
            Span::styled(text, style)
        };

        let line = Line::from(vec![
            arrow(labels.has_prev(), "[h] ‹ prev"),
            Span::raw(format!("   {}   ", set.page_text())),
            arrow(labels.has_next(), "next › [l]"),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

impl Component for PredictionsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('l') | KeyCode::Right => Ok(Some(Action::NextPage)),
            KeyCode::Char('h') | KeyCode::Left => Ok(Some(Action::PrevPage)),
            _ => Ok(None),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) -> Result<()> {
        let workflow = self.workflow(dashboard);
        let Some(set) = workflow.result().filter(|set| !set.is_empty()) else {
            let block = Block::default().title(self.title()).borders(Borders::ALL);
            let para = Paragraph::new(vec![Line::from(""), self.placeholder(workflow)])
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(para, area);
            return Ok(());
        };

        let has_model = u16::from(set.model_info.is_some());
        let has_error = u16::from(workflow.last_error().is_some());
        let summary_height = 3 + has_model + has_error;

        let chunks = Layout::vertical([
            Constraint::Length(summary_height), // FileKey + summary
            Constraint::Min(0),                 // Labels
            Constraint::Length(1),              // Pager
        ])
        .split(area);

        self.draw_summary(frame, chunks[0], set, workflow.last_error());
        self.draw_table(frame, chunks[1], set);
        self.draw_pager(frame, chunks[2], set);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::time::Instant;
    use threat_hunter_client::PacketPredictions;

    fn press(panel: &mut PredictionsComponent, code: KeyCode) -> Option<Action> {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        panel.handle_key_event(key).unwrap()
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_paging_keys() {
        let mut panel = PredictionsComponent::new(PredictionKind::Malicious);

        let (h, c) = (KeyCode::Char('h'), KeyCode::Char('c'));
        assert_eq!(press(&mut panel, KeyCode::Right), Some(Action::NextPage));
        assert_eq!(press(&mut panel, h), Some(Action::PrevPage));
        assert_eq!(press(&mut panel, c), None);
        assert_eq!(panel.kind(), PredictionKind::Malicious);
    }

    #[test]
    fn test_placeholder_follows_phase() {
        let mut dashboard = Dashboard::new();
        let panel = PredictionsComponent::new(PredictionKind::Packets);

        let line = panel.placeholder(panel.workflow(&dashboard));
        assert!(line_text(&line).contains("Press p"));

        let ticket = dashboard.run(PredictionKind::Packets).unwrap();
        let line = panel.placeholder(panel.workflow(&dashboard));
        assert!(line_text(&line).starts_with("Reasoning"));

        let failure = Err::<PacketPredictions, _>("gone");
        dashboard.complete_packets(ticket, failure, Instant::now());
        let line = panel.placeholder(panel.workflow(&dashboard));
        assert!(line_text(&line).starts_with("Request failed"));
    }

    #[test]
    fn test_workflow_binding() {
        let dashboard = Dashboard::new();
        let panel = PredictionsComponent::new(PredictionKind::Malicious);
        assert_eq!(panel.workflow(&dashboard).name(), "malicious-predictions");

        let panel = PredictionsComponent::new(PredictionKind::Packets);
        assert_eq!(panel.workflow(&dashboard).name(), "packet-predictions");
    }
}
