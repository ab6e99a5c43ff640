//! File analysis component - per-capture metrics and top features

use crate::components::Component;
use color_eyre::Result;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
};
use threat_hunter_core::{
    Dashboard, FileSummary, Workflow, WorkflowPhase, format_file_key, pluralize,
};

const TITLE: &str = " File Analysis ";

/// Label column plus value, as one metrics row
fn metric_line(name: &'static str, value: Span<'static>) -> Line<'static> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    Line::from(vec![Span::styled(name, dim), value])
}

/// Message shown before the first successful analysis
fn placeholder(workflow: &Workflow<FileSummary>) -> Line<'static> {
    if workflow.phase() == WorkflowPhase::Running {
        let cyan = Style::default().fg(Color::Cyan);
        Line::from(Span::styled("Reasoning… ([c] cancel)", cyan))
    } else if let Some(error) = workflow.last_error() {
        let red = Style::default().fg(Color::Red);
        Line::from(Span::styled(format!("Request failed: {}", error), red))
    } else {
        let dim = Style::default().fg(Color::DarkGray);
        let hint = "No results yet. Press f to analyse the capture file.";
        Line::from(Span::styled(hint, dim))
    }
}

/// Metrics panel for the per-file workflow
#[derive(Debug, Default)]
pub struct FileResultsComponent;

impl FileResultsComponent {
    pub fn new() -> Self {
        Self
    }

    fn draw_metrics(&self, frame: &mut Frame, area: Rect, summary: &FileSummary) {
        let color = if summary.anomalous_count > 0 {
            Color::Red
        } else {
            Color::Green
        };
        let plain = Style::default().fg(color);
        let bold = Style::default().fg(color).add_modifier(Modifier::BOLD);

        let key = format_file_key(summary.file_key.as_deref());
        let total = summary.total_count.to_string();
        let anomalous = summary.anomalous_count.to_string();
        let percent = summary.percent_text();

        let lines = vec![
            metric_line("  FileKey:            ", Span::raw(key)),
            metric_line("  Total packets:      ", Span::raw(total)),
            metric_line("  Anomalous packets:  ", Span::styled(anomalous, plain)),
            metric_line("  Percent anomalous:  ", Span::styled(percent, bold)),
        ];

        let block = Block::default().title(TITLE).borders(Borders::TOP);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_gauge(&self, frame: &mut Frame, area: Rect, summary: &FileSummary) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Red).bg(Color::DarkGray))
            .ratio(summary.anomalous_fraction().clamp(0.0, 1.0))
            .label(format!("{} anomalous", summary.percent_text()));
        frame.render_widget(gauge, area);
    }

    fn draw_features(&self, frame: &mut Frame, area: Rect, summary: &FileSummary) {
        let count = summary.ranked_features.len();
        let noun = pluralize(count, "feature", "features");
        let title = format!(" Top features ({}) ", noun);
        let block = Block::default().title(title).borders(Borders::TOP);

        if !summary.has_features() {
            let para = Paragraph::new("  No feature ranking returned")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(para, area);
            return;
        }

        let yellow = Style::default().fg(Color::Yellow);
        let items: Vec<ListItem> = summary
            .ranked_features
            .iter()
            .enumerate()
            .map(|(rank, feature)| {
                let number = Span::styled(format!("  {:>2}. ", rank + 1), yellow);
                ListItem::new(Line::from(vec![number, Span::raw(feature.clone())]))
            })
            .collect();
        frame.render_widget(List::new(items).block(block), area);
    }
}

impl Component for FileResultsComponent {
    fn draw(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) -> Result<()> {
        let workflow = dashboard.file_workflow();

        let Some(summary) = workflow.result() else {
            let block = Block::default().title(TITLE).borders(Borders::ALL);
            let para = Paragraph::new(vec![Line::from(""), placeholder(workflow)])
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(para, area);
            return Ok(());
        };

        let chunks = Layout::vertical([
            Constraint::Length(5), // Metrics
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Error / spacer
            Constraint::Min(0),    // Features
        ])
        .split(area);

        self.draw_metrics(frame, chunks[0], summary);
        self.draw_gauge(frame, chunks[1], summary);
        if let Some(error) = workflow.last_error() {
            let red = Style::default().fg(Color::Red);
            let text = format!("  Last run failed: {}", error);
            frame.render_widget(Paragraph::new(Span::styled(text, red)), chunks[2]);
        }
        self.draw_features(frame, chunks[3], summary);
        Ok(())
    }
}
