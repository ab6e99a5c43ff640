//! Packet flow component
//!
//! Live table of buffered records, newest at the bottom. Follows the feed
//! unless the user scrolls back.

use crate::action::Action;
use crate::components::Component;
use crate::ui_ext::ConnectionStateExt;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use threat_hunter_core::{
    Dashboard, EMPTY_PLACEHOLDER, StreamBuffer, format_arrival_time, format_scalar,
    format_time_ago, truncate_string,
};

/// Widest a single field cell is allowed to get
const MAX_CELL_CHARS: usize = 24;

/// Live packet table
#[derive(Debug, Default)]
pub struct PacketFlowComponent {
    /// Rows scrolled back from the newest record; 0 follows the feed
    scroll_back: usize,
}

impl PacketFlowComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_following(&self) -> bool {
        self.scroll_back == 0
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    /// Column names from the newest record, `bad_packet` excluded
    fn columns(buffer: &StreamBuffer) -> Vec<String> {
        buffer
            .latest()
            .map(|latest| {
                latest
                    .record
                    .display_fields()
                    .map(|(name, _)| name.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Index range of the rows to show for a given viewport height
    fn window(&mut self, len: usize, visible: usize) -> (usize, usize) {
        self.scroll_back = self.scroll_back.min(len.saturating_sub(visible));
        let end = len - self.scroll_back;
        let start = end.saturating_sub(visible);
        (start, end)
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let buffer = dashboard.buffer();
        let feed = dashboard.feed_state();
        let (symbol, color) = feed.symbol_and_color();

        let dim = Style::default().add_modifier(Modifier::DIM);
        let state = format!(" {} {}", symbol, feed.label());
        let counts = format!(
            "   {} received, {} buffered, {} dropped",
            buffer.total_received(),
            buffer.len(),
            buffer.evicted()
        );
        let mut spans = vec![
            Span::styled(state, Style::default().fg(color)),
            Span::styled(counts, dim),
        ];
        if let Some(latest) = buffer.latest() {
            let ago = format_time_ago(latest.received_at);
            spans.push(Span::styled(format!("   last packet {}", ago), dim));
        }
        if !self.is_following() {
            let yellow = Style::default().fg(Color::Yellow);
            let paused = format!("   paused ({} back)", self.scroll_back);
            spans.push(Span::styled(paused, yellow));
        }
        if dashboard.sniffer().capture_completed() {
            let bold = Style::default().add_modifier(Modifier::BOLD);
            spans.push(Span::styled("   Capture saved", bold.fg(Color::Green)));
        }
        if let Some(reason) = dashboard.feed_error() {
            let red = Style::default().fg(Color::Red);
            spans.push(Span::styled(format!("   ({})", reason), red));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let buffer = dashboard.buffer();
        let block = Block::default()
            .title(" Packet Flow ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        if buffer.is_empty() {
            let hint = if dashboard.sniffer().phase().can_start() {
                "No packets yet. Press s to start capturing."
            } else {
                "Waiting for packets…"
            };
            let para = Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(para, area);
            return;
        }

        let columns = Self::columns(buffer);
        // Borders plus header row
        let visible = area.height.saturating_sub(3) as usize;
        let (start, end) = self.window(buffer.len(), visible);
        let dim = Style::default().fg(Color::DarkGray);

        let rows: Vec<Row> = buffer
            .iter()
            .skip(start)
            .take(end - start)
            .map(|entry| {
                let mut cells = vec![
                    Cell::from(entry.seq.to_string()).style(dim),
                    Cell::from(format_arrival_time(entry.received_at)),
                ];
                cells.extend(columns.iter().map(|name| {
                    let text = entry
                        .record
                        .get(name)
                        .map(format_scalar)
                        .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string());
                    Cell::from(truncate_string(&text, MAX_CELL_CHARS))
                }));
                let style = if entry.record.is_bad_packet() {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Row::new(cells).style(style)
            })
            .collect();

        let mut header_cells = vec![Cell::from("#"), Cell::from("TIME")];
        header_cells.extend(columns.iter().map(|name| Cell::from(name.to_uppercase())));
        let header_style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let header = Row::new(header_cells).style(header_style);

        let mut widths = vec![Constraint::Length(7), Constraint::Length(9)];
        widths.extend(columns.iter().map(|_| Constraint::Fill(1)));

        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
    }
}

impl Component for PacketFlowComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_back = self.scroll_back.saturating_add(1);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_back = self.scroll_back.saturating_sub(1);
            }
            KeyCode::PageUp => {
                self.scroll_back = self.scroll_back.saturating_add(20);
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(20);
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.scroll_back = 0;
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) -> Result<()> {
        let chunks = Layout::vertical([
            Constraint::Length(1), // Feed status
            Constraint::Min(0),    // Table
        ])
        .split(area);

        self.draw_status(frame, chunks[0], dashboard);
        self.draw_table(frame, chunks[1], dashboard);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use serde_json::{Map, json};
    use threat_hunter_client::Record;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_window_follows_newest() {
        let mut flow = PacketFlowComponent::new();
        assert_eq!(flow.window(100, 10), (90, 100));
        assert_eq!(flow.window(5, 10), (0, 5));
    }

    #[test]
    fn test_scroll_back_is_clamped() {
        let mut flow = PacketFlowComponent::new();
        for _ in 0..500 {
            flow.handle_key_event(key(KeyCode::Up)).unwrap();
        }
        assert!(!flow.is_following());
        assert_eq!(flow.window(100, 10), (0, 10));
        assert_eq!(flow.scroll_back(), 90);

        flow.handle_key_event(key(KeyCode::End)).unwrap();
        assert!(flow.is_following());
    }

    #[test]
    fn test_columns_skip_bad_packet() {
        let mut buffer = StreamBuffer::with_capacity(4);
        let mut fields = Map::new();
        fields.insert("Protocol".to_string(), json!("TCP"));
        fields.insert("bad_packet".to_string(), json!(0));
        fields.insert("Length".to_string(), json!(60));
        buffer.push(Record::new(fields));

        let columns = PacketFlowComponent::columns(&buffer);
        assert_eq!(columns, vec!["Protocol", "Length"]);
    }
}
