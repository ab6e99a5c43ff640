//! Control strip: header, capture/prediction buttons, status line and footer

use crate::action::Action;
use crate::components::Component;
use crate::ui_ext::{ConnectionStateExt, HealthIndicatorExt, button_style, workflow_button_style};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use threat_hunter_core::{
    Dashboard, HasHealth, HealthIndicator, PredictionKind, SniffPhase, ViewMode, WorkflowPhase,
    pluralize,
};

/// Most relevant error for the status line
fn status_error(dashboard: &Dashboard) -> Option<String> {
    let sniffer = dashboard.sniffer();
    if let SniffPhase::Failed(message) = sniffer.phase() {
        return Some(format!("Stop failed: {} ([s] retry, [x] dismiss)", message));
    }
    if let Some(error) = sniffer.last_error() {
        return Some(format!("Capture: {}", error));
    }
    for kind in PredictionKind::ALL {
        if let Some(error) = dashboard.last_error(kind) {
            return Some(format!("{}: {}", kind.idle_label(), error));
        }
    }
    None
}

/// Global key handling plus the chrome around the main panel
#[derive(Debug, Default)]
pub struct ControlsComponent;

impl ControlsComponent {
    pub fn new() -> Self {
        Self
    }

    /// Split the screen into header, buttons, main panel, status and footer
    pub fn layout(area: Rect) -> [Rect; 5] {
        let chunks = Layout::vertical([
            Constraint::Length(2), // Header
            Constraint::Length(3), // Buttons
            Constraint::Min(0),    // Panel
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .split(area);
        [chunks[0], chunks[1], chunks[2], chunks[3], chunks[4]]
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let feed = dashboard.feed_state();
        let (symbol, color) = feed.symbol_and_color();
        let buffer = dashboard.buffer();

        let title_style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
        let feed_text = format!("{} {}", symbol, feed.label());
        let capacity = pluralize(buffer.capacity(), "packet", "packets");
        let buffered = format!("  {} / {} buffered", buffer.len(), capacity);

        let line = Line::from(vec![
            Span::styled(" threat-hunter ", title_style),
            Span::styled(version, dim),
            Span::raw("  "),
            Span::styled(dashboard.view().title(), Style::default().fg(Color::White)),
            Span::raw("    feed "),
            Span::styled(feed_text, Style::default().fg(color)),
            Span::styled(buffered, dim),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn draw_buttons(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

        let phase_health = dashboard.sniffer().phase().health();
        let sniff_style = button_style(dashboard.sniff_enabled(), phase_health);
        let sniff_label = dashboard.sniff_label();
        self.draw_button(frame, columns[0], "s", sniff_label, sniff_style);

        let keys = ["p", "f", "m"];
        for (i, kind) in PredictionKind::ALL.into_iter().enumerate() {
            let style = workflow_button_style(dashboard.phase(kind));
            let label = dashboard.run_label(kind);
            self.draw_button(frame, columns[i + 1], keys[i], label, style);
        }
    }

    fn draw_button(&self, frame: &mut Frame, area: Rect, key: &str, label: &str, style: Style) {
        let line = Line::from(vec![
            Span::styled(format!("[{}] ", key), Style::default().fg(Color::Yellow)),
            Span::styled(label.to_string(), style),
        ]);
        let border = style.fg.unwrap_or(Color::DarkGray);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let error_style = Style::default().fg(HealthIndicator::Error.color());
        let saved_style = Style::default().fg(Color::Green);
        let completed = dashboard.sniffer().capture_completed();

        let line = match status_error(dashboard) {
            Some(text) => Line::from(Span::styled(format!(" {}", text), error_style)),
            None if completed => Line::from(Span::styled(" Capture saved", saved_style)),
            None => Line::from(""),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let key = |k: &'static str| Span::styled(k, bold);

        let mut spans = vec![
            key(" [s]"),
            Span::raw(" sniff  "),
            key("[p/f/m]"),
            Span::raw(" run  "),
        ];
        let shown = PredictionKind::for_view(dashboard.view());
        if shown.is_some_and(|kind| dashboard.phase(kind) == WorkflowPhase::Running) {
            spans.push(key("[c]"));
            spans.push(Span::raw(" cancel  "));
        }
        if dashboard.view().is_paged() {
            spans.push(key("[h/l]"));
            spans.push(Span::raw(" page  "));
        }
        if dashboard.view() == ViewMode::Sniffing {
            spans.push(key("[j/k]"));
            spans.push(Span::raw(" scroll  "));
        }
        spans.push(key("[q]"));
        spans.push(Span::raw(" quit"));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for ControlsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('s') => Action::ToggleSniffing,
            KeyCode::Char('x') => Action::DismissSniffError,
            KeyCode::Char('p') => Action::Run(PredictionKind::Packets),
            KeyCode::Char('f') => Action::Run(PredictionKind::File),
            KeyCode::Char('m') => Action::Run(PredictionKind::Malicious),
            KeyCode::Char('c') => Action::Cancel,
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    /// Draws everything but the main panel; `area` is the whole screen
    fn draw(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) -> Result<()> {
        let [header, buttons, _panel, status, footer] = Self::layout(area);
        self.draw_header(frame, header, dashboard);
        self.draw_buttons(frame, buttons, dashboard);
        self.draw_status(frame, status, dashboard);
        self.draw_footer(frame, footer, dashboard);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::time::Instant;
    use threat_hunter_client::ClientError;

    fn action_for(c: char) -> Option<Action> {
        let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        ControlsComponent::new().handle_key_event(key).unwrap()
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(action_for('s'), Some(Action::ToggleSniffing));
        assert_eq!(action_for('f'), Some(Action::Run(PredictionKind::File)));
        assert_eq!(action_for('c'), Some(Action::Cancel));
        assert_eq!(action_for('q'), Some(Action::Quit));
        assert_eq!(action_for('z'), None);
    }

    #[test]
    fn test_layout_reserves_chrome() {
        let area = Rect::new(0, 0, 80, 30);
        let [header, buttons, panel, status, footer] = ControlsComponent::layout(area);
        assert_eq!(header.height, 2);
        assert_eq!(buttons.height, 3);
        assert_eq!(status.height, 1);
        assert_eq!(footer.height, 1);
        assert_eq!(panel.height, 23);
    }

    #[test]
    fn test_status_error_priority() {
        let mut dash = Dashboard::new();
        assert_eq!(status_error(&dash), None);

        let ticket = dash.run(PredictionKind::File).unwrap();
        let err = ClientError::Contract("bad body".to_string());
        dash.complete_file(ticket, Err::<_, ClientError>(err), Instant::now());
        let status = status_error(&dash).unwrap();
        assert!(status.starts_with("Run File: "));

        dash.start_sniffing().unwrap();
        let stop = dash.stop_sniffing().unwrap();
        dash.sniff_stop_completed(stop, Err::<(), _>("refused"), Instant::now());
        let status = status_error(&dash).unwrap();
        assert!(status.starts_with("Stop failed: refused"));
    }
}
