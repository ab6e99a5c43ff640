//! UI extensions for threat-hunter-core types
//!
//! Ratatui colors and styles for the UI-agnostic status types.

use ratatui::style::{Color, Modifier, Style};
use threat_hunter_client::Label;
use threat_hunter_core::{ConnectionState, HasHealth, HealthIndicator, WorkflowPhase};

/// Extension trait for HealthIndicator to provide ratatui colors
pub trait HealthIndicatorExt {
    fn color(&self) -> Color;

    /// Get symbol and color together (common pattern)
    fn symbol_and_color(&self) -> (&'static str, Color);
}

impl HealthIndicatorExt for HealthIndicator {
    fn color(&self) -> Color {
        match self {
            HealthIndicator::Healthy => Color::Green,
            HealthIndicator::Warning => Color::Yellow,
            HealthIndicator::Error => Color::Red,
            HealthIndicator::Pending => Color::Cyan,
            HealthIndicator::Info => Color::Blue,
            HealthIndicator::Unknown => Color::DarkGray,
        }
    }

    fn symbol_and_color(&self) -> (&'static str, Color) {
        (self.symbol(), self.color())
    }
}

/// Extension trait for ConnectionState to provide ratatui colors
pub trait ConnectionStateExt {
    fn color(&self) -> Color;

    fn symbol_and_color(&self) -> (&'static str, Color);
}

impl ConnectionStateExt for ConnectionState {
    fn color(&self) -> Color {
        self.health().color()
    }

    fn symbol_and_color(&self) -> (&'static str, Color) {
        (self.symbol(), self.color())
    }
}

/// Extension trait for prediction labels
pub trait LabelExt {
    fn text(&self) -> &'static str;

    fn color(&self) -> Color;
}

impl LabelExt for Label {
    fn text(&self) -> &'static str {
        match self {
            Label::Safe => "Safe",
            Label::Dangerous => "Dangerous",
        }
    }

    fn color(&self) -> Color {
        self.health().color()
    }
}

/// Style of a control-strip button
pub fn button_style(enabled: bool, phase_health: HealthIndicator) -> Style {
    if !enabled {
        let dimmed = Style::default().fg(Color::DarkGray);
        return dimmed.add_modifier(Modifier::DIM);
    }
    let color = match phase_health {
        HealthIndicator::Info => Color::White,
        other => other.color(),
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style of a prediction button for its phase
pub fn workflow_button_style(phase: WorkflowPhase) -> Style {
    button_style(phase == WorkflowPhase::Idle, phase.health())
}
