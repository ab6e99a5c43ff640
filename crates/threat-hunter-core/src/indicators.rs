//! Status indicators for consistent UI representation
//!
//! Every controller phase, the feed connection and each prediction label
//! maps onto one [`HealthIndicator`] so panels color them the same way.

use crate::sniffer::SniffPhase;
use crate::workflow::WorkflowPhase;
use serde::{Deserialize, Serialize};
use threat_hunter_client::Label;

/// Universal status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HealthIndicator {
    /// Operational / safe
    Healthy,
    /// Needs a look
    Warning,
    /// Failed or dangerous
    Error,
    /// Work in progress
    Pending,
    /// Neutral
    Info,
    #[default]
    Unknown,
}

impl HealthIndicator {
    /// Unicode symbol for this status
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthIndicator::Healthy => "●",
            HealthIndicator::Warning => "◐",
            HealthIndicator::Error => "✗",
            HealthIndicator::Pending => "◌",
            HealthIndicator::Info => "○",
            HealthIndicator::Unknown => "?",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthIndicator::Healthy => "Healthy",
            HealthIndicator::Warning => "Warning",
            HealthIndicator::Error => "Error",
            HealthIndicator::Pending => "Pending",
            HealthIndicator::Info => "Info",
            HealthIndicator::Unknown => "Unknown",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthIndicator::Healthy)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, HealthIndicator::Error)
    }
}

impl std::fmt::Display for HealthIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Types that can report a status indicator
pub trait HasHealth {
    fn health(&self) -> HealthIndicator;

    fn is_healthy(&self) -> bool {
        self.health().is_healthy()
    }
}

/// State of the live packet feed subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConnectionState {
    /// Subscription requested, namespace not yet joined
    Connecting,
    Connected,
    Disconnected,
    /// No subscription attempted yet
    #[default]
    Unknown,
}

impl ConnectionState {
    pub fn symbol(&self) -> &'static str {
        self.health().symbol()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Unknown => "Not connected",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl HasHealth for ConnectionState {
    fn health(&self) -> HealthIndicator {
        match self {
            ConnectionState::Connected => HealthIndicator::Healthy,
            ConnectionState::Connecting => HealthIndicator::Pending,
            ConnectionState::Disconnected => HealthIndicator::Error,
            ConnectionState::Unknown => HealthIndicator::Unknown,
        }
    }
}

impl HasHealth for SniffPhase {
    fn health(&self) -> HealthIndicator {
        match self {
            SniffPhase::Idle => HealthIndicator::Info,
            SniffPhase::Running => HealthIndicator::Healthy,
            SniffPhase::Stopping => HealthIndicator::Pending,
            SniffPhase::Stopped => HealthIndicator::Info,
            SniffPhase::Failed(_) => HealthIndicator::Error,
        }
    }
}

impl HasHealth for WorkflowPhase {
    fn health(&self) -> HealthIndicator {
        match self {
            WorkflowPhase::Idle => HealthIndicator::Info,
            WorkflowPhase::Running => HealthIndicator::Pending,
            WorkflowPhase::Done => HealthIndicator::Healthy,
        }
    }
}

impl HasHealth for Label {
    fn health(&self) -> HealthIndicator {
        match self {
            Label::Safe => HealthIndicator::Healthy,
            Label::Dangerous => HealthIndicator::Error,
        }
    }
}
