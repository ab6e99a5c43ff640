//! Which result panel is on screen

use serde::{Deserialize, Serialize};

/// The five mutually exclusive main panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Landing panel shown before any action
    #[default]
    Intro,
    /// Live packet flow
    Sniffing,
    PacketResults,
    FileResults,
    MaliciousResults,
}

impl ViewMode {
    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::Intro => "Threat Hunter",
            ViewMode::Sniffing => "Packet Flow",
            ViewMode::PacketResults => "Packet Predictions",
            ViewMode::FileResults => "File Analysis",
            ViewMode::MaliciousResults => "Malicious Packets",
        }
    }

    /// Panels backed by a paged label table
    pub fn is_paged(&self) -> bool {
        matches!(self, ViewMode::PacketResults | ViewMode::MaliciousResults)
    }
}

/// Holder of the current [`ViewMode`]
///
/// Only the dashboard switches views, as a side effect of an accepted
/// user action.
#[derive(Debug, Clone, Default)]
pub struct ViewSelector {
    mode: ViewMode,
}

impl ViewSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is(&self, mode: ViewMode) -> bool {
        self.mode == mode
    }

    pub(crate) fn select(&mut self, mode: ViewMode) {
        if self.mode != mode {
            tracing::debug!("view: {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}
