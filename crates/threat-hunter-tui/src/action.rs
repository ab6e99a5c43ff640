//! Actions for the threat-hunter TUI
//!
//! Actions represent events that can modify application state.

use threat_hunter_core::PredictionKind;

/// Actions that can be dispatched in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,

    // Capture control
    /// Start from Idle, stop from Running, retry from Failed
    ToggleSniffing,
    DismissSniffError,

    // Predictions
    Run(PredictionKind),
    /// Abandon the prediction running behind the current panel
    Cancel,
    NextPage,
    PrevPage,

    // UI state
    Tick,
    Resize(u16, u16),
}
