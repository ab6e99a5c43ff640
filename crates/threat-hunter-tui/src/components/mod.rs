//! Component system for the threat-hunter TUI
//!
//! Based on the ratatui Component template pattern. Components own only
//! presentation state (scroll offsets); everything else is read from the
//! [`Dashboard`] passed to `draw`.

pub mod controls;
pub mod file_results;
pub mod intro;
pub mod packet_flow;
pub mod predictions;

pub use controls::ControlsComponent;
pub use file_results::FileResultsComponent;
pub use intro::IntroComponent;
pub use packet_flow::PacketFlowComponent;
pub use predictions::PredictionsComponent;

use crate::action::Action;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use threat_hunter_core::Dashboard;

/// Trait for UI components
pub trait Component {
    /// Handle key events and optionally produce actions
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render the component from the current dashboard state
    fn draw(&mut self, frame: &mut Frame, area: Rect, dashboard: &Dashboard) -> Result<()>;
}
