//! threat-hunter-tui: terminal front end for threat-hunter
//!
//! Renders the [`Dashboard`](threat_hunter_core::Dashboard) with ratatui and
//! drives it from keyboard input, backend responses and the packet feed.

pub mod action;
pub mod app;
pub mod components;
pub mod tui;
pub mod ui_ext;

pub use app::App;
