//! threat-hunter-core: state coordinator for the threat-hunter dashboard
//!
//! Owns everything the dashboard knows between frames: the live record
//! buffer, the capture and prediction workflows, the selected panel and the
//! paging cursors. It has no terminal or network code of its own, so every
//! transition can be driven and checked from plain unit tests.
//!
//! # Modules
//!
//! - [`dashboard`] - The coordinator composing every controller
//! - [`stream_buffer`] - Bounded buffer of live feed records
//! - [`workflow`] - Generic prediction workflow (Idle / Running / Done)
//! - [`sniffer`] - Capture start/stop control
//! - [`view`] - Panel selection
//! - [`pagination`] - Fixed-size paging over result collections
//! - [`summary`] - Derived counts and percentages for result panels
//! - [`indicators`] - Status indicators for consistent UI representation
//! - [`formatting`] - Percentages, field values, times
//! - [`errors`] - Error formatting utilities
//! - [`constants`] - Capacities, page size, reset delay, button labels

pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod formatting;
pub mod indicators;
pub mod pagination;
pub mod sniffer;
pub mod stream_buffer;
pub mod summary;
pub mod view;
pub mod workflow;

// Re-export commonly used items at crate root
pub use dashboard::*;
pub use errors::*;
pub use formatting::*;
pub use indicators::*;
pub use pagination::*;
pub use sniffer::*;
pub use stream_buffer::*;
pub use summary::*;
pub use view::*;
pub use workflow::*;
