//! threat-hunter-client: SDK for the threat-hunter capture backend
//!
//! Typed access to the capture control and prediction endpoints plus a
//! Socket.IO subscriber for the live packet feed.
//!
//! # Example
//!
//! ```no_run
//! use threat_hunter_client::{BackendClient, BackendConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BackendClient::new(BackendConfig::default())?;
//!
//!     let result = client.packet_predictions().await?;
//!     let dangerous = result.predictions.iter().filter(|l| l.is_dangerous()).count();
//!     println!("{} of {} packets flagged", dangerous, result.predictions.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod socketio;
pub mod types;

pub use client::{BackendClient, parse_response, parse_status_only};
pub use config::{BackendConfig, Endpoints};
pub use error::ClientError;
pub use feed::{FeedEvent, PacketFeed};
pub use types::{
    BAD_PACKET_FIELD, FileMetrics, Label, MaliciousPredictions, PacketPredictions, Record,
    TopFeature,
};
