//! Error types for the threat-hunter backend client

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors returned by [`BackendClient`](crate::BackendClient) calls and the
/// push feed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A successful response that lacks a required field
    #[error("Malformed response: {0}")]
    Contract(String),

    /// Push feed protocol violation (bad frame, connect refused, ...)
    #[error("Feed error: {0}")]
    Feed(String),

    /// WebSocket layer failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[source] Box<tungstenite::Error>),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid config: {0}")]
    ConfigInvalid(String),

    #[error("Could not determine home directory")]
    NoHomeDirectory,
}

impl ClientError {
    /// HTTP status code, if the backend produced one
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<tungstenite::Error> for ClientError {
    fn from(e: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(e))
    }
}
