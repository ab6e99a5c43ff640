//! Backend configuration parsing
//!
//! Reads the optional `~/.threat-hunter/config.yaml` file. Every field has a
//! default so an absent default file simply yields [`BackendConfig::default`].

use crate::error::ClientError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default backend address (the capture service listens on port 5000)
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Socket.IO namespace the capture service emits on
pub const DEFAULT_NAMESPACE: &str = "/packets";

/// Event name carrying one captured record
pub const DEFAULT_EVENT: &str = "packet";

/// Backend client configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// HTTP base URL for the control and prediction endpoints
    pub base_url: String,
    /// Push feed URL; derived from `base_url` when unset
    pub feed_url: Option<String>,
    /// Socket.IO namespace
    pub namespace: String,
    /// Socket.IO event name carrying records
    pub event: String,
    /// Per-request timeout in seconds (0 disables the timeout)
    pub request_timeout_secs: u64,
    /// Endpoint paths
    pub endpoints: Endpoints,
}

/// Relative paths of the backend endpoints
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub start_capture: String,
    pub stop_capture: String,
    pub packet_predictions: String,
    pub file_predictions: String,
    pub malicious_predictions: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            start_capture: "/start-sniffing".to_string(),
            stop_capture: "/stop-sniffing".to_string(),
            packet_predictions: "/run-predictions".to_string(),
            file_predictions: "/run-file-predictions".to_string(),
            malicious_predictions: "/run-malicious-predictions".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            feed_url: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            event: DEFAULT_EVENT.to_string(),
            request_timeout_secs: 120,
            endpoints: Endpoints::default(),
        }
    }
}

impl BackendConfig {
    /// Load configuration from the default location, falling back to
    /// defaults when the file does not exist
    pub fn load_default() -> Result<Self, ClientError> {
        let path = Self::default_path()?;
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ClientError> {
        if !path.exists() {
            return Err(ClientError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ClientError> {
        // An empty file deserializes to null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: BackendConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config path (~/.threat-hunter/config.yaml)
    pub fn default_path() -> Result<PathBuf, ClientError> {
        let home = dirs_next::home_dir().ok_or(ClientError::NoHomeDirectory)?;
        Ok(home.join(".threat-hunter").join("config.yaml"))
    }

    /// Check that the URLs parse and the namespace is usable
    pub fn validate(&self) -> Result<(), ClientError> {
        check_url("base_url", &self.base_url)?;
        if let Some(feed) = &self.feed_url {
            check_url("feed_url", feed)?;
        }
        if !self.namespace.starts_with('/') {
            let msg = format!("namespace must start with '/': {}", self.namespace);
            return Err(ClientError::ConfigInvalid(msg));
        }
        if self.event.is_empty() {
            let msg = "event must not be empty".to_string();
            return Err(ClientError::ConfigInvalid(msg));
        }
        Ok(())
    }

    /// Request timeout, if enabled
    pub fn request_timeout(&self) -> Option<Duration> {
        let secs = self.request_timeout_secs;
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    /// WebSocket URL for the Engine.IO transport
    ///
    /// Uses `feed_url` verbatim when set; otherwise swaps the scheme of
    /// `base_url` to ws/wss and appends the Engine.IO v4 handshake path.
    pub fn websocket_url(&self) -> Result<String, ClientError> {
        if let Some(feed) = &self.feed_url {
            return Ok(feed.clone());
        }
        let mut url = url::Url::parse(&self.base_url)?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        if url.set_scheme(scheme).is_err() {
            let msg = format!("cannot derive feed URL from {}", self.base_url);
            return Err(ClientError::ConfigInvalid(msg));
        }
        url.set_path("/socket.io/");
        url.set_query(Some("EIO=4&transport=websocket"));
        Ok(url.to_string())
    }
}

fn check_url(field: &str, value: &str) -> Result<(), ClientError> {
    match url::Url::parse(value) {
        Ok(_) => Ok(()),
        Err(e) => Err(ClientError::ConfigInvalid(format!("{}: {}", field, e))),
    }
}
