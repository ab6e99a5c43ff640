//! Error formatting utilities
//!
//! Turns [`ClientError`] values into short messages for the status line.

use threat_hunter_client::ClientError;

/// Format a ClientError into a user-friendly message
///
/// # Examples
///
/// ```
/// use threat_hunter_core::errors::format_client_error;
/// use threat_hunter_client::ClientError;
///
/// let error = ClientError::Status { status: 500, message: "model not loaded".to_string() };
/// assert_eq!(format_client_error(&error), "Backend error (500): model not loaded");
/// ```
pub fn format_client_error(error: &ClientError) -> String {
    match error {
        ClientError::Transport(e) => {
            if e.is_timeout() {
                "Request timed out - the model may still be working".to_string()
            } else if e.is_connect() {
                "Connection refused - is the backend running?".to_string()
            } else {
                format_transport_error(&e.to_string())
            }
        }
        ClientError::Status { status, message } => {
            format!("Backend error ({}): {}", status, message)
        }
        ClientError::Contract(msg) => format!("Unexpected response: {}", msg),
        ClientError::Feed(msg) => format!("Packet feed: {}", msg),
        ClientError::WebSocket(e) => format_transport_error(&e.to_string()),
        ClientError::ConfigNotFound(path) => format!("Config not found: {}", path),
        ClientError::ConfigInvalid(msg) => format!("Invalid config: {}", msg),
        _ => error.to_string(),
    }
}

/// Format a transport error message
fn format_transport_error(msg: &str) -> String {
    let lower = msg.to_lowercase();
    if lower.contains("refused") {
        "Connection refused - is the backend running?".to_string()
    } else if lower.contains("timeout") || lower.contains("timed out") {
        "Connection timed out".to_string()
    } else if lower.contains("reset") {
        "Connection reset by peer".to_string()
    } else if lower.contains("broken pipe") {
        "Connection closed unexpectedly".to_string()
    } else {
        format!("Transport error: {}", msg)
    }
}

/// Categorize an error for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Backend unreachable or connection dropped
    Network,
    /// Backend answered with an error status
    Server,
    /// Backend answered 2xx with an unusable body
    Contract,
    Config,
    Other,
}

impl ErrorCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Network",
            ErrorCategory::Server => "Server",
            ErrorCategory::Contract => "Response",
            ErrorCategory::Config => "Config",
            ErrorCategory::Other => "Error",
        }
    }
}

/// Categorize a ClientError
pub fn categorize_error(error: &ClientError) -> ErrorCategory {
    match error {
        ClientError::Transport(e) if e.status().is_some() => ErrorCategory::Server,
        ClientError::Transport(_) | ClientError::WebSocket(_) => ErrorCategory::Network,
        ClientError::Feed(_) => ErrorCategory::Network,
        ClientError::Status { .. } => ErrorCategory::Server,
        ClientError::Contract(_) | ClientError::Json(_) => ErrorCategory::Contract,
        ClientError::ConfigNotFound(_)
        | ClientError::ConfigInvalid(_)
        | ClientError::Yaml(_)
        | ClientError::Url(_)
        | ClientError::NoHomeDirectory => ErrorCategory::Config,
        _ => ErrorCategory::Other,
    }
}

/// One-line status text: "[Category] message"
pub fn describe_error(error: &ClientError) -> String {
    let category = categorize_error(error).label();
    format!("[{}] {}", category, format_client_error(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_transport_error() {
        let message = format_transport_error("tcp connect error: Connection refused");
        assert!(message.contains("refused"));

        let message = format_transport_error("operation timed out");
        assert_eq!(message, "Connection timed out");

        let message = format_transport_error("weird");
        assert!(message.starts_with("Transport error"));
    }

    #[test]
    fn test_format_contract_error() {
        let error = ClientError::Contract("missing field `predictions`".to_string());
        assert_eq!(
            format_client_error(&error),
            "Unexpected response: missing field `predictions`"
        );
    }

    #[test]
    fn test_categorize_errors() {
        let error = ClientError::Status {
            status: 500,
            message: "model not loaded".to_string(),
        };
        assert_eq!(categorize_error(&error), ErrorCategory::Server);

        let error = ClientError::Contract("bad".to_string());
        assert_eq!(categorize_error(&error), ErrorCategory::Contract);

        let error = ClientError::Feed("connect refused".to_string());
        assert_eq!(categorize_error(&error), ErrorCategory::Network);

        let error = ClientError::ConfigNotFound("/nope".to_string());
        assert_eq!(categorize_error(&error), ErrorCategory::Config);
    }

    #[test]
    fn test_describe_error() {
        let error = ClientError::Status {
            status: 400,
            message: "Sniffing not running".to_string(),
        };
        assert_eq!(
            describe_error(&error),
            "[Server] Backend error (400): Sniffing not running"
        );
    }
}
