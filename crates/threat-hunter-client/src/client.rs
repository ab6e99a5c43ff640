//! High-level backend client
//!
//! Wraps the capture control and prediction endpoints behind typed calls.

use crate::config::BackendConfig;
use crate::error::ClientError;
use crate::types::{FileMetrics, MaliciousPredictions, PacketPredictions};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// High-level client for the capture/prediction backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    config: BackendConfig,
}

impl BackendClient {
    /// Create a new client from configuration
    pub fn new(config: BackendConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get(&self, path: &str) -> Result<(u16, String), ClientError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }

    // ==================== Capture control ====================

    /// Ask the backend to start a live capture
    pub async fn start_capture(&self) -> Result<(), ClientError> {
        let path = &self.config.endpoints.start_capture;
        let (status, body) = self.get(path).await?;
        parse_status_only(status, &body)
    }

    /// Ask the backend to stop the running capture
    ///
    /// Resolves once the backend has acknowledged the stop (the capture file
    /// is then being uploaded).
    pub async fn stop_capture(&self) -> Result<(), ClientError> {
        let path = &self.config.endpoints.stop_capture;
        let (status, body) = self.get(path).await?;
        parse_status_only(status, &body)
    }

    // ==================== Predictions ====================

    /// Classify every packet of the latest capture
    pub async fn packet_predictions(&self) -> Result<PacketPredictions, ClientError> {
        let path = &self.config.endpoints.packet_predictions;
        let (status, body) = self.get(path).await?;
        parse_response(status, &body)
    }

    /// Summarize the latest capture file
    pub async fn file_predictions(&self) -> Result<FileMetrics, ClientError> {
        let path = &self.config.endpoints.file_predictions;
        let (status, body) = self.get(path).await?;
        parse_response(status, &body)
    }

    /// Classify the malicious-subset dataset
    pub async fn malicious_predictions(&self) -> Result<MaliciousPredictions, ClientError> {
        let path = &self.config.endpoints.malicious_predictions;
        let (status, body) = self.get(path).await?;
        parse_response(status, &body)
    }
}

/// Pull a readable message out of an error body
///
/// The backend's error handler always answers `{"error": "..."}`; anything
/// else falls back to the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("error") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Parse a response where only the status matters
pub fn parse_status_only(status: u16, body: &str) -> Result<(), ClientError> {
    if is_success(status) {
        Ok(())
    } else {
        Err(ClientError::Status {
            status,
            message: error_message(body),
        })
    }
}

/// Parse a typed JSON response
///
/// Non-2xx maps to [`ClientError::Status`]; a 2xx body that does not match
/// the expected shape maps to [`ClientError::Contract`].
pub fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ClientError> {
    if !is_success(status) {
        return Err(ClientError::Status {
            status,
            message: error_message(body),
        });
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => return Err(ClientError::Contract(format!("body is not JSON: {}", e))),
    };

    // A 200 carrying only an error field is still a failed call
    if let Value::Object(map) = &value
        && map.len() == 1
        && let Some(Value::String(msg)) = map.get("error")
    {
        return Err(ClientError::Contract(msg.clone()));
    }

    serde_json::from_value(value).map_err(|e| ClientError::Contract(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Label;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const FILE_METRICS: &str = r#"{
        "total_packets": 1000,
        "anomalous_packets": 42,
        "percent_anomalous": 0.042,
        "top_features": [{"feature": "duration"}, {"feature": "bytes"}],
        "file_key": "k1"
    }"#;

    fn client_for(base_url: String) -> BackendClient {
        let config = BackendConfig {
            base_url,
            ..Default::default()
        };
        BackendClient::new(config).unwrap()
    }

    #[test]
    fn test_parse_predictions_success() {
        let body = r#"{"predictions":[0,1,1],"file_key":"abc","model_info":{"name":"rf"}}"#;
        let parsed: PacketPredictions = parse_response(200, body).unwrap();
        let expected = vec![Label::Safe, Label::Dangerous, Label::Dangerous];
        assert_eq!(parsed.predictions, expected);
        assert_eq!(parsed.file_key.as_deref(), Some("abc"));
        assert!(parsed.model_info.is_some());
    }

    #[test]
    fn test_parse_missing_field_is_contract_error() {
        let body = r#"{"file_key":"abc"}"#;
        let err = parse_response::<PacketPredictions>(200, body).unwrap_err();
        assert!(matches!(err, ClientError::Contract(_)));
    }

    #[test]
    fn test_parse_error_status_uses_error_field() {
        let body = r#"{"error":"model not loaded"}"#;
        let err = parse_response::<MaliciousPredictions>(500, body).unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model not loaded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_status_non_json_body() {
        let err = parse_status_only(502, "Bad Gateway\n").unwrap_err();
        assert_eq!(err.to_string(), "Backend returned 502: Bad Gateway");
        assert_eq!(err.http_status(), Some(502));
    }

    #[test]
    fn test_parse_ok_with_error_body() {
        let body = r#"{"error":"no capture files"}"#;
        let err = parse_response::<FileMetrics>(200, body).unwrap_err();
        assert!(matches!(err, ClientError::Contract(msg) if msg == "no capture files"));
    }

    #[test]
    fn test_parse_ok_with_extra_error_field_is_not_failure() {
        let body = r#"{"predictions":[1],"error":"stale model"}"#;
        let parsed: PacketPredictions = parse_response(200, body).unwrap();
        assert_eq!(parsed.predictions, vec![Label::Dangerous]);
    }

    #[test]
    fn test_parse_not_json() {
        let err = parse_response::<FileMetrics>(200, "<html>").unwrap_err();
        assert!(matches!(err, ClientError::Contract(_)));
    }

    /// Serve exactly one canned HTTP response on an ephemeral port
    async fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await.unwrap();
            let head = format!("HTTP/1.1 {}\r\n", status_line);
            let headers = format!(
                "content-type: application/json\r\ncontent-length: {}\r\n",
                body.len()
            );
            let response = format!("{}{}connection: close\r\n\r\n{}", head, headers, body);
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_file_predictions_over_http() {
        let base_url = one_shot_server("200 OK", FILE_METRICS).await;
        let client = client_for(base_url);

        let metrics = client.file_predictions().await.unwrap();
        assert_eq!(metrics.total_packets, 1000);
        assert_eq!(metrics.anomalous_packets, 42);
        assert_eq!(metrics.top_features.len(), 2);
        assert_eq!(metrics.top_features[0].feature, "duration");
        assert_eq!(metrics.file_key.as_deref(), Some("k1"));
    }

    #[tokio::test]
    async fn test_stop_capture_rejected() {
        let body = r#"{"error":"no capture running"}"#;
        let base_url = one_shot_server("400 Bad Request", body).await;
        let client = client_for(base_url);

        let err = client.stop_capture().await.unwrap_err();
        assert_eq!(err.http_status(), Some(400));
        assert!(err.to_string().contains("no capture running"));
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}", addr));
        let err = client.start_capture().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
