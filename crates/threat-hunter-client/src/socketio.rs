//! Minimal Socket.IO v5 / Engine.IO v4 text codec
//!
//! Only what a read-only subscriber needs: decoding the handshake, pings,
//! namespace connect/disconnect and events, and encoding connect and pong.
//! Binary attachments and acknowledgements are not supported.

use crate::error::ClientError;
use serde::Deserialize;
use serde_json::Value;

/// Message used when a CONNECT_ERROR carries no reason
const DEFAULT_REFUSAL: &str = "connection refused";

/// Engine.IO handshake payload (`0{...}`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInfo {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

/// Engine.IO transport-level packet
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(OpenInfo),
    Close,
    Ping(String),
    Pong(String),
    /// Socket.IO payload, still encoded
    Message(String),
    Upgrade,
    Noop,
}

/// Socket.IO packet carried inside an Engine.IO message
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: String,
        message: String,
    },
}

impl SocketPacket {
    pub fn namespace(&self) -> &str {
        match self {
            SocketPacket::Connect { namespace, .. }
            | SocketPacket::Disconnect { namespace }
            | SocketPacket::Event { namespace, .. }
            | SocketPacket::ConnectError { namespace, .. } => namespace,
        }
    }
}

fn feed_err(msg: impl Into<String>) -> ClientError {
    ClientError::Feed(msg.into())
}

/// Decode one Engine.IO text frame
pub fn decode_engine(frame: &str) -> Result<EnginePacket, ClientError> {
    let mut chars = frame.chars();
    let kind = chars.next().ok_or_else(|| feed_err("empty frame"))?;
    let rest = chars.as_str();

    match kind {
        '0' => match serde_json::from_str(rest) {
            Ok(info) => Ok(EnginePacket::Open(info)),
            Err(e) => Err(feed_err(format!("bad open packet: {}", e))),
        },
        '1' => Ok(EnginePacket::Close),
        '2' => Ok(EnginePacket::Ping(rest.to_string())),
        '3' => Ok(EnginePacket::Pong(rest.to_string())),
        '4' => Ok(EnginePacket::Message(rest.to_string())),
        '5' => Ok(EnginePacket::Upgrade),
        '6' => Ok(EnginePacket::Noop),
        other => Err(feed_err(format!("unknown engine packet type '{}'", other))),
    }
}

/// Split the `/name,` prefix off a packet body; absent means the main namespace
fn split_namespace(rest: &str) -> (String, &str) {
    if !rest.starts_with('/') {
        return ("/".to_string(), rest);
    }
    match rest.split_once(',') {
        Some((namespace, body)) => (namespace.to_string(), body),
        None => (rest.to_string(), ""),
    }
}

/// Event name and arguments from an event body
fn event_parts(data: Option<Value>) -> Result<(String, Vec<Value>), ClientError> {
    let Some(Value::Array(mut items)) = data else {
        return Err(feed_err("event payload must be an array"));
    };
    if items.is_empty() {
        return Err(feed_err("event payload is empty"));
    }
    match items.remove(0) {
        Value::String(name) => Ok((name, items)),
        other => {
            let msg = format!("event name must be a string, got {}", other);
            Err(feed_err(msg))
        }
    }
}

/// Reason carried by a CONNECT_ERROR body
fn refusal_message(data: Option<Value>) -> String {
    match data {
        Some(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => DEFAULT_REFUSAL.to_string(),
        },
        Some(Value::String(message)) => message,
        _ => DEFAULT_REFUSAL.to_string(),
    }
}

/// Decode the Socket.IO packet inside an Engine.IO message
pub fn decode_socket(payload: &str) -> Result<SocketPacket, ClientError> {
    let mut chars = payload.chars();
    let kind = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| feed_err(format!("bad socket packet: {:?}", payload)))?;

    match kind {
        3 => return Err(feed_err("acknowledgements are not supported")),
        5 | 6 => return Err(feed_err("binary socket packets are not supported")),
        _ => {}
    }

    let (namespace, mut rest) = split_namespace(chars.as_str());

    // Optional ack id: leading digits before the JSON body
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    let ack_id = if digits > 0 {
        let id = rest[..digits]
            .parse::<u64>()
            .map_err(|e| feed_err(format!("bad ack id: {}", e)))?;
        rest = &rest[digits..];
        Some(id)
    } else {
        None
    };

    let data: Option<Value> = if rest.is_empty() {
        None
    } else {
        Some(serde_json::from_str(rest)?)
    };

    match kind {
        0 => Ok(SocketPacket::Connect { namespace, data }),
        1 => Ok(SocketPacket::Disconnect { namespace }),
        2 => {
            let (name, args) = event_parts(data)?;
            Ok(SocketPacket::Event {
                namespace,
                ack_id,
                name,
                args,
            })
        }
        4 => Ok(SocketPacket::ConnectError {
            namespace,
            message: refusal_message(data),
        }),
        other => Err(feed_err(format!("unknown socket packet type {}", other))),
    }
}

/// Engine.IO message that connects to a namespace
pub fn encode_connect(namespace: &str) -> String {
    if namespace == "/" {
        "40".to_string()
    } else {
        format!("40{},", namespace)
    }
}

/// Engine.IO pong echoing the ping's data
pub fn encode_pong(data: &str) -> String {
    format!("3{}", data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn packets_ns() -> String {
        "/packets".to_string()
    }

    fn message(body: &str) -> EnginePacket {
        EnginePacket::Message(body.to_string())
    }

    #[test]
    fn test_decode_open() {
        let frame = r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#;
        let expected = OpenInfo {
            sid: "abc".to_string(),
            ping_interval: 25000,
            ping_timeout: 20000,
        };
        let packet = decode_engine(frame).unwrap();
        assert_eq!(packet, EnginePacket::Open(expected));
    }

    #[test]
    fn test_decode_ping_and_message() {
        let ping = decode_engine("2").unwrap();
        assert_eq!(ping, EnginePacket::Ping(String::new()));

        let ping = decode_engine("2ping").unwrap();
        assert_eq!(ping, EnginePacket::Ping("ping".to_string()));

        assert_eq!(decode_engine("40").unwrap(), message("0"));
        assert!(decode_engine("").is_err());
        assert!(decode_engine("9").is_err());
    }

    #[test]
    fn test_decode_namespaced_event() {
        let body = r#"2/packets,["packet",{"Protocol":"TCP","Length":60}]"#;
        let expected = SocketPacket::Event {
            namespace: packets_ns(),
            ack_id: None,
            name: "packet".to_string(),
            args: vec![json!({"Protocol": "TCP", "Length": 60})],
        };
        assert_eq!(decode_socket(body).unwrap(), expected);
    }

    #[test]
    fn test_decode_event_with_ack_id() {
        let packet = decode_socket(r#"2/packets,12["packet",{}]"#).unwrap();
        match packet {
            SocketPacket::Event { ack_id, name, .. } => {
                assert_eq!(ack_id, Some(12));
                assert_eq!(name, "packet");
            }
            other => panic!("unexpected packet {:?}", other),
        }
    }

    #[test]
    fn test_decode_main_namespace_event() {
        let packet = decode_socket(r#"2["hello",1]"#).unwrap();
        assert_eq!(packet.namespace(), "/");
    }

    #[test]
    fn test_decode_connect_and_errors() {
        let packet = decode_socket(r#"0/packets,{"sid":"xyz"}"#).unwrap();
        let expected = SocketPacket::Connect {
            namespace: packets_ns(),
            data: Some(json!({"sid": "xyz"})),
        };
        assert_eq!(packet, expected);

        let packet = decode_socket("1/packets,").unwrap();
        let expected = SocketPacket::Disconnect {
            namespace: packets_ns(),
        };
        assert_eq!(packet, expected);

        let packet = decode_socket(r#"4/packets,{"message":"Not authorized"}"#).unwrap();
        let expected = SocketPacket::ConnectError {
            namespace: packets_ns(),
            message: "Not authorized".to_string(),
        };
        assert_eq!(packet, expected);

        let packet = decode_socket("4/packets,").unwrap();
        let expected = SocketPacket::ConnectError {
            namespace: packets_ns(),
            message: DEFAULT_REFUSAL.to_string(),
        };
        assert_eq!(packet, expected);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode_socket("").is_err());
        assert!(decode_socket("x").is_err());
        assert!(decode_socket(r#"2/packets,{"not":"array"}"#).is_err());
        assert!(decode_socket(r#"2/packets,[]"#).is_err());
        assert!(decode_socket(r#"2/packets,[7]"#).is_err());
        assert!(decode_socket(r#"3/packets,1[]"#).is_err());

        let binary = r#"51-/packets,["packet",{"_placeholder":true,"num":0}]"#;
        assert!(decode_socket(binary).is_err());
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode_connect("/packets"), "40/packets,");
        assert_eq!(encode_connect("/"), "40");
        assert_eq!(encode_pong("ping"), "3ping");
    }
}
