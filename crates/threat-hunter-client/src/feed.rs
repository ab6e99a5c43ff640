//! Live packet feed subscription
//!
//! Connects to the capture backend's Socket.IO endpoint over WebSocket and
//! forwards every `packet` event as a [`Record`] on an unbounded channel.

use crate::config::BackendConfig;
use crate::error::ClientError;
use crate::socketio::{self, EnginePacket, SocketPacket};
use crate::types::Record;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

/// Events delivered by a [`PacketFeed`]
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Namespace joined; records will follow
    Connected,
    /// One captured packet, in arrival order
    Record(Record),
    /// Subscription ended (server close, protocol error, ...)
    Disconnected(String),
}

/// Handle to a running feed subscription
///
/// The background task is aborted when the handle is closed or dropped.
pub struct PacketFeed {
    task: JoinHandle<()>,
}

impl std::fmt::Debug for PacketFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketFeed")
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

impl PacketFeed {
    /// Start a subscription using the configured feed URL, namespace and event
    pub fn subscribe(
        config: &BackendConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<FeedEvent>), ClientError> {
        let url = config.websocket_url()?;
        let namespace = config.namespace.clone();
        let event = config.event.clone();
        Ok(Self::subscribe_to(url, namespace, event))
    }

    /// Start a subscription against an explicit WebSocket URL
    pub fn subscribe_to(
        url: String,
        namespace: String,
        event: String,
    ) -> (Self, mpsc::UnboundedReceiver<FeedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            tracing::info!("Subscribing to {} ({} / {})", url, namespace, event);
            let reason = match run_feed(&url, &namespace, &event, &tx).await {
                Ok(reason) => reason,
                Err(e) => {
                    tracing::warn!("Packet feed error: {}", e);
                    e.to_string()
                }
            };
            tracing::info!("Packet feed ended: {}", reason);
            let _ = tx.send(FeedEvent::Disconnected(reason));
        });

        (Self { task }, rx)
    }

    /// Tear the subscription down
    pub fn close(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PacketFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// What one decoded Socket.IO packet means for the subscriber
fn feed_event(packet: SocketPacket, event: &str) -> Result<Option<FeedEvent>, ClientError> {
    match packet {
        SocketPacket::Connect { .. } => Ok(Some(FeedEvent::Connected)),
        SocketPacket::Disconnect { .. } => {
            let reason = "namespace disconnected by server".to_string();
            Ok(Some(FeedEvent::Disconnected(reason)))
        }
        SocketPacket::ConnectError { message, .. } => {
            let msg = format!("connect refused: {}", message);
            Err(ClientError::Feed(msg))
        }
        SocketPacket::Event { name, args, .. } if name == event => {
            let Some(payload) = args.into_iter().next() else {
                tracing::warn!("'{}' event without payload", event);
                return Ok(None);
            };
            match serde_json::from_value::<Record>(payload) {
                Ok(record) => Ok(Some(FeedEvent::Record(record))),
                Err(e) => {
                    tracing::warn!("Dropping malformed record: {}", e);
                    Ok(None)
                }
            }
        }
        SocketPacket::Event { .. } => Ok(None),
    }
}

/// Drive one WebSocket session; returns the reason it ended
async fn run_feed(
    url: &str,
    namespace: &str,
    event: &str,
    tx: &mpsc::UnboundedSender<FeedEvent>,
) -> Result<String, ClientError> {
    let (ws, _response) = tokio_tungstenite::connect_async(url).await?;
    let (mut write, mut read) = ws.split();

    while let Some(message) = read.next().await {
        let text = match message? {
            Message::Text(text) => text,
            Message::Close(_) => return Ok("server closed the connection".to_string()),
            // Binary attachments are unsupported; tungstenite answers control frames
            _ => continue,
        };

        let payload = match socketio::decode_engine(&text)? {
            EnginePacket::Open(info) => {
                tracing::debug!("Engine.IO open: sid={}", info.sid);
                let connect = socketio::encode_connect(namespace);
                write.send(Message::Text(connect)).await?;
                continue;
            }
            EnginePacket::Ping(data) => {
                let pong = socketio::encode_pong(&data);
                write.send(Message::Text(pong)).await?;
                continue;
            }
            EnginePacket::Close => return Ok("transport closed".to_string()),
            EnginePacket::Message(payload) => payload,
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => continue,
        };

        let packet = match socketio::decode_socket(&payload) {
            Ok(packet) if packet.namespace() == namespace => packet,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("Skipping undecodable feed packet: {}", e);
                continue;
            }
        };

        match feed_event(packet, event)? {
            Some(FeedEvent::Disconnected(reason)) => return Ok(reason),
            Some(feed_event) => {
                if tx.send(feed_event).is_err() {
                    return Ok("subscriber dropped".to_string());
                }
            }
            None => {}
        }
    }

    Ok("connection ended".to_string())
}
