//! WebSocket [`Channel`] implementation using `tokio-tungstenite`.
//!
//! Frames are JSON envelopes: `{"type": "<NAME>", "data": {...}}`. The
//! envelope shape lives entirely in this module — the rest of the crate
//! only ever sees `(name, payload)` pairs.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::{Channel, ChannelEvent, SyncConfig, SyncError};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// A client connection to a lobby server, with automatic reconnection.
///
/// On a dropped connection the channel retries with exponential backoff
/// and jitter. A successful retry surfaces as
/// [`ChannelEvent::Reconnected`] so the session can re-join; an
/// exhausted retry budget surfaces as one [`ChannelEvent::Offline`],
/// after which the channel only ever reports [`ChannelEvent::Closed`].
pub struct WebSocketChannel {
    url: String,
    stream: Option<WsStream>,
    reconnect_base: Duration,
    reconnect_max: Duration,
    reconnect_attempts: u32,
    reconnect_jitter_ms: u64,
}

impl WebSocketChannel {
    /// Connects to the lobby server, authenticating with a token in the
    /// URL query string.
    pub async fn connect(
        url: &str,
        token: &str,
        config: &SyncConfig,
    ) -> Result<Self, SyncError> {
        let url = format!("{url}?token={token}");
        let (stream, _) = connect_async(url.as_str()).await?;
        tracing::info!("connected to lobby server");

        Ok(Self {
            url,
            stream: Some(stream),
            reconnect_base: config.reconnect_base,
            reconnect_max: config.reconnect_max,
            reconnect_attempts: config.reconnect_attempts,
            reconnect_jitter_ms: config.reconnect_jitter_ms,
        })
    }

    /// Backoff-and-retry until connected or the attempt budget runs out.
    async fn try_reconnect(&mut self) -> bool {
        for attempt in 0..self.reconnect_attempts {
            let backoff = self
                .reconnect_base
                .saturating_mul(2u32.saturating_pow(attempt))
                .min(self.reconnect_max);
            // Jitter keeps a lobby's worth of clients from hammering the
            // server in lockstep after it restarts.
            let jitter = if self.reconnect_jitter_ms > 0 {
                Duration::from_millis(
                    rand::rng().random_range(0..self.reconnect_jitter_ms),
                )
            } else {
                Duration::ZERO
            };
            tokio::time::sleep(backoff + jitter).await;

            match connect_async(self.url.as_str()).await {
                Ok((stream, _)) => {
                    tracing::info!(attempt = attempt + 1, "reconnected");
                    self.stream = Some(stream);
                    return true;
                }
                Err(error) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        %error,
                        "reconnect attempt failed"
                    );
                }
            }
        }
        false
    }
}

impl Channel for WebSocketChannel {
    async fn emit(
        &mut self,
        name: &str,
        payload: Value,
    ) -> Result<(), SyncError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(SyncError::Disconnected);
        };
        let frame =
            serde_json::json!({ "type": name, "data": payload }).to_string();
        stream
            .send(Message::Text(frame.into()))
            .await
            .map_err(|_| SyncError::Disconnected)
    }

    async fn next_event(&mut self) -> ChannelEvent {
        loop {
            let Some(stream) = self.stream.as_mut() else {
                return ChannelEvent::Closed;
            };

            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    match parse_frame(text.as_str()) {
                        Ok((name, payload)) => {
                            return ChannelEvent::Message { name, payload };
                        }
                        Err(reason) => {
                            // A bad frame is the server's bug, not a
                            // reason to drop the connection.
                            tracing::warn!(reason, "dropping bad frame");
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("server closed the connection");
                    self.stream = None;
                }
                Some(Ok(_)) => {} // ping/pong/binary
                Some(Err(error)) => {
                    tracing::warn!(%error, "websocket read failed");
                    self.stream = None;
                }
            }

            if self.stream.is_none() {
                if self.try_reconnect().await {
                    return ChannelEvent::Reconnected;
                }
                // Stream stays None, so later calls report Closed.
                return ChannelEvent::Offline;
            }
        }
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.close(None).await;
        }
    }
}

/// Splits one envelope into its `(name, payload)` pair.
fn parse_frame(text: &str) -> Result<(String, Value), &'static str> {
    let mut frame: Value =
        serde_json::from_str(text).map_err(|_| "not JSON")?;
    let name = frame
        .get("type")
        .and_then(Value::as_str)
        .ok_or("missing 'type'")?
        .to_string();
    let payload = frame
        .get_mut("data")
        .map(Value::take)
        .unwrap_or(Value::Null);
    Ok((name, payload))
}

// =========================================================================
// Tests
// =========================================================================
