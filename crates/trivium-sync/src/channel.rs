//! The channel seam between lobby logic and whatever carries the bytes.

use std::future::Future;

use serde_json::Value;

use crate::SyncError;

/// What a channel can report to the session driving it.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// A wire frame arrived: a message name plus its JSON payload.
    Message { name: String, payload: Value },

    /// The connection dropped and was re-established. The server has
    /// forgotten us; whoever owns the session must re-join.
    Reconnected,

    /// The connection dropped and could not be re-established within
    /// the retry budget. Reported once.
    Offline,

    /// The channel is permanently done (closed locally or given up).
    Closed,
}

/// A bidirectional named-message stream.
///
/// [`WebSocketChannel`](crate::WebSocketChannel) is the production
/// implementation; tests drive sessions with in-memory channels. The
/// contract that matters for correctness: after `Offline` or `Closed`,
/// `next_event` keeps returning `Closed` rather than blocking.
/// The futures are declared `Send` explicitly because sessions run the
/// channel inside a spawned task.
pub trait Channel: Send + 'static {
    /// Sends one frame.
    fn emit(
        &mut self,
        name: &str,
        payload: Value,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    /// Waits for the next thing to happen on the channel.
    fn next_event(&mut self) -> impl Future<Output = ChannelEvent> + Send;

    /// Closes the channel. Idempotent, best effort.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}
