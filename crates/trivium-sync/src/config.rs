//! Tunables for multiplayer sessions.

use std::time::Duration;

/// Configuration for a multiplayer session and its channel.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How long a member has to answer once a round starts. When it
    /// elapses without a local answer the round resolves as timed out.
    pub answer_window: Duration,

    /// How long to wait for the server to accept or reject a join.
    pub join_timeout: Duration,

    /// First reconnect delay; doubles per attempt up to `reconnect_max`.
    pub reconnect_base: Duration,

    /// Ceiling on the reconnect delay.
    pub reconnect_max: Duration,

    /// Reconnect attempts before the channel reports itself offline.
    pub reconnect_attempts: u32,

    /// Random extra delay added to each reconnect, in milliseconds.
    /// Keeps a lobby's worth of clients from reconnecting in lockstep.
    pub reconnect_jitter_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            answer_window: Duration::from_secs(30),
            join_timeout: Duration::from_secs(10),
            reconnect_base: Duration::from_millis(500),
            reconnect_max: Duration::from_secs(15),
            reconnect_attempts: 5,
            reconnect_jitter_ms: 250,
        }
    }
}
