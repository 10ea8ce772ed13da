//! Real-time multiplayer for Trivium.
//!
//! Three layers, bottom up:
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ SyncSession (actor) + SyncHandle              │  ← one task per lobby,
//! │   serializes channel traffic, commands,       │    commands via mpsc,
//! │   and the round timer through one select!     │    replies via oneshot
//! ├───────────────────────────────────────────────┤
//! │ MultiplayerSession                            │  ← pure lobby state,
//! │   roster, rounds, local score                 │    no I/O
//! ├───────────────────────────────────────────────┤
//! │ Channel trait (WebSocketChannel impl)         │  ← named-message frames,
//! │   auto-reconnect with backoff                 │    connection lifecycle
//! └───────────────────────────────────────────────┘
//! ```
//!
//! The actor is the only place lobby state mutates, so a round timeout
//! and a late answer can never race: whichever reaches the `select!`
//! loop first resolves the round, the other becomes a no-op.

mod channel;
mod config;
mod error;
mod multiplayer;
mod session;
mod websocket;

pub use channel::{Channel, ChannelEvent};
pub use config::SyncConfig;
pub use error::SyncError;
pub use multiplayer::MultiplayerSession;
pub use session::{LobbyView, SyncEvent, SyncHandle, SyncSession};
pub use websocket::WebSocketChannel;
