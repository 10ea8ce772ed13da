//! Wire contract for Trivium multiplayer.
//!
//! A lobby server speaks a small named-message protocol: each frame is a
//! message name plus a JSON payload. This crate is the single place that
//! knows those names and payload shapes. Everything arriving from a
//! channel is decoded into the closed [`Inbound`] enum exactly once, at
//! the channel boundary; everything leaving is built from [`Outbound`].
//! No other crate touches raw message names.

mod error;
mod messages;
mod types;

pub use error::ProtocolError;
pub use messages::{Inbound, Outbound};
pub use types::{AnswerStatus, Member, RoomCode};
