//! Solo session engine for Trivium.
//!
//! This crate holds everything one player needs for a game against the
//! board: the status state machine shared with multiplayer, the
//! per-question stopwatch, the time-decay scoring function, the solo
//! session itself, and the process-scoped [`SessionManager`] that owns the
//! single live session and keeps its snapshot on disk current.
//!
//! # How it fits in the stack
//!
//! ```text
//! trivium (facade)          ← threads the manager through the app
//!     ↕
//! trivium-session (this)    ← session state, scoring, persistence hooks
//!     ↕
//! trivium-bank / trivium-store  ← question draws / snapshot durability
//! ```

mod clock;
mod error;
mod manager;
mod score;
mod solo;
mod status;

pub use clock::Clock;
pub use error::SessionError;
pub use manager::SessionManager;
pub use score::score_points;
pub use solo::{CategoryDraw, Outcome, SoloSession, QUESTIONS_PER_CATEGORY};
pub use status::Status;
