//! # Trivium
//!
//! A trivia game engine: a question bank with banded difficulty draws,
//! crash-safe solo sessions with time-decay scoring, and real-time
//! multiplayer lobbies over WebSocket.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use trivium::prelude::*;
//!
//! # fn categories() -> Vec<Category> { Vec::new() }
//! # fn main() -> Result<(), TriviumError> {
//! trivium::init_tracing();
//!
//! let mut engine = Engine::new("./data", categories())?;
//! engine.start_solo_random(3)?;
//!
//! let session = engine.sessions().solo().unwrap();
//! println!("{} questions on the board", session.remaining_count());
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod settings;

pub use engine::{init_tracing, Engine};
pub use error::TriviumError;
pub use settings::TtsSettings;

/// The common imports for building on Trivium.
pub mod prelude {
    pub use crate::{Engine, TriviumError, TtsSettings};
    pub use trivium_bank::{Category, Question, QuestionBank};
    pub use trivium_protocol::{AnswerStatus, Member, RoomCode};
    pub use trivium_session::{
        Clock, Outcome, SessionManager, SoloSession, Status,
    };
    pub use trivium_sync::{
        LobbyView, SyncConfig, SyncEvent, SyncHandle,
    };
}
