//! The game status state machine shared by solo and multiplayer play.

use serde::{Deserialize, Serialize};

/// Where the player currently is in the question cycle.
///
/// ```text
/// Board → Answering → {Correct, TimedOut, Skipped, Incorrect} ─┬→ Board
///                                                              └→ Reward
/// ```
///
/// - **Board**: looking at the question grid (or, in multiplayer, the
///   lobby between rounds).
/// - **Answering**: a question is live; entered the instant it is chosen.
/// - **Correct / TimedOut / Skipped / Incorrect**: how the live question
///   resolved. These are momentary display states.
/// - **Reward**: entered from a resolution only when no unanswered
///   questions remain; otherwise the machine returns to `Board`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Board,
    Answering,
    Correct,
    TimedOut,
    Skipped,
    Incorrect,
    Reward,
}

impl Status {
    /// Returns `true` for the four ways a live question can resolve.
    pub fn is_resolution(self) -> bool {
        matches!(
            self,
            Self::Correct | Self::TimedOut | Self::Skipped | Self::Incorrect
        )
    }

    /// Returns `true` while a question is live and unresolved.
    pub fn is_answering(self) -> bool {
        matches!(self, Self::Answering)
    }

    /// Returns `true` once the session has nothing left to play.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Reward)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Board => "Board",
            Self::Answering => "Answering",
            Self::Correct => "Correct",
            Self::TimedOut => "TimedOut",
            Self::Skipped => "Skipped",
            Self::Incorrect => "Incorrect",
            Self::Reward => "Reward",
        };
        write!(f, "{name}")
    }
}
