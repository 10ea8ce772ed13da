//! Types that travel on the wire, shared by both message directions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// RoomCode
// ---------------------------------------------------------------------------

/// A 5-digit lobby code.
///
/// Newtype over `u32` so a code cannot be confused with a score or a
/// question id anywhere a number is passed around. Codes come from user
/// input, so construction goes through [`RoomCode::parse`], which is
/// strict: exactly five ASCII digits, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomCode(u32);

impl RoomCode {
    /// Parses user input as a room code.
    ///
    /// Leading zeros are significant on the wire, so `"00042"` is valid
    /// and round-trips back to `"00042"` via [`fmt::Display`].
    pub fn parse(input: &str) -> Result<Self, ProtocolError> {
        if input.len() != 5 || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::InvalidCode(input.to_string()));
        }
        // Cannot fail after the digit check.
        Ok(Self(input.parse().unwrap_or(0)))
    }
}

impl FromStr for RoomCode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Zero-padded back to the 5-digit wire form.
impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AnswerStatus
// ---------------------------------------------------------------------------

/// A member's standing in the current round.
///
/// The server sends these as SCREAMING_SNAKE_CASE strings (`"PENDING"`,
/// `"TIMED_OUT"`, ...), hence the rename attribute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerStatus {
    /// Still answering (or the round has not reached them).
    #[default]
    Pending,
    Correct,
    Incorrect,
    TimedOut,
}

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// One player in a lobby roster.
///
/// `username` is the roster identity key: score updates address members
/// by name. The avatar descriptor is opaque JSON chosen by the server —
/// it is carried through untouched for display layers to interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub avatar: serde_json::Value,
    pub username: String,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub status: AnswerStatus,
    /// The member's last submitted answer text, shown on round end.
    #[serde(default)]
    pub answer: String,
}

impl Member {
    /// A freshly joined member with nothing answered yet.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            avatar: serde_json::Value::Null,
            username: username.into(),
            score: 0,
            status: AnswerStatus::Pending,
            answer: String::new(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
