//! The message vocabulary: what the server sends and what we send back.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use trivium_bank::Question;

use crate::{AnswerStatus, Member, ProtocolError, RoomCode};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Everything a lobby server can say to us.
///
/// Decoded from `(name, payload)` frames by [`Inbound::decode`]. The enum
/// is closed on purpose: once a frame is decoded the rest of the code
/// matches on variants and can never miss a message kind or typo a name.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Our join was accepted; carries the full roster.
    LobbyJoined { members: Vec<Member> },
    /// Someone left; carries the remaining roster.
    LobbyLeft { members: Vec<Member> },
    /// The host tore the lobby down.
    LobbyClosed,
    /// A round is starting: the question plus a roster refresh.
    NextQuestion {
        question: Question,
        members: Vec<Member>,
    },
    /// Every member has resolved the current round.
    RoundOver,
    /// One member's round result.
    ScoreUpdate {
        username: String,
        score: i32,
        status: AnswerStatus,
        answer: String,
    },
    /// The game is finished; final standings are in the last roster.
    GameOver,
    /// The code we tried to join does not name a lobby.
    InvalidLobby,
}

#[derive(Deserialize)]
struct RosterPayload {
    members: Vec<Member>,
}

#[derive(Deserialize)]
struct NextQuestionPayload {
    question: Question,
    members: Vec<Member>,
}

#[derive(Deserialize)]
struct ScoreUpdatePayload {
    username: String,
    score: i32,
    #[serde(default)]
    status: AnswerStatus,
    #[serde(default)]
    answer: String,
}

fn payload_as<T: DeserializeOwned>(
    name: &'static str,
    payload: Value,
) -> Result<T, ProtocolError> {
    serde_json::from_value(payload).map_err(|error| {
        ProtocolError::MalformedPayload {
            name,
            reason: error.to_string(),
        }
    })
}

impl Inbound {
    /// Decodes one wire frame.
    ///
    /// Message names below are the wire contract; they must match the
    /// server byte for byte.
    pub fn decode(name: &str, payload: Value) -> Result<Self, ProtocolError> {
        match name {
            "LOBBY_JOINED" => {
                let p: RosterPayload = payload_as("LOBBY_JOINED", payload)?;
                Ok(Self::LobbyJoined { members: p.members })
            }
            "LOBBY_LEFT" => {
                let p: RosterPayload = payload_as("LOBBY_LEFT", payload)?;
                Ok(Self::LobbyLeft { members: p.members })
            }
            "LOBBY_CLOSED" => Ok(Self::LobbyClosed),
            "NEXT_QUESTION" => {
                let p: NextQuestionPayload =
                    payload_as("NEXT_QUESTION", payload)?;
                Ok(Self::NextQuestion {
                    question: p.question,
                    members: p.members,
                })
            }
            "ROUND_OVER" => Ok(Self::RoundOver),
            "SCORE_UPDATE" => {
                let p: ScoreUpdatePayload =
                    payload_as("SCORE_UPDATE", payload)?;
                Ok(Self::ScoreUpdate {
                    username: p.username,
                    score: p.score,
                    status: p.status,
                    answer: p.answer,
                })
            }
            "GAME_OVER" => Ok(Self::GameOver),
            "INVALID_LOBBY" => Ok(Self::InvalidLobby),
            other => Err(ProtocolError::UnknownMessage(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Everything we can say to a lobby server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Request to join the lobby `code` as `user`.
    JoinLobby { code: RoomCode, user: String },
    /// Host only: start the next round.
    NextQuestion { code: RoomCode },
    /// Report our round result. Sent exactly once per round.
    Result { code: RoomCode, score: i32 },
    /// Leave the lobby. Best effort on shutdown.
    LeaveLobby { code: RoomCode },
}

impl Outbound {
    /// The wire name of this message.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinLobby { .. } => "JOIN_LOBBY",
            Self::NextQuestion { .. } => "NEXT_QUESTION",
            Self::Result { .. } => "RESULT",
            Self::LeaveLobby { .. } => "LEAVE_LOBBY",
        }
    }

    /// Encodes into a `(name, payload)` frame. Codes go out in their
    /// zero-padded 5-digit string form.
    pub fn encode(&self) -> (&'static str, Value) {
        let payload = match self {
            Self::JoinLobby { code, user } => json!({
                "code": code.to_string(),
                "user": user,
            }),
            Self::NextQuestion { code } => json!({
                "code": code.to_string(),
            }),
            Self::Result { code, score } => json!({
                "code": code.to_string(),
                "score": score,
            }),
            Self::LeaveLobby { code } => json!({
                "code": code.to_string(),
            }),
        };
        (self.name(), payload)
    }
}

// =========================================================================
// Tests
// =========================================================================
