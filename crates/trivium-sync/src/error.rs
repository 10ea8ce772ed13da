use thiserror::Error;

/// Errors from joining and driving a multiplayer session.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The server does not know the code we tried to join.
    #[error("no lobby with that code")]
    InvalidLobby,

    /// The server never answered our join request.
    #[error("timed out waiting for the lobby to respond")]
    JoinTimeout,

    /// The session task has stopped; the handle is stale.
    #[error("session is no longer running")]
    Unavailable,

    /// The channel is gone and could not be recovered.
    #[error("connection lost")]
    Disconnected,

    /// An answer was submitted with no round live (or already resolved).
    #[error("no round is currently live")]
    NoActiveRound,

    /// Advance was requested by a non-host or mid-round.
    #[error("only the host may advance, between rounds")]
    CannotAdvance,

    /// The game already reached its terminal state.
    #[error("the game is over")]
    GameFinished,

    /// Initial connection to the lobby server failed.
    #[error("failed to connect: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Protocol(#[from] trivium_protocol::ProtocolError),
}
