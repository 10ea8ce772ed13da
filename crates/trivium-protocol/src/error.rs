use thiserror::Error;

/// Errors from parsing wire input.
///
/// None of these are fatal to a session: an invalid code is re-prompted,
/// and a bad frame is logged and dropped by the handler.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// User input that is not a 5-digit room code.
    #[error("room codes are 5 digits, got '{0}'")]
    InvalidCode(String),

    /// A frame whose name is not in the protocol vocabulary.
    #[error("unknown message '{0}'")]
    UnknownMessage(String),

    /// A known message whose payload did not match the expected shape.
    #[error("malformed {name} payload: {reason}")]
    MalformedPayload {
        name: &'static str,
        reason: String,
    },
}
