//! Unified error type for the Trivium engine.

use trivium_bank::BankError;
use trivium_protocol::ProtocolError;
use trivium_session::SessionError;
use trivium_store::StoreError;
use trivium_sync::SyncError;

/// Top-level error that wraps all crate-specific errors.
///
/// Callers of the `trivium` meta-crate deal with this single type; the
/// `#[from]` attributes let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TriviumError {
    /// Question bank errors (unknown category, thin draw pools).
    #[error(transparent)]
    Bank(#[from] BankError),

    /// Persistence errors (snapshot write/delete failures).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Session errors (board operations, lifecycle).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Wire protocol errors (invalid codes, bad frames).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Multiplayer errors (joining, connectivity, round state).
    #[error(transparent)]
    Sync(#[from] SyncError),
}
