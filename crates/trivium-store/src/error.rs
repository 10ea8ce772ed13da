//! Error types for the snapshot store.

/// Errors that can occur while writing or clearing snapshots.
///
/// Reads deliberately have no error type: absent and corrupt snapshots
/// both come back as `None`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serializing a snapshot failed.
    #[error("snapshot encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A filesystem operation failed.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
