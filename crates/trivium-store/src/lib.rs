//! Key-indexed durable snapshot store for Trivium.
//!
//! Session types survive process restarts by writing whole-state snapshots
//! here after every mutation that must outlive a crash. The store is
//! deliberately dumb: a handful of well-known keys, JSON on disk, one file
//! per key.
//!
//! # Durability contract
//!
//! - [`FsStore::write`] replaces the snapshot atomically from a reader's
//!   point of view: the bytes go to a temp file in the same directory,
//!   then a rename swaps it in. A crash mid-write leaves the previous
//!   snapshot intact.
//! - [`FsStore::read`] returns `None` for an absent *or corrupt* snapshot,
//!   never an error — a half-understood snapshot is treated the same as no
//!   snapshot at all.
//! - The store assumes a single logical writer per process; last writer
//!   wins.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};

mod error;

pub use error::StoreError;

// ---------------------------------------------------------------------------
// StateKey
// ---------------------------------------------------------------------------

/// The well-known snapshot slots.
///
/// A closed enum rather than free-form strings, so every persisted piece
/// of state is visible in one place and a typo can't silently create a
/// new slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// The in-progress solo session snapshot.
    SoloSession,
    /// Text-to-speech preferences (owned by the UI layer, shares the store).
    TtsSettings,
    /// The player-authored question categories.
    UserQuestions,
}

impl StateKey {
    /// The on-disk file name for this key.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::SoloSession => "session_solo.json",
            Self::TtsSettings => "tts_settings.json",
            Self::UserQuestions => "user_questions.json",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SoloSession => write!(f, "SESSION_SOLO"),
            Self::TtsSettings => write!(f, "TTS_SETTINGS"),
            Self::UserQuestions => write!(f, "USER_QUESTIONS"),
        }
    }
}

// ---------------------------------------------------------------------------
// FsStore
// ---------------------------------------------------------------------------

/// A filesystem-backed snapshot store rooted at a data directory.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Writes a snapshot for `key`, replacing any previous one.
    ///
    /// The write is temp-file-then-rename so a concurrent or later reader
    /// sees either the old snapshot or the new one, never a torn file.
    ///
    /// # Errors
    /// Returns [`StoreError::Encode`] if serialization fails or
    /// [`StoreError::Io`] on filesystem failure. Callers that cannot act
    /// on the failure log it and carry on with in-memory state as the
    /// authority.
    pub fn write<T: Serialize>(
        &self,
        key: StateKey,
        value: &T,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(StoreError::Encode)?;

        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;

        tracing::trace!(%key, bytes = bytes.len(), "snapshot written");
        Ok(())
    }

    /// Reads the snapshot for `key`.
    ///
    /// Returns `None` when no snapshot exists or when the file cannot be
    /// decoded (corrupt snapshots are logged and treated as absent).
    pub fn read<T: DeserializeOwned>(&self, key: StateKey) -> Option<T> {
        let bytes = match fs::read(self.path_for(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return None;
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "snapshot unreadable");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%key, error = %e, "snapshot corrupt, ignoring");
                None
            }
        }
    }

    /// Returns `true` if a snapshot file exists for `key`.
    pub fn exists(&self, key: StateKey) -> bool {
        self.path_for(key).exists()
    }

    /// Deletes the snapshot for `key`. A missing snapshot is not an error.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] on any other filesystem failure.
    pub fn clear(&self, key: StateKey) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {
                tracing::trace!(%key, "snapshot cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, key: StateKey) -> PathBuf {
        self.root.join(key.file_name())
    }
}

// =========================================================================
// Tests
// =========================================================================
