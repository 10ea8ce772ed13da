//! Session lifecycle and crash-safe persistence.

use std::sync::Arc;

use trivium_bank::{Category, QuestionBank, Question};
use trivium_store::{FsStore, StateKey};

use crate::solo::{SoloSnapshot, SNAPSHOT_VERSION};
use crate::{CategoryDraw, Outcome, SessionError, SoloSession, Status, QUESTIONS_PER_CATEGORY};

/// Owns the solo session and mediates every mutation.
///
/// The interesting crash-safety property lives here: each state change
/// that must survive a process death is followed by a snapshot write to
/// the [`FsStore`]. Selecting a question is the sharpest case — the slot
/// is persisted as consumed *before* the player sees the prompt, so
/// killing the process mid-question burns the question rather than
/// allowing a re-roll.
pub struct SessionManager {
    store: Arc<FsStore>,
    solo: Option<SoloSession>,
}

impl SessionManager {
    /// Builds a manager, rehydrating any solo session left on disk.
    ///
    /// A snapshot with an unknown version is ignored, same as a corrupt
    /// one: the player simply has no session to resume.
    pub fn new(store: Arc<FsStore>) -> Self {
        let solo = store
            .read::<SoloSnapshot>(StateKey::SoloSession)
            .and_then(|snapshot| {
                if snapshot.version == SNAPSHOT_VERSION {
                    Some(SoloSession::from_snapshot(snapshot))
                } else {
                    tracing::warn!(
                        version = snapshot.version,
                        "ignoring solo snapshot with unknown version"
                    );
                    None
                }
            });
        if let Some(session) = &solo {
            tracing::info!(
                remaining = session.remaining_count(),
                score = session.score(),
                "resumed solo session from disk"
            );
        }
        Self { store, solo }
    }

    /// Starts a fresh solo game over the given categories, replacing any
    /// session already in memory or on disk.
    ///
    /// Draws [`QUESTIONS_PER_CATEGORY`] questions per category through the
    /// bank's banded selection.
    pub fn start_solo(
        &mut self,
        bank: &QuestionBank,
        categories: &[Category],
    ) -> Result<&SoloSession, SessionError> {
        let mut draws = Vec::with_capacity(categories.len());
        for category in categories {
            draws.push(CategoryDraw {
                name: category.name.clone(),
                questions: bank.select_questions(
                    &category.name,
                    QUESTIONS_PER_CATEGORY,
                    false,
                )?,
            });
        }

        tracing::info!(categories = draws.len(), "starting solo session");
        self.solo = Some(SoloSession::new(draws));
        self.persist();
        Ok(self.solo.as_ref().unwrap())
    }

    /// The in-memory solo session, if any.
    pub fn solo(&self) -> Option<&SoloSession> {
        self.solo.as_ref()
    }

    /// Whether a resumable game exists on disk.
    ///
    /// Reads the snapshot rather than memory: a cleared board counts as
    /// finished even though its snapshot still exists.
    pub fn is_in_progress(&self) -> bool {
        self.store
            .read::<SoloSnapshot>(StateKey::SoloSession)
            .is_some_and(|snapshot| {
                snapshot.version == SNAPSHOT_VERSION && snapshot.remaining_count() > 0
            })
    }

    /// Drops the solo session and deletes its snapshot.
    pub fn clear_solo(&mut self) {
        self.solo = None;
        if let Err(error) = self.store.clear(StateKey::SoloSession) {
            tracing::warn!(%error, "failed to delete solo snapshot");
        }
    }

    // -----------------------------------------------------------------------
    // Mediated board operations; each persists on success
    // -----------------------------------------------------------------------

    /// Selects a board slot, consuming it irrevocably.
    pub fn select_question(
        &mut self,
        category: &str,
        index: usize,
    ) -> Result<Question, SessionError> {
        let question = self.solo_mut()?.select_question(category, index)?;
        self.persist();
        Ok(question)
    }

    /// Resolves the live question; returns the awarded delta.
    pub fn resolve(
        &mut self,
        outcome: Outcome,
        elapsed_secs: f32,
    ) -> Result<i32, SessionError> {
        let awarded = self.solo_mut()?.resolve(outcome, elapsed_secs)?;
        self.persist();
        Ok(awarded)
    }

    /// Leaves the resolution state; `Reward` on a cleared board.
    pub fn finish_resolution(&mut self) -> Result<Status, SessionError> {
        let status = self.solo_mut()?.finish_resolution();
        self.persist();
        Ok(status)
    }

    /// Accumulates play time into the session total.
    pub fn add_elapsed_time(&mut self, secs: f32) -> Result<(), SessionError> {
        self.solo_mut()?.add_elapsed_time(secs);
        self.persist();
        Ok(())
    }

    fn solo_mut(&mut self) -> Result<&mut SoloSession, SessionError> {
        self.solo.as_mut().ok_or(SessionError::NoSession)
    }

    /// Writes the current snapshot. A write failure is logged and
    /// swallowed: the in-memory game keeps going, only resumability is
    /// degraded.
    fn persist(&self) {
        let Some(session) = &self.solo else { return };
        if let Err(error) =
            self.store.write(StateKey::SoloSession, &session.snapshot())
        {
            tracing::warn!(%error, "failed to persist solo snapshot");
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
