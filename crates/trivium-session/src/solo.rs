//! The solo session: one player against the question board.

use serde::{Deserialize, Serialize};
use trivium_bank::Question;

use crate::{score_points, SessionError, Status};

/// How many questions each category contributes to a board.
pub const QUESTIONS_PER_CATEGORY: usize = 5;

/// Snapshot format version. Bump when the snapshot shape changes; an
/// unknown version on disk is treated as no snapshot.
pub(crate) const SNAPSHOT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// CategoryDraw
// ---------------------------------------------------------------------------

/// The questions drawn for one category, in draw order.
///
/// The list is fixed at session construction: slots are never re-drawn or
/// replaced, only their `answered` flags flip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraw {
    /// The category these questions came from.
    pub name: String,
    /// The drawn clones, insertion order = draw order.
    pub questions: Vec<Question>,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// How a live question resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The submitted answer matched.
    Correct,
    /// The submitted answer did not match.
    Incorrect,
    /// The answer window elapsed with no submission.
    TimedOut,
    /// The player gave up on the question.
    Skipped,
}

impl Outcome {
    /// The status this outcome lands the session in.
    pub fn status(self) -> Status {
        match self {
            Self::Correct => Status::Correct,
            Self::Incorrect => Status::Incorrect,
            Self::TimedOut => Status::TimedOut,
            Self::Skipped => Status::Skipped,
        }
    }
}

// ---------------------------------------------------------------------------
// SoloSession
// ---------------------------------------------------------------------------

/// State for a single-player game.
///
/// Mutations go through [`SessionManager`](crate::SessionManager) so that
/// every change that must survive a crash is followed by a snapshot
/// write; this type only exposes read access publicly.
#[derive(Debug)]
pub struct SoloSession {
    /// Drawn questions per category, in category draw order.
    draws: Vec<CategoryDraw>,
    status: Status,
    current_question: Option<Question>,
    current_category: Option<String>,
    /// Cumulative score. Never decreases within a session.
    score: i32,
    /// The points awarded by the most recent correct answer.
    last_score: i32,
    /// Total seconds spent playing, across restarts.
    total_time_secs: f32,
}

impl SoloSession {
    pub(crate) fn new(draws: Vec<CategoryDraw>) -> Self {
        Self {
            draws,
            status: Status::Board,
            current_question: None,
            current_category: None,
            score: 0,
            last_score: 0,
            total_time_secs: 0.0,
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// Current position in the question cycle.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The live (or most recently live) question.
    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    /// The category of the live question.
    pub fn current_category(&self) -> Option<&str> {
        self.current_category.as_deref()
    }

    /// Cumulative score.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// The delta applied by the most recent correct answer.
    pub fn last_score(&self) -> i32 {
        self.last_score
    }

    /// Category names on this board, in draw order.
    pub fn categories(&self) -> Vec<&str> {
        self.draws.iter().map(|d| d.name.as_str()).collect()
    }

    /// The drawn questions for one category.
    pub fn questions_by_category(&self, name: &str) -> Option<&[Question]> {
        self.draws
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.questions.as_slice())
    }

    /// Unanswered questions remaining across all categories.
    pub fn remaining_count(&self) -> usize {
        self.draws
            .iter()
            .flat_map(|d| &d.questions)
            .filter(|q| !q.answered)
            .count()
    }

    /// Total play time formatted `m:ss`, seconds zero-padded below 10.
    pub fn pretty_time_taken(&self) -> String {
        let minutes = (self.total_time_secs / 60.0) as u32;
        let seconds = (self.total_time_secs % 60.0) as u32;
        format!("{minutes}:{seconds:02}")
    }

    // -----------------------------------------------------------------------
    // Mutations (crate-private; the manager persists after each)
    // -----------------------------------------------------------------------

    /// Picks the question at `(category, index)` and marks it answered.
    ///
    /// The mark is immediate and irrevocable — a slot can never be
    /// selected twice, even if the process dies before the answer is
    /// scored. Enters [`Status::Answering`].
    pub(crate) fn select_question(
        &mut self,
        category: &str,
        index: usize,
    ) -> Result<Question, SessionError> {
        let draw = self
            .draws
            .iter_mut()
            .find(|d| d.name == category)
            .ok_or_else(|| SessionError::UnknownCategory(category.into()))?;

        let question = draw.questions.get_mut(index).ok_or(
            SessionError::NoSuchSlot {
                category: category.into(),
                index,
            },
        )?;

        if question.answered {
            return Err(SessionError::AlreadyAnswered {
                category: category.into(),
                index,
            });
        }
        question.answered = true;

        let question = question.clone();
        self.current_question = Some(question.clone());
        self.current_category = Some(category.into());
        self.status = Status::Answering;
        Ok(question)
    }

    /// Resolves the live question, awarding time-decayed points when
    /// correct. Returns the awarded delta (zero unless correct).
    pub(crate) fn resolve(
        &mut self,
        outcome: Outcome,
        elapsed_secs: f32,
    ) -> Result<i32, SessionError> {
        if !self.status.is_answering() {
            return Err(SessionError::NoLiveQuestion);
        }
        let question = self
            .current_question
            .as_ref()
            .ok_or(SessionError::NoLiveQuestion)?;

        let awarded = match outcome {
            Outcome::Correct => {
                let points = score_points(question.value, elapsed_secs);
                self.score += points;
                self.last_score = points;
                points
            }
            _ => 0,
        };

        self.status = outcome.status();
        Ok(awarded)
    }

    /// Leaves the resolution state: `Reward` when the board is cleared,
    /// `Board` otherwise.
    pub(crate) fn finish_resolution(&mut self) -> Status {
        self.status = if self.remaining_count() == 0 {
            Status::Reward
        } else {
            Status::Board
        };
        self.status
    }

    /// Accumulates play time for the end-of-game summary.
    pub(crate) fn add_elapsed_time(&mut self, secs: f32) {
        self.total_time_secs += secs;
    }

    // -----------------------------------------------------------------------
    // Snapshotting
    // -----------------------------------------------------------------------

    pub(crate) fn snapshot(&self) -> SoloSnapshot {
        SoloSnapshot {
            version: SNAPSHOT_VERSION,
            draws: self.draws.clone(),
            score: self.score,
            total_time_secs: self.total_time_secs,
            current_category: self.current_category.clone(),
        }
    }

    /// Rebuilds a session from a snapshot. The rehydrated session is back
    /// on the board: a question that was live when the process died was
    /// already marked answered, so it is simply consumed.
    pub(crate) fn from_snapshot(snapshot: SoloSnapshot) -> Self {
        Self {
            draws: snapshot.draws,
            status: Status::Board,
            current_question: None,
            current_category: snapshot.current_category,
            score: snapshot.score,
            last_score: 0,
            total_time_secs: snapshot.total_time_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// SoloSnapshot
// ---------------------------------------------------------------------------

/// The explicit on-disk shape of a solo session.
///
/// A dedicated struct rather than serializing the session itself, so the
/// persisted format is visible, versioned, and free to diverge from the
/// in-memory layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SoloSnapshot {
    pub version: u32,
    pub draws: Vec<CategoryDraw>,
    pub score: i32,
    pub total_time_secs: f32,
    pub current_category: Option<String>,
}

impl SoloSnapshot {
    /// Unanswered questions recorded in this snapshot.
    pub(crate) fn remaining_count(&self) -> usize {
        self.draws
            .iter()
            .flat_map(|d| &d.questions)
            .filter(|q| !q.answered)
            .count()
    }
}

// =========================================================================
// Tests
// =========================================================================
