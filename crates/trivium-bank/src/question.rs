//! The content data model: questions and the categories that hold them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// A single trivia question.
///
/// Questions live in exactly one [`Category`]. The catalog's copies are
/// canonical and immutable during play; a session always works with clones
/// handed out by [`QuestionBank::select_questions`](crate::QuestionBank::select_questions),
/// so flipping `answered` on a clone never touches the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique id within the category.
    pub id: u32,

    /// The prompt shown (or spoken) to the player.
    pub prompt: String,

    /// Every accepted answer. Checked case-insensitively, so authors can
    /// list one casing per variant spelling.
    pub answers: Vec<String>,

    /// Points awarded for a correct answer, before any time decay.
    pub value: i32,

    /// Difficulty band, 1-indexed. Drives stratified selection: slot `i`
    /// of a no-duplicates draw is filled from band `i`.
    pub difficulty: u32,

    /// Whether this clone has been answered in its session. Always `false`
    /// on catalog copies and fresh draws.
    #[serde(default)]
    pub answered: bool,
}

impl Question {
    /// Checks a submitted answer against the accepted answers.
    ///
    /// Comparison trims surrounding whitespace and ignores case, so
    /// `" Wellington "` matches `"wellington"`.
    pub fn check_answer(&self, submitted: &str) -> bool {
        let submitted = submitted.trim().to_lowercase();
        self.answers
            .iter()
            .any(|a| a.trim().to_lowercase() == submitted)
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A named, ordered collection of questions.
///
/// The name is the category's unique key across the whole catalog —
/// protocol payloads and session snapshots refer to categories by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique name, case sensitive.
    pub name: String,

    /// The questions, in authored order.
    pub questions: Vec<Question>,
}

impl Category {
    /// Creates a category from a name and its questions.
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }

    /// Number of questions in this category.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns `true` if the category holds no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
