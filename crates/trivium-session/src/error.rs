use thiserror::Error;

/// Errors surfaced by session lifecycle and board operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A board operation was attempted with no solo session in memory.
    #[error("no solo session in progress")]
    NoSession,

    /// The named category is not on this board.
    #[error("category not on the board: {0}")]
    UnknownCategory(String),

    /// The slot index is outside the drawn questions for the category.
    #[error("no question at slot {index} in '{category}'")]
    NoSuchSlot { category: String, index: usize },

    /// The slot was already consumed; selection is irrevocable.
    #[error("question {index} in '{category}' was already answered")]
    AlreadyAnswered { category: String, index: usize },

    /// A resolution was attempted outside the answering state.
    #[error("no question is currently live")]
    NoLiveQuestion,

    /// Drawing the board from the question bank failed.
    #[error(transparent)]
    Bank(#[from] trivium_bank::BankError),
}
