//! Error types for the question bank.

/// Errors that can occur while drawing from the catalog.
///
/// Selection failures are content/configuration errors: the caller asked
/// for a draw the catalog cannot satisfy. They surface as a rejected
/// session-creation request and are never silently degraded into a
/// smaller draw.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    /// No category with the given name exists in the catalog.
    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),

    /// A stratified draw hit a difficulty band with no questions in it.
    #[error(
        "category \"{category}\" has no questions in difficulty band {band}"
    )]
    InsufficientQuestions {
        /// The category being drawn from.
        category: String,
        /// The 1-indexed band that turned out empty.
        band: u32,
    },

    /// A without-replacement category draw asked for more categories than
    /// the eligible pool holds.
    #[error(
        "requested {requested} categories but only {available} are eligible"
    )]
    InsufficientCategories {
        /// How many categories the caller asked for.
        requested: usize,
        /// How many were actually eligible.
        available: usize,
    },

    /// Persisting the user category set failed.
    #[error("failed to persist user categories")]
    Persist(#[from] trivium_store::StoreError),
}
