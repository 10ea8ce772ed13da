//! Question catalog and constrained random selection for Trivium.
//!
//! The bank owns the full universe of trivia content — built-in categories
//! plus categories the player has authored — and hands out *clones* of
//! questions for sessions to consume. Nothing in a running session ever
//! mutates the catalog itself.
//!
//! # Key types
//!
//! - [`Question`] / [`Category`] — the content data model
//! - [`QuestionBank`] — the catalog plus the two selection operations:
//!   difficulty-banded question draws and category sampling
//! - [`BankError`] — what can go wrong when a draw can't be satisfied

mod bank;
mod error;
mod question;

pub use bank::{QuestionBank, RESERVED_CATEGORY};
pub use error::BankError;
pub use question::{Category, Question};
