//! The question bank: catalog ownership and constrained random selection.

use std::collections::BTreeMap;

use rand::Rng;
use trivium_store::{FsStore, StateKey};

use crate::{BankError, Category, Question};

/// The category that stays hidden until the player unlocks it.
pub const RESERVED_CATEGORY: &str = "International";

/// The catalog of trivia content: built-in categories plus categories the
/// player has authored, with the selection operations sessions draw from.
///
/// Built-ins are loaded once and never mutated. User categories may be
/// replaced wholesale via [`set_user_categories`](Self::set_user_categories),
/// which also persists them so they survive restarts.
///
/// `BTreeMap` keeps category iteration in name order, so listings are
/// stable across runs without a separate sort.
pub struct QuestionBank {
    base: BTreeMap<String, Category>,
    user: BTreeMap<String, Category>,
    /// When `false`, [`RESERVED_CATEGORY`] is excluded from category
    /// sampling and listings.
    reserved_unlocked: bool,
}

impl QuestionBank {
    /// Creates a bank over the given built-in categories, with no user
    /// categories and the reserved category locked.
    pub fn new(base: impl IntoIterator<Item = Category>) -> Self {
        Self {
            base: base
                .into_iter()
                .map(|c| (c.name.clone(), c))
                .collect(),
            user: BTreeMap::new(),
            reserved_unlocked: false,
        }
    }

    /// Creates a bank and loads any previously persisted user categories
    /// from the store. An absent or unreadable snapshot just means no user
    /// categories.
    pub fn with_user_from_store(
        base: impl IntoIterator<Item = Category>,
        store: &FsStore,
    ) -> Self {
        let mut bank = Self::new(base);
        if let Some(user) =
            store.read::<BTreeMap<String, Category>>(StateKey::UserQuestions)
        {
            tracing::debug!(categories = user.len(), "loaded user categories");
            bank.user = user;
        }
        bank
    }

    /// Marks the reserved category as unlocked (or re-locks it).
    pub fn set_reserved_unlocked(&mut self, unlocked: bool) {
        self.reserved_unlocked = unlocked;
    }

    /// Whether the reserved category is currently selectable.
    pub fn reserved_unlocked(&self) -> bool {
        self.reserved_unlocked
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Draws `count` random questions from the named category.
    ///
    /// Without duplicates, the draw is stratified by difficulty: slot `i`
    /// (1-indexed) is filled uniformly at random from the questions in band
    /// `i`. An empty band fails the whole draw — including when `count`
    /// exceeds the bands the category actually has; the draw is rejected
    /// rather than wrapped around, so a board never silently changes shape.
    ///
    /// With duplicates, every slot draws independently from the full pool,
    /// ignoring difficulty.
    ///
    /// Each returned question is a fresh clone with `answered = false`;
    /// marking it answered never touches the catalog.
    ///
    /// # Errors
    /// - [`BankError::UnknownCategory`] if the category does not exist
    /// - [`BankError::InsufficientQuestions`] naming the first empty band
    pub fn select_questions(
        &self,
        category: &str,
        count: usize,
        allow_duplicates: bool,
    ) -> Result<Vec<Question>, BankError> {
        let pool = &self.get_category(category)?.questions;
        let mut rng = rand::rng();
        let mut results = Vec::with_capacity(count);

        for slot in 1..=count {
            let drawn = if allow_duplicates {
                if pool.is_empty() {
                    return Err(BankError::InsufficientQuestions {
                        category: category.to_string(),
                        band: slot as u32,
                    });
                }
                &pool[rng.random_range(0..pool.len())]
            } else {
                let band: Vec<&Question> = pool
                    .iter()
                    .filter(|q| q.difficulty == slot as u32)
                    .collect();
                if band.is_empty() {
                    return Err(BankError::InsufficientQuestions {
                        category: category.to_string(),
                        band: slot as u32,
                    });
                }
                band[rng.random_range(0..band.len())]
            };

            let mut clone = drawn.clone();
            clone.answered = false;
            results.push(clone);
        }

        Ok(results)
    }

    /// Draws `count` random categories from the eligible universe.
    ///
    /// The universe is user categories plus built-ins, filtered by
    /// `min_questions` when given, with the reserved category excluded
    /// while locked. Without duplicates each pick is removed from the
    /// candidate pool; with duplicates every slot samples independently.
    ///
    /// # Errors
    /// Returns [`BankError::InsufficientCategories`] if a no-duplicates
    /// draw asks for more categories than the eligible pool holds.
    pub fn select_categories(
        &self,
        count: usize,
        allow_duplicates: bool,
        min_questions: Option<usize>,
    ) -> Result<Vec<Category>, BankError> {
        let mut pool: Vec<&Category> = self
            .categories()
            .into_iter()
            .filter(|c| min_questions.is_none_or(|min| c.len() >= min))
            .collect();

        if !allow_duplicates && pool.len() < count {
            return Err(BankError::InsufficientCategories {
                requested: count,
                available: pool.len(),
            });
        }

        let mut rng = rand::rng();
        let mut results = Vec::with_capacity(count);

        for _ in 0..count {
            if pool.is_empty() {
                return Err(BankError::InsufficientCategories {
                    requested: count,
                    available: results.len(),
                });
            }
            let index = rng.random_range(0..pool.len());
            if allow_duplicates {
                results.push(pool[index].clone());
            } else {
                results.push(pool.swap_remove(index).clone());
            }
        }

        Ok(results)
    }

    // -----------------------------------------------------------------------
    // Catalog access
    // -----------------------------------------------------------------------

    /// All eligible categories: user-authored first, then built-in, each
    /// group in name order. The reserved category is hidden while locked.
    pub fn categories(&self) -> Vec<&Category> {
        self.user
            .values()
            .chain(self.base.values())
            .filter(|c| {
                self.reserved_unlocked || c.name != RESERVED_CATEGORY
            })
            .collect()
    }

    /// Only the categories the player has authored.
    pub fn user_categories(&self) -> Vec<&Category> {
        self.user.values().collect()
    }

    /// Looks up a category by name, searching user categories first so a
    /// user category can shadow a built-in of the same name.
    pub fn get_category(&self, name: &str) -> Result<&Category, BankError> {
        self.user
            .get(name)
            .or_else(|| self.base.get(name))
            .ok_or_else(|| BankError::UnknownCategory(name.to_string()))
    }

    /// Replaces the user-authored category set wholesale and persists it.
    ///
    /// Built-in categories are never touched by this call.
    ///
    /// # Errors
    /// Returns [`BankError::Persist`] if the snapshot write fails; the
    /// in-memory replacement has already happened at that point.
    pub fn set_user_categories(
        &mut self,
        categories: BTreeMap<String, Category>,
        store: &FsStore,
    ) -> Result<(), BankError> {
        self.user = categories;
        tracing::info!(
            categories = self.user.len(),
            "user categories replaced"
        );
        store.write(StateKey::UserQuestions, &self.user)?;
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
