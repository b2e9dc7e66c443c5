//! Fuzzy text similarity primitives.
//!
//! This module holds the building blocks the entity matchers rely on:
//!
//! - [`EditDistance`]: Levenshtein distance with optional accent and case folding
//! - [`AlphanumericClass`]: word segmentation into character-indexed [`WordPosition`]s
//! - [`SimilarSearch`]: best-window search of a phrase inside a longer text
//!
//! Every position produced here is a character index (Unicode scalar value),
//! never a byte offset, and every `end` is inclusive.

pub mod distance;
pub mod search;
pub mod words;

pub use distance::{EditDistance, levenshtein, normalize_text};
pub use search::{SimilarSearch, SpanMatch, accuracy};
pub use words::{AlphanumericClass, CharRange, WordPosition, char_slice, is_ideograph};

use serde::{Deserialize, Serialize};

/// Settings shared by every similarity consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Fold accents and case before measuring distance
    pub normalize: bool,

    /// Compare characters by base letter (accent and case insensitive)
    pub use_collator: bool,

    /// Which characters count as word characters
    pub alphanumeric: AlphanumericClass,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            use_collator: false,
            alphanumeric: AlphanumericClass::default(),
        }
    }
}
