//! Traits for span recognition.

use super::rules::RuleTable;
use super::Span;
use crate::similarity::WordPosition;

/// Everything a recognizer may look at for one utterance.
///
/// The character vector and word positions are computed once per extraction
/// and shared by every recognizer.
#[derive(Debug, Clone, Copy)]
pub struct RecognitionContext<'a> {
    /// The original utterance
    pub utterance: &'a str,
    /// The utterance split into characters
    pub chars: &'a [char],
    /// Resolved locale of the rule table to use
    pub locale: &'a str,
    pub rules: &'a RuleTable,
    pub word_positions: &'a [WordPosition],
    /// Entity names allowed for rule-based recognizers, when restricted
    pub whitelist: Option<&'a [String]>,
}

impl<'a> RecognitionContext<'a> {
    /// Whether rule-based recognizers may emit spans for `entity`.
    pub fn is_allowed(&self, entity: &str) -> bool {
        self.whitelist
            .is_none_or(|names| names.iter().any(|name| name == entity))
    }
}

/// Trait for recognizing spans in an utterance.
pub trait Recognizer: Send + Sync + std::fmt::Debug {
    /// Recognize spans in the utterance described by `context`.
    ///
    /// # Returns
    /// Candidate spans, possibly overlapping; conflicts are settled later in
    /// the pipeline
    fn recognize(&self, context: &RecognitionContext<'_>) -> Vec<Span>;

    /// Get the name of this recognizer for identification purposes.
    fn name(&self) -> &str;

    /// Get the priority of this recognizer (higher priority recognizers run first).
    fn priority(&self) -> u8 {
        128 // Default medium priority
    }

    /// Check if this recognizer is enabled.
    fn is_enabled(&self) -> bool {
        true
    }
}
