//! Positional sanity checks.

use tracing::warn;

use crate::entity_extraction::Span;
use crate::entity_extraction::pipeline::SpanValidator;
use crate::entity_extraction::traits::RecognitionContext;

/// Drops spans that do not describe a slice of the utterance.
///
/// A valid span has `start <= end < utterance length`, a consistent `len`
/// and an `utterance_text` equal to the characters it covers. Recognizers in
/// this crate always pass; the check is aimed at caller-supplied spans.
#[derive(Debug, Clone)]
pub struct BoundsValidator {
    name: String,
}

impl Default for BoundsValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundsValidator {
    pub fn new() -> Self {
        Self {
            name: "bounds_validator".to_string(),
        }
    }
}

impl SpanValidator for BoundsValidator {
    fn validate(&self, span: &Span, context: &RecognitionContext<'_>) -> bool {
        let chars = context.chars;
        let valid = span.start <= span.end
            && span.end < chars.len()
            && span.len == span.end - span.start + 1
            && chars[span.start..=span.end]
                .iter()
                .copied()
                .eq(span.utterance_text.chars());
        if !valid {
            warn!(
                entity = %span.entity,
                start = span.start,
                end = span.end,
                "Dropping span outside the utterance"
            );
        }
        valid
    }

    fn name(&self) -> &str {
        &self.name
    }
}
