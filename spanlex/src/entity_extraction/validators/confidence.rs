//! Accuracy-based span validator.

use crate::entity_extraction::Span;
use crate::entity_extraction::pipeline::SpanValidator;
use crate::entity_extraction::traits::RecognitionContext;

/// Drops spans whose accuracy is not positive or falls below a threshold
#[derive(Debug, Clone)]
pub struct ConfidenceValidator {
    threshold: f64,
    name: String,
}

impl ConfidenceValidator {
    /// Create a new confidence validator with the given threshold
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            name: format!("confidence_validator_{:.2}", threshold),
        }
    }

    /// Create a permissive validator (only non-positive accuracy is rejected)
    pub fn permissive() -> Self {
        Self::new(0.0)
    }

    /// Create a strict validator (high threshold)
    pub fn strict() -> Self {
        Self::new(0.8)
    }
}

impl SpanValidator for ConfidenceValidator {
    fn validate(&self, span: &Span, _context: &RecognitionContext<'_>) -> bool {
        span.accuracy > 0.0 && span.accuracy >= self.threshold
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_extraction::{RuleTable, SpanKind};

    fn check(validator: &ConfidenceValidator, accuracy: f64) -> bool {
        let chars: Vec<char> = "abc".chars().collect();
        let rules = RuleTable::new();
        let context = RecognitionContext {
            utterance: "abc",
            chars: &chars,
            locale: "en",
            rules: &rules,
            word_positions: &[],
            whitelist: None,
        };
        let span = Span::from_chars(&chars, 0, 2, "x", SpanKind::Enum, accuracy);
        validator.validate(&span, &context)
    }

    #[test]
    fn test_rejects_non_positive_accuracy() {
        let validator = ConfidenceValidator::permissive();
        assert!(check(&validator, 0.01));
        assert!(!check(&validator, 0.0));
        assert!(!check(&validator, -0.5));
        assert!(!check(&validator, f64::NAN));
    }

    #[test]
    fn test_threshold() {
        let validator = ConfidenceValidator::strict();
        assert!(check(&validator, 0.8));
        assert!(!check(&validator, 0.79));
    }
}
