//! Fuzzy recognition of enumerated entities.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::rules::{EntityRule, EnumOption, EnumRule, RuleTable};
use super::traits::{RecognitionContext, Recognizer};
use super::{Resolution, Span, SpanKind};
use crate::similarity::{SimilarSearch, SpanMatch};

/// How many spans an enumerated entity may produce per utterance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EnumMatchMode {
    /// The single closest phrase occurrence per entity
    #[default]
    Best,
    /// Every sufficiently close, non-overlapping occurrence of every phrase
    All,
}

/// Matches the surface texts of enumerated entities against an utterance.
#[derive(Debug, Clone)]
pub struct EnumMatcher {
    search: SimilarSearch,
    threshold: f64,
    mode: EnumMatchMode,
    name: String,
}

impl EnumMatcher {
    /// Create a matcher accepting matches whose accuracy reaches `threshold`
    pub fn new(search: SimilarSearch, threshold: f64) -> Self {
        Self {
            search,
            threshold,
            mode: EnumMatchMode::Best,
            name: "enum_matcher".to_string(),
        }
    }

    pub fn with_mode(mut self, mode: EnumMatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Recognizes every enumerated entity of `locale` in `utterance`.
    ///
    /// Entities not named in `whitelist` are skipped when a whitelist is
    /// given. Spans come out grouped by entity, in entity name order.
    pub fn match_enum(
        &self,
        utterance: &str,
        locale: &str,
        rules: &RuleTable,
        whitelist: Option<&[String]>,
    ) -> Vec<Span> {
        let chars: Vec<char> = utterance.chars().collect();
        let words = self.search.word_positions(utterance);
        let context = RecognitionContext {
            utterance,
            chars: &chars,
            locale,
            rules,
            word_positions: &words,
            whitelist,
        };
        self.recognize(&context)
    }

    fn match_entity(
        &self,
        context: &RecognitionContext<'_>,
        entity: &str,
        rule: &EnumRule,
    ) -> Vec<Span> {
        match self.mode {
            EnumMatchMode::Best => self
                .best_for_entity(context, entity, rule)
                .into_iter()
                .collect(),
            EnumMatchMode::All => self.all_for_entity(context, entity, rule),
        }
    }

    fn best_for_entity(
        &self,
        context: &RecognitionContext<'_>,
        entity: &str,
        rule: &EnumRule,
    ) -> Option<Span> {
        let mut best: Option<(SpanMatch, &EnumOption, &str)> = None;

        'options: for option in &rule.options {
            if option.texts.is_empty() {
                warn!(entity, option = %option.name, "Enum option has no texts");
                continue;
            }
            for phrase in option.texts.iter().filter(|t| !t.is_empty()) {
                let candidate = if context.utterance == phrase.as_str() {
                    Some(exact_match(context.chars.len()))
                } else {
                    self.search
                        .best_span_in(context.chars, phrase, context.word_positions)
                };
                let Some(candidate) = candidate else {
                    continue;
                };
                if best
                    .as_ref()
                    .is_none_or(|(current, _, _)| candidate.levenshtein < current.levenshtein)
                {
                    best = Some((candidate, option, phrase));
                    if candidate.levenshtein == 0 {
                        break 'options;
                    }
                }
            }
        }

        let (found, option, phrase) = best?;
        if !self.accepts(&found) {
            trace!(entity, accuracy = found.accuracy, "Best enum match rejected");
            return None;
        }
        Some(self.to_span(context.chars, entity, found, option, phrase))
    }

    fn all_for_entity(
        &self,
        context: &RecognitionContext<'_>,
        entity: &str,
        rule: &EnumRule,
    ) -> Vec<Span> {
        let mut spans = Vec::new();
        for option in &rule.options {
            for phrase in option.texts.iter().filter(|t| !t.is_empty()) {
                let found = self.search.best_span_list_in(
                    context.chars,
                    phrase,
                    Some(self.threshold),
                    context.word_positions,
                );
                spans.extend(
                    found
                        .into_iter()
                        .filter(|m| self.accepts(m))
                        .map(|m| self.to_span(context.chars, entity, m, option, phrase)),
                );
            }
        }
        spans
    }

    fn accepts(&self, found: &SpanMatch) -> bool {
        found.accuracy > 0.0 && found.accuracy >= self.threshold
    }

    fn to_span(
        &self,
        chars: &[char],
        entity: &str,
        found: SpanMatch,
        option: &EnumOption,
        phrase: &str,
    ) -> Span {
        Span::from_chars(chars, found.start, found.end, entity, SpanKind::Enum, found.accuracy)
            .with_source_text(phrase)
            .with_option(option.name.clone())
            .with_levenshtein(found.levenshtein)
            .with_resolution(Resolution::Option {
                value: option.name.clone(),
            })
    }
}

fn exact_match(len: usize) -> SpanMatch {
    SpanMatch {
        start: 0,
        end: len - 1,
        len,
        levenshtein: 0,
        accuracy: 1.0,
    }
}

impl Recognizer for EnumMatcher {
    fn recognize(&self, context: &RecognitionContext<'_>) -> Vec<Span> {
        let Some(entities) = context.rules.entities(context.locale) else {
            return Vec::new();
        };
        if context.chars.is_empty() {
            return Vec::new();
        }

        let mut spans = Vec::new();
        for (entity, rule) in entities {
            if !context.is_allowed(entity) {
                continue;
            }
            if let EntityRule::Enum(rule) = rule {
                spans.extend(self.match_entity(context, entity, rule));
            }
        }
        debug!(locale = context.locale, spans = spans.len(), "Enum matching complete");
        spans
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        150
    }
}
