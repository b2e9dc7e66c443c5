//! Conflict resolution between overlapping spans.
//!
//! Every recognizer reports candidates independently, so the same stretch
//! of an utterance can be claimed several times. [`SpanConflictResolver`]
//! reduces the candidates to a consistent set with a pairwise sweep:
//!
//! 1. Spans sharing the exact same interval are checked for competing
//!    numeric readings: an ordinal beats a number, and a number whose
//!    separators do not survive re-parsing is dropped.
//! 2. Every remaining overlapping pair is settled by precedence: higher
//!    accuracy wins; at equal accuracy the longer of two spans of the same
//!    entity survives, and numbers, ordinals and nested enumerated spans are
//!    reduced as described on [`SpanConflictResolver::resolve`].
//!
//! Survivors keep their input order.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use super::pipeline::SpanPostProcessor;
use super::{Resolution, Span};

const NUMBER_ENTITY: &str = "number";
const ORDINAL_ENTITY: &str = "ordinal";

lazy_static! {
    static ref LEADING_FLOAT: Regex =
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Keep,
    DiscardFirst,
    DiscardSecond,
}

/// Removes redundant and conflicting spans.
#[derive(Debug, Clone)]
pub struct SpanConflictResolver {
    name: String,
}

impl Default for SpanConflictResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanConflictResolver {
    pub fn new() -> Self {
        Self {
            name: "span_conflict_resolver".to_string(),
        }
    }

    /// Reduces `spans` to a consistent subset, preserving input order.
    ///
    /// For two overlapping spans:
    /// - the higher accuracy wins
    /// - at equal accuracy, a number nested with an ordinal is dropped, while an
    ///   ordinal only partially overlapping a number is dropped
    /// - at equal accuracy, of two spans of the same entity the longer is kept
    ///   (the earlier on equal length)
    /// - at equal accuracy, a number is dropped in favour of any span at least
    ///   as long
    /// - at equal accuracy, an enumerated span inside another enumerated span is dropped
    /// - anything else is kept
    ///
    /// Accuracy values are taken as given; filtering non-positive accuracy
    /// is the caller's job.
    pub fn resolve(&self, spans: Vec<Span>) -> Vec<Span> {
        let mut discarded = vec![false; spans.len()];
        self.reduce_identical(&spans, &mut discarded);
        self.reduce_overlapping(&spans, &mut discarded);

        let before = spans.len();
        let kept: Vec<Span> = spans
            .into_iter()
            .zip(discarded)
            .filter_map(|(span, discarded)| (!discarded).then_some(span))
            .collect();
        debug!(candidates = before, kept = kept.len(), "Span conflicts resolved");
        kept
    }

    fn reduce_identical(&self, spans: &[Span], discarded: &mut [bool]) {
        for i in 0..spans.len() {
            for j in (i + 1)..spans.len() {
                if discarded[i] {
                    break;
                }
                if discarded[j] || !spans[i].same_interval(&spans[j]) {
                    continue;
                }
                let (a, b) = (&spans[i], &spans[j]);
                match (a.entity.as_str(), b.entity.as_str()) {
                    (ORDINAL_ENTITY, NUMBER_ENTITY) => discarded[j] = true,
                    (NUMBER_ENTITY, ORDINAL_ENTITY) => discarded[i] = true,
                    (NUMBER_ENTITY, NUMBER_ENTITY) => {
                        if !is_numerically_consistent(b) {
                            trace!(text = %b.source_text, "Discarding inconsistent number reading");
                            discarded[j] = true;
                        }
                        if !is_numerically_consistent(a) {
                            trace!(text = %a.source_text, "Discarding inconsistent number reading");
                            discarded[i] = true;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn reduce_overlapping(&self, spans: &[Span], discarded: &mut [bool]) {
        for i in 0..spans.len() {
            for j in (i + 1)..spans.len() {
                if discarded[i] {
                    break;
                }
                if discarded[j] || !spans[i].overlaps(&spans[j]) {
                    continue;
                }
                match decide(&spans[i], &spans[j]) {
                    Verdict::Keep => {}
                    Verdict::DiscardFirst => discarded[i] = true,
                    Verdict::DiscardSecond => discarded[j] = true,
                }
            }
        }
    }
}

/// Settles one overlapping pair, `first` preceding `second` in input order.
fn decide(first: &Span, second: &Span) -> Verdict {
    if first.accuracy > second.accuracy {
        return Verdict::DiscardSecond;
    }
    if second.accuracy > first.accuracy {
        return Verdict::DiscardFirst;
    }

    let nested = first.contains(second) || second.contains(first);
    match (first.entity.as_str(), second.entity.as_str()) {
        (NUMBER_ENTITY, ORDINAL_ENTITY) => {
            return if nested {
                Verdict::DiscardFirst
            } else {
                Verdict::DiscardSecond
            };
        }
        (ORDINAL_ENTITY, NUMBER_ENTITY) => {
            return if nested {
                Verdict::DiscardSecond
            } else {
                Verdict::DiscardFirst
            };
        }
        _ => {}
    }

    if first.entity == second.entity {
        return if second.len > first.len {
            Verdict::DiscardFirst
        } else {
            Verdict::DiscardSecond
        };
    }
    if second.entity == NUMBER_ENTITY && second.len <= first.len {
        return Verdict::DiscardSecond;
    }
    if first.entity == NUMBER_ENTITY && first.len <= second.len {
        return Verdict::DiscardFirst;
    }

    if first.kind.is_enum() && second.kind.is_enum() {
        if first.len >= second.len && first.contains(second) {
            return Verdict::DiscardSecond;
        }
        if second.contains(first) {
            return Verdict::DiscardFirst;
        }
    }

    Verdict::Keep
}

/// Leading decimal prefix of `text` as a float, `None` when there is none.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    LEADING_FLOAT
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

/// Whether a number span's text agrees with its resolved value.
///
/// Texts without separators always agree. Otherwise the first comma of the
/// text is read as a decimal point and compared with the resolved value.
fn is_numerically_consistent(span: &Span) -> bool {
    let source = &span.source_text;
    if !source.contains([',', '.']) {
        return true;
    }
    let Some(Resolution::Number { str_value, .. }) = &span.resolution else {
        return true;
    };
    let read = parse_leading_float(&source.replacen(',', ".", 1));
    let declared = parse_leading_float(&str_value.replacen(',', ".", 1));
    matches!((read, declared), (Some(read), Some(declared)) if read == declared)
}

impl SpanPostProcessor for SpanConflictResolver {
    fn process(&self, spans: Vec<Span>) -> Vec<Span> {
        self.resolve(spans)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
