//! Positional extraction around literal anchor words.
//!
//! Anchors are found by exact substring search; no fuzzy matching happens
//! here. Extracted segments are trimmed of surrounding whitespace and
//! punctuation, and a segment left empty is never reported.

use tracing::debug;

use super::rules::{AnchorPosition, BetweenStrategy, EntityRule, RuleTable, TrimCondition, TrimOptions, TrimRule};
use super::traits::{RecognitionContext, Recognizer};
use super::{Span, SpanKind, TrimKind};

/// Accuracy of spans derived from a single anchor.
pub const POSITION_ACCURACY: f64 = 0.99;

/// Accuracy of spans enclosed by a left and a right anchor.
pub const BETWEEN_ACCURACY: f64 = 1.0;

const TRIM_PUNCTUATION: &[char] = &[
    ',', '.', ';', ':', '!', '?', '¡', '¿', '(', ')', '[', ']', '{', '}', '"', '\'', '/', '-',
];

/// Located anchor occurrence; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Anchor {
    start: usize,
    end: usize,
}

/// Recognizes trim entities.
#[derive(Debug, Clone)]
pub struct TrimMatcher {
    name: String,
}

impl Default for TrimMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TrimMatcher {
    pub fn new() -> Self {
        Self {
            name: "trim_matcher".to_string(),
        }
    }

    /// Recognizes every trim entity of `locale` in `utterance`.
    pub fn match_trim(
        &self,
        utterance: &str,
        locale: &str,
        rules: &RuleTable,
        whitelist: Option<&[String]>,
    ) -> Vec<Span> {
        let chars: Vec<char> = utterance.chars().collect();
        let context = RecognitionContext {
            utterance,
            chars: &chars,
            locale,
            rules,
            word_positions: &[],
            whitelist,
        };
        self.recognize(&context)
    }

    /// Applies every condition of one trim entity.
    pub fn match_rule(&self, chars: &[char], entity: &str, rule: &TrimRule) -> Vec<Span> {
        let mut spans = Vec::new();
        for condition in &rule.conditions {
            match condition {
                TrimCondition::Position {
                    position,
                    words,
                    options,
                } => {
                    for word in words {
                        spans.extend(self.match_position(chars, entity, *position, word, options));
                    }
                }
                TrimCondition::Between {
                    left,
                    right,
                    strategy,
                    options,
                } => {
                    let found = match strategy {
                        BetweenStrategy::Simplest => {
                            self.between_simplest(chars, entity, left, right, options)
                        }
                        BetweenStrategy::Last => {
                            self.between_last(chars, entity, left, right, options)
                        }
                    };
                    spans.extend(found);
                }
            }
        }
        spans
    }

    /// Segments positioned relative to the occurrences of one anchor word.
    ///
    /// `Before` and `After` yield one segment per occurrence, each bounded by
    /// the neighbouring occurrence; the first/last variants yield at most one.
    pub fn match_position(
        &self,
        chars: &[char],
        entity: &str,
        position: AnchorPosition,
        word: &str,
        options: &TrimOptions,
    ) -> Vec<Span> {
        let anchors = find_anchors(chars, word, options);
        let (Some(first), Some(last)) = (anchors.first(), anchors.last()) else {
            return Vec::new();
        };

        let segments: Vec<(usize, usize)> = match position {
            AnchorPosition::Before => {
                let mut from = 0;
                anchors
                    .iter()
                    .map(|anchor| {
                        let segment = (from, anchor.start);
                        from = anchor.end;
                        segment
                    })
                    .collect()
            }
            AnchorPosition::After => anchors
                .iter()
                .enumerate()
                .map(|(index, anchor)| {
                    let to = anchors.get(index + 1).map_or(chars.len(), |next| next.start);
                    (anchor.end, to)
                })
                .collect(),
            AnchorPosition::BeforeFirst => vec![(0, first.start)],
            AnchorPosition::BeforeLast => vec![(0, last.start)],
            AnchorPosition::AfterFirst => vec![(first.end, chars.len())],
            AnchorPosition::AfterLast => vec![(last.end, chars.len())],
        };

        let kind = SpanKind::Trim(position.into());
        segments
            .into_iter()
            .filter_map(|(from, to)| segment_span(chars, from, to, entity, &kind, POSITION_ACCURACY))
            .filter(|span| !is_skipped(span, options))
            .collect()
    }

    /// Every left occurrence paired with the nearest right occurrence after it.
    ///
    /// Left occurrences are taken in order; a right occurrence consumed by one
    /// pairing is not reused, and left occurrences inside a reported pairing
    /// are skipped.
    pub fn between_simplest(
        &self,
        chars: &[char],
        entity: &str,
        left: &[String],
        right: &[String],
        options: &TrimOptions,
    ) -> Vec<Span> {
        let lefts = find_any_anchor(chars, left, options);
        let rights = find_any_anchor(chars, right, options);
        let kind = SpanKind::Trim(TrimKind::Between);

        let mut spans = Vec::new();
        let mut cursor = 0;
        for opening in lefts {
            if opening.start < cursor {
                continue;
            }
            let Some(closing) = rights.iter().find(|r| r.start >= opening.end) else {
                break;
            };
            if let Some(span) =
                segment_span(chars, opening.end, closing.start, entity, &kind, BETWEEN_ACCURACY)
            {
                if !is_skipped(&span, options) {
                    spans.push(span);
                }
                cursor = closing.end;
            }
        }
        spans
    }

    /// The pairing closest to the end of the utterance.
    ///
    /// Left occurrences are tried from the last one backwards; the first that
    /// has a right occurrence after it is paired with the nearest such one.
    pub fn between_last(
        &self,
        chars: &[char],
        entity: &str,
        left: &[String],
        right: &[String],
        options: &TrimOptions,
    ) -> Vec<Span> {
        let lefts = find_any_anchor(chars, left, options);
        let rights = find_any_anchor(chars, right, options);
        let kind = SpanKind::Trim(TrimKind::Between);

        for opening in lefts.iter().rev() {
            let found = rights
                .iter()
                .filter(|r| r.start >= opening.end)
                .find_map(|closing| {
                    segment_span(chars, opening.end, closing.start, entity, &kind, BETWEEN_ACCURACY)
                });
            if let Some(span) = found {
                return if is_skipped(&span, options) {
                    Vec::new()
                } else {
                    vec![span]
                };
            }
        }
        Vec::new()
    }
}

impl Recognizer for TrimMatcher {
    fn recognize(&self, context: &RecognitionContext<'_>) -> Vec<Span> {
        let Some(entities) = context.rules.entities(context.locale) else {
            return Vec::new();
        };

        let mut spans = Vec::new();
        for (entity, rule) in entities {
            if !context.is_allowed(entity) {
                continue;
            }
            if let EntityRule::Trim(rule) = rule {
                spans.extend(self.match_rule(context.chars, entity, rule));
            }
        }
        debug!(locale = context.locale, spans = spans.len(), "Trim matching complete");
        spans
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn chars_equal(a: char, b: char, case_insensitive: bool) -> bool {
    a == b || (case_insensitive && a.to_lowercase().eq(b.to_lowercase()))
}

fn is_boundary(chars: &[char], index: usize) -> bool {
    chars.get(index).is_none_or(|c| !c.is_alphanumeric())
}

/// Non-overlapping occurrences of `word`, left to right.
fn find_anchors(chars: &[char], word: &str, options: &TrimOptions) -> Vec<Anchor> {
    let needle: Vec<char> = word.trim().chars().collect();
    let n = needle.len();
    if n == 0 || n > chars.len() {
        return Vec::new();
    }

    let mut anchors = Vec::new();
    let mut index = 0;
    while index + n <= chars.len() {
        let matches = chars[index..index + n]
            .iter()
            .zip(&needle)
            .all(|(a, b)| chars_equal(*a, *b, options.case_insensitive));
        let bounded = options.no_spaces
            || ((index == 0 || is_boundary(chars, index - 1)) && is_boundary(chars, index + n));
        if matches && bounded {
            anchors.push(Anchor {
                start: index,
                end: index + n,
            });
            index += n;
        } else {
            index += 1;
        }
    }
    anchors
}

/// Occurrences of any of `words`; where two overlap the earlier, then longer, one wins.
fn find_any_anchor(chars: &[char], words: &[String], options: &TrimOptions) -> Vec<Anchor> {
    let mut all: Vec<Anchor> = words
        .iter()
        .flat_map(|word| find_anchors(chars, word, options))
        .collect();
    all.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut anchors: Vec<Anchor> = Vec::with_capacity(all.len());
    for anchor in all {
        if anchors.last().is_none_or(|previous| anchor.start >= previous.end) {
            anchors.push(anchor);
        }
    }
    anchors
}

fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || TRIM_PUNCTUATION.contains(&c)
}

/// Span over `chars[from..to]` once trimmed; `None` when nothing is left.
fn segment_span(
    chars: &[char],
    mut from: usize,
    mut to: usize,
    entity: &str,
    kind: &SpanKind,
    accuracy: f64,
) -> Option<Span> {
    while from < to && is_trimmable(chars[from]) {
        from += 1;
    }
    while to > from && is_trimmable(chars[to - 1]) {
        to -= 1;
    }
    (from < to).then(|| Span::from_chars(chars, from, to - 1, entity, kind.clone(), accuracy))
}

fn is_skipped(span: &Span, options: &TrimOptions) -> bool {
    options.skip.iter().any(|skip| {
        if options.case_insensitive {
            skip.to_lowercase() == span.utterance_text.to_lowercase()
        } else {
            *skip == span.utterance_text
        }
    })
}
