//! Regex-based recognizers for common entity formats.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::locale::language_of;
use super::traits::{RecognitionContext, Recognizer};
use super::{Resolution, Span, SpanKind};
use crate::{Result, SpanlexError};

/// Accuracy of every builtin span.
pub const BUILTIN_ACCURACY: f64 = 0.95;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref URL_REGEX: Regex = Regex::new(
        r"(?i)\b(?:https?://|www\.)[-A-Za-z0-9+&@#/%?=~_|!:,.;]*[-A-Za-z0-9+&@#/%=~_|]"
    )
    .unwrap();
    static ref IPV4_REGEX: Regex = Regex::new(
        r"\b(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\b"
    )
    .unwrap();
    static ref IPV6_REGEX: Regex = Regex::new(
        r"(?i)\b(?:[0-9a-f]{1,4}:){7}[0-9a-f]{1,4}\b|\b(?:[0-9a-f]{1,4}:){1,6}(?::[0-9a-f]{1,4}){1,6}\b"
    )
    .unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(
        r"\+?1?[-.\s]?\(?[2-9]\d{2}\)?[-.\s]?\d{3}[-.\s]?\d{4}|\+\d{1,3}[-.\s]?\d{3,4}[-.\s]?\d{3}[-.\s]?\d{4}"
    )
    .unwrap();
    static ref HASHTAG_REGEX: Regex = Regex::new(r"(?:^|\s)(#[\p{L}\p{N}_]+)").unwrap();
    static ref MENTION_REGEX: Regex = Regex::new(r"(?:^|\s)(@[\p{L}\p{N}_]+)").unwrap();
    static ref PERCENTAGE_REGEX: Regex = Regex::new(r"\b(\d+(?:[.,]\d+)?)\s?%").unwrap();
    static ref ORDINAL_REGEX: Regex =
        Regex::new(r"(?i)\b(\d+)(?:st|nd|rd|th|º|ª|er|ème)\b").unwrap();
    static ref NUMBER_REGEX: Regex =
        Regex::new(r"\b\d{1,3}(?:[.,]\d{3})+(?:[.,]\d+)?\b|\b\d+(?:[.,]\d+)?\b").unwrap();
    static ref DATE_REGEX: Regex = Regex::new(
        r"\b(?:(?:0?[1-9]|1[0-2])[\/\-.](?:0?[1-9]|[12]\d|3[01])[\/\-.](?:19|20)\d{2}|\b(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\.?\s+(?:0?[1-9]|[12]\d|3[01])(?:st|nd|rd|th)?,?\s+(?:19|20)\d{2}|\b(?:19|20)\d{2}[-/.](?:0?[1-9]|1[0-2])[-/.](?:0?[1-9]|[12]\d|3[01])\b)"
    )
    .unwrap();
}

/// Languages writing the decimal separator as a comma.
const DECIMAL_COMMA_LANGUAGES: &[&str] = &[
    "ca", "cs", "da", "de", "el", "es", "eu", "fi", "fr", "gl", "hu", "id", "it", "nb", "nl",
    "no", "pl", "pt", "ro", "ru", "sk", "sl", "sv", "tr", "uk",
];

/// The closed set of builtin entity formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinKind {
    Email,
    Url,
    Ipv4,
    Ipv6,
    PhoneNumber,
    Hashtag,
    Mention,
    Percentage,
    Ordinal,
    Number,
    Date,
}

impl BuiltinKind {
    /// Every builtin, in recognition order
    pub const ALL: [BuiltinKind; 11] = [
        BuiltinKind::Email,
        BuiltinKind::Url,
        BuiltinKind::Ipv4,
        BuiltinKind::Ipv6,
        BuiltinKind::PhoneNumber,
        BuiltinKind::Hashtag,
        BuiltinKind::Mention,
        BuiltinKind::Percentage,
        BuiltinKind::Ordinal,
        BuiltinKind::Number,
        BuiltinKind::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinKind::Email => "email",
            BuiltinKind::Url => "url",
            BuiltinKind::Ipv4 => "ipv4",
            BuiltinKind::Ipv6 => "ipv6",
            BuiltinKind::PhoneNumber => "phonenumber",
            BuiltinKind::Hashtag => "hashtag",
            BuiltinKind::Mention => "mention",
            BuiltinKind::Percentage => "percentage",
            BuiltinKind::Ordinal => "ordinal",
            BuiltinKind::Number => "number",
            BuiltinKind::Date => "date",
        }
    }

    /// Entity name reported on the spans of this kind.
    pub fn entity_name(&self) -> &'static str {
        match self {
            BuiltinKind::Ipv4 | BuiltinKind::Ipv6 => "ip",
            other => other.as_str(),
        }
    }

    /// Preference when two builtin spans overlap (higher wins).
    fn priority(&self) -> u8 {
        match self {
            BuiltinKind::Email => 100,
            BuiltinKind::Url => 95,
            BuiltinKind::Ipv6 => 92,
            BuiltinKind::Ipv4 => 91,
            BuiltinKind::PhoneNumber => 90,
            BuiltinKind::Date => 80,
            BuiltinKind::Percentage => 70,
            BuiltinKind::Ordinal => 60,
            BuiltinKind::Hashtag | BuiltinKind::Mention => 55,
            BuiltinKind::Number => 40,
        }
    }

    /// Recognizes every occurrence of this format in `text`.
    ///
    /// `locale` only matters for numbers, whose separators are read the way
    /// the locale's language writes them.
    pub fn recognize(&self, text: &str, locale: &str) -> Vec<Span> {
        let index = CharIndex::new(text);
        let chars: Vec<char> = text.chars().collect();
        let kind = SpanKind::Builtin(*self);
        let entity = self.entity_name();

        let span_at = |start: usize, end: usize| {
            Span::from_chars(
                &chars,
                index.char_at(start),
                index.char_at(end) - 1,
                entity,
                kind.clone(),
                BUILTIN_ACCURACY,
            )
        };
        let text_spans = |regex: &Regex, group: usize| -> Vec<Span> {
            regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(group))
                .map(|m| {
                    span_at(m.start(), m.end()).with_resolution(Resolution::Text {
                        value: m.as_str().to_string(),
                    })
                })
                .collect()
        };

        match self {
            BuiltinKind::Email => text_spans(&EMAIL_REGEX, 0),
            BuiltinKind::Url => text_spans(&URL_REGEX, 0),
            BuiltinKind::Ipv4 => text_spans(&IPV4_REGEX, 0),
            BuiltinKind::Ipv6 => text_spans(&IPV6_REGEX, 0),
            BuiltinKind::PhoneNumber => text_spans(&PHONE_REGEX, 0)
                .into_iter()
                .map(|mut span| {
                    span.resolution = Some(Resolution::Text {
                        value: span.utterance_text.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect(),
                    });
                    span
                })
                .collect(),
            BuiltinKind::Hashtag => text_spans(&HASHTAG_REGEX, 1),
            BuiltinKind::Mention => text_spans(&MENTION_REGEX, 1),
            BuiltinKind::Date => text_spans(&DATE_REGEX, 0),
            BuiltinKind::Percentage => PERCENTAGE_REGEX
                .captures_iter(text)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    let (str_value, value) = parse_number(caps.get(1)?.as_str(), uses_decimal_comma(locale))?;
                    Some(
                        span_at(whole.start(), whole.end())
                            .with_resolution(Resolution::Number { str_value, value }),
                    )
                })
                .collect(),
            BuiltinKind::Ordinal => ORDINAL_REGEX
                .captures_iter(text)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    let (str_value, value) = parse_number(caps.get(1)?.as_str(), false)?;
                    Some(
                        span_at(whole.start(), whole.end())
                            .with_resolution(Resolution::Number { str_value, value }),
                    )
                })
                .collect(),
            BuiltinKind::Number => {
                let decimal_comma = uses_decimal_comma(locale);
                let mut spans = Vec::new();
                for m in NUMBER_REGEX.find_iter(text) {
                    let Some((str_value, value)) = parse_number(m.as_str(), decimal_comma) else {
                        continue;
                    };
                    spans.push(
                        span_at(m.start(), m.end())
                            .with_resolution(Resolution::Number { str_value: str_value.clone(), value }),
                    );
                    // Comma-decimal locales also get the point-decimal reading;
                    // the conflict resolver keeps whichever is self-consistent.
                    if decimal_comma
                        && let Some((alt_str, alt_value)) = parse_number(m.as_str(), false)
                        && alt_str != str_value
                    {
                        spans.push(span_at(m.start(), m.end()).with_resolution(
                            Resolution::Number {
                                str_value: alt_str,
                                value: alt_value,
                            },
                        ));
                    }
                }
                spans
            }
        }
    }
}

impl std::str::FromStr for BuiltinKind {
    type Err = SpanlexError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.to_lowercase().replace(['-', '_'], "");
        BuiltinKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| SpanlexError::Configuration(format!("Unknown builtin entity: {}", s)))
    }
}

impl std::fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `locale` writes decimals with a comma.
pub fn uses_decimal_comma(locale: &str) -> bool {
    DECIMAL_COMMA_LANGUAGES.contains(&language_of(locale).as_str())
}

/// Reads a number written with grouping separators.
///
/// Returns the canonical decimal text and the value.
pub fn parse_number(text: &str, decimal_comma: bool) -> Option<(String, f64)> {
    let cleaned = if decimal_comma {
        text.replace('.', "").replace(',', ".")
    } else {
        text.replace(',', "")
    };
    let value: f64 = cleaned.parse().ok()?;
    Some((value.to_string(), value))
}

/// Maps byte offsets of a string to character indices.
struct CharIndex {
    starts: Vec<usize>,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        Self {
            starts: text.char_indices().map(|(byte, _)| byte).collect(),
        }
    }

    /// Character index at a byte offset; the string length maps to the char count.
    fn char_at(&self, byte: usize) -> usize {
        match self.starts.binary_search(&byte) {
            Ok(index) | Err(index) => index,
        }
    }
}

/// Runs a fixed list of builtin formats.
#[derive(Debug, Clone)]
pub struct BuiltinRecognizer {
    kinds: Vec<BuiltinKind>,
    name: String,
}

impl Default for BuiltinRecognizer {
    fn default() -> Self {
        Self::new(BuiltinKind::ALL.to_vec())
    }
}

impl BuiltinRecognizer {
    pub fn new(kinds: Vec<BuiltinKind>) -> Self {
        Self {
            kinds,
            name: "builtin_recognizer".to_string(),
        }
    }

    pub fn kinds(&self) -> &[BuiltinKind] {
        &self.kinds
    }

    /// Runs every configured format over `text`.
    pub fn recognize_text(&self, text: &str, locale: &str) -> Vec<Span> {
        let spans: Vec<Span> = self
            .kinds
            .iter()
            .flat_map(|kind| kind.recognize(text, locale))
            .collect();
        remove_overlaps(spans)
    }
}

impl Recognizer for BuiltinRecognizer {
    fn recognize(&self, context: &RecognitionContext<'_>) -> Vec<Span> {
        let spans = self.recognize_text(context.utterance, context.locale);
        debug!(locale = context.locale, spans = spans.len(), "Builtin recognition complete");
        spans
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        200
    }

    fn is_enabled(&self) -> bool {
        !self.kinds.is_empty()
    }
}

fn builtin_priority(span: &Span) -> u8 {
    match span.kind {
        SpanKind::Builtin(kind) => kind.priority(),
        _ => 0,
    }
}

/// Two readings of the same number are left for the conflict resolver.
fn is_reading_pair(a: &Span, b: &Span) -> bool {
    a.kind == b.kind && a.kind == SpanKind::Builtin(BuiltinKind::Number) && a.same_interval(b)
}

/// Remove overlapping spans, keeping the ones with higher priority, then the longer one
fn remove_overlaps(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|s| s.start);

    let mut result: Vec<Span> = Vec::new();
    for span in spans {
        let mut should_add = true;
        let mut indices_to_remove = Vec::new();

        for (idx, existing) in result.iter().enumerate() {
            if !span.overlaps(existing) || is_reading_pair(&span, existing) {
                continue;
            }
            let span_priority = builtin_priority(&span);
            let existing_priority = builtin_priority(existing);
            if span_priority > existing_priority
                || (span_priority == existing_priority && span.len > existing.len)
            {
                indices_to_remove.push(idx);
            } else {
                should_add = false;
                break;
            }
        }

        if should_add {
            for &idx in indices_to_remove.iter().rev() {
                result.remove(idx);
            }
            result.push(span);
        }
    }
    result
}
