//! Span types produced by the recognizers.

use serde::{Deserialize, Serialize};

use super::builtin::BuiltinKind;
use crate::similarity::char_slice;

/// Which part of the utterance a trim rule extracts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TrimKind {
    /// Text before each anchor occurrence
    Before,
    /// Text before the first anchor occurrence
    BeforeFirst,
    /// Text before the last anchor occurrence
    BeforeLast,
    /// Text after each anchor occurrence
    After,
    /// Text after the first anchor occurrence
    AfterFirst,
    /// Text after the last anchor occurrence
    AfterLast,
    /// Text between a left and a right anchor
    Between,
}

impl TrimKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrimKind::Before => "before",
            TrimKind::BeforeFirst => "beforeFirst",
            TrimKind::BeforeLast => "beforeLast",
            TrimKind::After => "after",
            TrimKind::AfterFirst => "afterFirst",
            TrimKind::AfterLast => "afterLast",
            TrimKind::Between => "between",
        }
    }
}

/// The recognizer family a span came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", content = "subtype", rename_all = "lowercase")]
pub enum SpanKind {
    Enum,
    Trim(TrimKind),
    Builtin(BuiltinKind),
    /// Supplied by the caller, with a free-form type name
    External(String),
}

impl SpanKind {
    pub fn type_name(&self) -> &str {
        match self {
            SpanKind::Enum => "enum",
            SpanKind::Trim(_) => "trim",
            SpanKind::Builtin(_) => "builtin",
            SpanKind::External(name) => name,
        }
    }

    pub fn subtype(&self) -> Option<&'static str> {
        match self {
            SpanKind::Trim(kind) => Some(kind.as_str()),
            SpanKind::Builtin(kind) => Some(kind.as_str()),
            _ => None,
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, SpanKind::Enum)
    }

    pub fn is_trim(&self) -> bool {
        matches!(self, SpanKind::Trim(_))
    }
}

/// Normalized value attached to a span.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resolution {
    /// Canonical option of an enumerated entity
    Option { value: String },
    /// Parsed number; `str_value` is the canonical decimal text
    Number { str_value: String, value: f64 },
    /// Any other canonical text
    Text { value: String },
}

/// A recognized entity occurrence inside an utterance.
///
/// `start` and `end` are inclusive character indices into the utterance and
/// `len == end - start + 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub len: usize,
    /// Match quality in 0.0..=1.0
    pub accuracy: f64,
    /// The phrase that matched (the rule text for enum spans)
    pub source_text: String,
    /// The characters of the utterance covered by the span
    pub utterance_text: String,
    pub entity: String,
    pub kind: SpanKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levenshtein: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}

impl Span {
    /// Builds a span covering `chars[start..=end]`.
    pub fn from_chars(
        chars: &[char],
        start: usize,
        end: usize,
        entity: impl Into<String>,
        kind: SpanKind,
        accuracy: f64,
    ) -> Self {
        let text = char_slice(chars, start, end);
        Self {
            start,
            end,
            len: end - start + 1,
            accuracy,
            source_text: text.clone(),
            utterance_text: text,
            entity: entity.into(),
            kind,
            option: None,
            levenshtein: None,
            resolution: None,
        }
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = Some(option.into());
        self
    }

    pub fn with_source_text(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = source_text.into();
        self
    }

    pub fn with_levenshtein(mut self, levenshtein: usize) -> Self {
        self.levenshtein = Some(levenshtein);
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Moves the span to `start..=end`, taking the text from `chars`.
    pub fn rebound(&mut self, chars: &[char], start: usize, end: usize) {
        let text = char_slice(chars, start, end);
        self.start = start;
        self.end = end;
        self.len = end - start + 1;
        self.source_text = text.clone();
        self.utterance_text = text;
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// True when `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn same_interval(&self, other: &Span) -> bool {
        self.start == other.start && self.end == other.end
    }

    /// Get a formatted string representation of the span.
    pub fn format(&self) -> String {
        match self.kind.subtype() {
            Some(subtype) => format!(
                "{} [{}:{}/{}] {}..{} (accuracy: {:.2})",
                self.utterance_text,
                self.entity,
                self.kind.type_name(),
                subtype,
                self.start,
                self.end,
                self.accuracy
            ),
            None => format!(
                "{} [{}:{}] {}..{} (accuracy: {:.2})",
                self.utterance_text,
                self.entity,
                self.kind.type_name(),
                self.start,
                self.end,
                self.accuracy
            ),
        }
    }
}

/// Replaces every span of `utterance` with `%entity%`.
///
/// Spans are applied right to left so earlier positions stay valid; a span
/// overlapping one already replaced is skipped.
pub fn templatize(utterance: &str, spans: &[Span]) -> String {
    let mut chars: Vec<char> = utterance.chars().collect();
    let mut ordered: Vec<&Span> = spans.iter().filter(|s| s.end < chars.len()).collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut floor = usize::MAX;
    for span in ordered {
        if span.end >= floor {
            continue;
        }
        let placeholder: Vec<char> = format!("%{}%", span.entity).chars().collect();
        chars.splice(span.start..=span.end, placeholder);
        floor = span.start;
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn test_from_chars_uses_char_positions() {
        let text = chars("ñandú blanco");
        let span = Span::from_chars(&text, 6, 11, "color", SpanKind::Enum, 1.0);
        assert_eq!(span.utterance_text, "blanco");
        assert_eq!(span.len, 6);
    }

    #[test]
    fn test_relations() {
        let text = chars("abcdefghij");
        let outer = Span::from_chars(&text, 0, 5, "a", SpanKind::Enum, 1.0);
        let inner = Span::from_chars(&text, 2, 3, "b", SpanKind::Enum, 1.0);
        let apart = Span::from_chars(&text, 6, 9, "c", SpanKind::Enum, 1.0);
        assert!(outer.overlaps(&inner));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.overlaps(&apart));
        assert!(outer.same_interval(&outer.clone()));
    }

    #[test]
    fn test_kind_serialization() {
        let value = serde_json::to_value(SpanKind::Trim(TrimKind::AfterLast)).unwrap();
        assert_eq!(value, serde_json::json!({"type": "trim", "subtype": "afterLast"}));

        let value = serde_json::to_value(SpanKind::Enum).unwrap();
        assert_eq!(value, serde_json::json!({"type": "enum"}));
    }

    #[test]
    fn test_templatize() {
        let text = "I saw spiderman and ironman";
        let chars = chars(text);
        let spans = vec![
            Span::from_chars(&chars, 6, 14, "hero", SpanKind::Enum, 1.0),
            Span::from_chars(&chars, 20, 26, "hero", SpanKind::Enum, 1.0),
        ];
        assert_eq!(templatize(text, &spans), "I saw %hero% and %hero%");
    }

    #[test]
    fn test_templatize_skips_overlaps() {
        let text = "new york city";
        let chars = chars(text);
        let spans = vec![
            Span::from_chars(&chars, 0, 7, "city", SpanKind::Enum, 1.0),
            Span::from_chars(&chars, 4, 12, "other", SpanKind::Enum, 0.9),
        ];
        assert_eq!(templatize(text, &spans), "new %other%");
    }
}
