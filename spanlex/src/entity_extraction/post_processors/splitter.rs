//! Carves nested spans out of trim spans.

use tracing::trace;

use crate::entity_extraction::Span;
use crate::entity_extraction::pipeline::SpanPostProcessor;

/// Shrinks trim spans around the non-trim spans they contain.
///
/// Positional rules capture everything up to an anchor, which often
/// swallows a more precise entity. For every non-trim span strictly inside
/// a trim span, the trim span keeps only its larger side of the nested
/// span, trimmed of whitespace; a trim span left empty is dropped.
#[derive(Debug, Clone)]
pub struct TrimSplitter {
    name: String,
}

impl Default for TrimSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl TrimSplitter {
    pub fn new() -> Self {
        Self {
            name: "trim_splitter".to_string(),
        }
    }
}

/// Largest side of `edge` left after removing `inner`, or `None` when empty.
fn split_around(edge: &Span, inner: &Span) -> Option<(usize, usize)> {
    let chars: Vec<char> = edge.utterance_text.chars().collect();
    let (mut from, mut to) = if inner.start - edge.start > edge.end - inner.end {
        (0, inner.start - edge.start)
    } else {
        (inner.end - edge.start + 1, chars.len())
    };
    while from < to && chars[from].is_whitespace() {
        from += 1;
    }
    while to > from && chars[to - 1].is_whitespace() {
        to -= 1;
    }
    (from < to).then_some((from, to))
}

impl SpanPostProcessor for TrimSplitter {
    fn process(&self, mut spans: Vec<Span>) -> Vec<Span> {
        let mut dropped = vec![false; spans.len()];

        for i in 0..spans.len() {
            if !spans[i].kind.is_trim() {
                continue;
            }
            for j in 0..spans.len() {
                if i == j || dropped[j] || spans[j].kind.is_trim() {
                    continue;
                }
                if !spans[i].contains(&spans[j]) || spans[i].same_interval(&spans[j]) {
                    continue;
                }
                match split_around(&spans[i], &spans[j]) {
                    Some((from, to)) => {
                        let chars: Vec<char> = spans[i].utterance_text.chars().collect();
                        let start = spans[i].start;
                        spans[i].rebound(&chars, from, to - 1);
                        spans[i].start += start;
                        spans[i].end += start;
                        trace!(entity = %spans[i].entity, "Trim span split");
                    }
                    None => {
                        dropped[i] = true;
                        break;
                    }
                }
            }
        }

        spans
            .into_iter()
            .zip(dropped)
            .filter_map(|(span, dropped)| (!dropped).then_some(span))
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_extraction::{BuiltinKind, SpanKind, TrimKind};

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn test_trim_span_keeps_larger_side() {
        let text = chars("I go to Paris on 12/25/2024 now");
        let trim = Span::from_chars(&text, 8, 30, "place", SpanKind::Trim(TrimKind::After), 0.99);
        assert_eq!(trim.utterance_text, "Paris on 12/25/2024 now");
        let date = Span::from_chars(&text, 17, 26, "date", SpanKind::Builtin(BuiltinKind::Date), 0.95);

        let spans = TrimSplitter::new().process(vec![trim, date]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].utterance_text, "Paris on");
        assert_eq!((spans[0].start, spans[0].end), (8, 15));
        assert_eq!(spans[0].source_text, "Paris on");
    }

    #[test]
    fn test_nested_at_start_keeps_tail() {
        let text = chars("to john@example.com");
        let trim = Span::from_chars(&text, 3, 18, "who", SpanKind::Trim(TrimKind::After), 0.99);
        let email = Span::from_chars(&text, 3, 18, "email", SpanKind::Builtin(BuiltinKind::Email), 0.95);
        let nested = Span::from_chars(&text, 3, 6, "name", SpanKind::Enum, 1.0);

        // Identical interval is left to the conflict resolver
        let spans = TrimSplitter::new().process(vec![trim.clone(), email]);
        assert_eq!(spans.len(), 2);

        let spans = TrimSplitter::new().process(vec![trim, nested]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].utterance_text, "@example.com");
    }

    #[test]
    fn test_non_trim_spans_untouched() {
        let text = chars("red car");
        let a = Span::from_chars(&text, 0, 6, "a", SpanKind::Enum, 1.0);
        let b = Span::from_chars(&text, 0, 2, "b", SpanKind::Enum, 1.0);
        let spans = TrimSplitter::new().process(vec![a.clone(), b.clone()]);
        assert_eq!(spans, vec![a, b]);
    }
}
