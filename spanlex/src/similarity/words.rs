//! Word segmentation with character-indexed positions.

use serde::{Deserialize, Serialize};

/// A maximal run of word characters, located by character index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordPosition {
    pub start: usize,
    /// Inclusive
    pub end: usize,
    pub len: usize,
}

impl WordPosition {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            len: end - start + 1,
        }
    }
}

/// Inclusive range of characters treated as word characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharRange {
    pub from: char,
    pub to: char,
}

impl CharRange {
    pub fn new(from: char, to: char) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, c: char) -> bool {
        (self.from..=self.to).contains(&c)
    }
}

/// Predicate deciding which characters belong to words.
///
/// ASCII letters and digits always qualify; `extra_ranges` adds the
/// non-ASCII blocks (Latin-1 through Greek Extended and Glagolitic through
/// Hangul by default). The underscore never qualifies. When
/// `split_ideographs` is set, every CJK ideograph is a word of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphanumericClass {
    pub extra_ranges: Vec<CharRange>,
    pub split_ideographs: bool,
}

impl Default for AlphanumericClass {
    fn default() -> Self {
        Self {
            extra_ranges: vec![
                CharRange::new('\u{00C0}', '\u{1FFF}'),
                CharRange::new('\u{2C00}', '\u{D7FF}'),
            ],
            split_ideographs: true,
        }
    }
}

impl AlphanumericClass {
    /// ASCII letters and digits only
    pub fn ascii() -> Self {
        Self {
            extra_ranges: Vec::new(),
            split_ideographs: false,
        }
    }

    pub fn is_word_char(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || self.extra_ranges.iter().any(|range| range.contains(c))
    }

    /// Segments `text` into its words, left to right.
    ///
    /// ```
    /// use spanlex::similarity::{AlphanumericClass, WordPosition};
    ///
    /// let words = AlphanumericClass::default().word_positions("hi, you");
    /// assert_eq!(words, vec![WordPosition::new(0, 1), WordPosition::new(4, 6)]);
    /// ```
    pub fn word_positions(&self, text: &str) -> Vec<WordPosition> {
        let mut words = Vec::new();
        let mut open: Option<usize> = None;
        let mut length = 0;

        for (index, c) in text.chars().enumerate() {
            length = index + 1;
            if !self.is_word_char(c) {
                if let Some(start) = open.take() {
                    words.push(WordPosition::new(start, index - 1));
                }
                continue;
            }
            if self.split_ideographs && is_ideograph(c) {
                if let Some(start) = open.take() {
                    words.push(WordPosition::new(start, index - 1));
                }
                words.push(WordPosition::new(index, index));
                continue;
            }
            if open.is_none() {
                open = Some(index);
            }
        }

        if let Some(start) = open {
            words.push(WordPosition::new(start, length - 1));
        }
        words
    }
}

/// CJK unified ideographs and extension A.
pub fn is_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c) || ('\u{3400}'..='\u{4DBF}').contains(&c)
}

/// Collects `chars[start..=end]` into a string.
pub fn char_slice(chars: &[char], start: usize, end: usize) -> String {
    chars[start..=end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<WordPosition> {
        AlphanumericClass::default().word_positions(text)
    }

    #[test]
    fn test_plain_sentence() {
        let result = words("Morbi interdum ultricies neque varius condimentum. Donec volutpat turpis interdum metus ultricies vulputate. Duis ultricies rhoncus sapien, sit amet fermentum risus imperdiet vitae. Ut et lectus");
        assert_eq!(result.len(), 26);
        assert_eq!(result[0], WordPosition { start: 0, end: 4, len: 5 });
        assert_eq!(result[25], WordPosition { start: 188, end: 193, len: 6 });
    }

    #[test]
    fn test_surrounding_punctuation() {
        let result = words(";:Morbi..- interdum,   ultricies  ");
        assert_eq!(
            result,
            vec![
                WordPosition { start: 2, end: 6, len: 5 },
                WordPosition { start: 11, end: 18, len: 8 },
                WordPosition { start: 23, end: 31, len: 9 },
            ]
        );
    }

    #[test]
    fn test_no_words() {
        assert!(words("").is_empty());
        assert!(words(" ,.;  !").is_empty());
    }

    #[test]
    fn test_underscore_separates() {
        let result = words("snake_case");
        assert_eq!(result, vec![WordPosition::new(0, 4), WordPosition::new(6, 9)]);
    }

    #[test]
    fn test_accented_letters_stay_in_word() {
        let result = words("está aquí");
        assert_eq!(result, vec![WordPosition::new(0, 3), WordPosition::new(5, 8)]);
    }

    #[test]
    fn test_ideographs_are_single_words() {
        let result = words("我是ok");
        assert_eq!(
            result,
            vec![
                WordPosition::new(0, 0),
                WordPosition::new(1, 1),
                WordPosition::new(2, 3),
            ]
        );

        let joined = AlphanumericClass {
            split_ideographs: false,
            ..AlphanumericClass::default()
        }
        .word_positions("我是ok");
        assert_eq!(joined, vec![WordPosition::new(0, 3)]);
    }

    #[test]
    fn test_ascii_class_drops_accents() {
        let result = AlphanumericClass::ascii().word_positions("está");
        assert_eq!(result, vec![WordPosition::new(0, 2)]);
    }
}
