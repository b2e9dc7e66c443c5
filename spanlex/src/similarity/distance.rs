//! Levenshtein edit distance over Unicode scalar values.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Canonically decomposes `text`, drops combining diacritical marks
/// (U+0300..=U+036F) and lower-cases the result.
///
/// ```
/// use spanlex::similarity::normalize_text;
///
/// assert_eq!(normalize_text("Mikhaïlovitch"), "mikhailovitch");
/// assert_eq!(normalize_text("ÁRBOL"), "arbol");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Reduces a character to its lower-cased base letter.
fn base_letter(c: char) -> char {
    let base = std::iter::once(c)
        .nfd()
        .find(|d| !is_combining_mark(*d))
        .unwrap_or(c);
    base.to_lowercase().next().unwrap_or(base)
}

/// Configurable Levenshtein distance.
///
/// With both flags off, characters are compared exactly. `normalize` folds
/// accents and case on the whole strings first; `use_collator` compares each
/// character by its base letter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditDistance {
    pub normalize: bool,
    pub use_collator: bool,
}

impl EditDistance {
    /// Exact character comparison
    pub fn new() -> Self {
        Self::default()
    }

    /// Accent and case insensitive comparison through normalization
    pub fn normalized() -> Self {
        Self {
            normalize: true,
            use_collator: false,
        }
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_collator(mut self, use_collator: bool) -> Self {
        self.use_collator = use_collator;
        self
    }

    /// Minimum number of single-character insertions, deletions or
    /// substitutions turning `a` into `b`.
    pub fn distance(&self, a: &str, b: &str) -> usize {
        if a == b {
            return 0;
        }
        levenshtein(&self.prepare(a), &self.prepare(b))
    }

    /// Applies the configured folding and splits into characters.
    pub fn prepare(&self, text: &str) -> Vec<char> {
        let text: Cow<'_, str> = if self.normalize {
            Cow::Owned(normalize_text(text))
        } else {
            Cow::Borrowed(text)
        };
        if self.use_collator {
            text.chars().map(base_letter).collect()
        } else {
            text.chars().collect()
        }
    }
}

/// Levenshtein distance between two character sequences.
///
/// Common prefix and suffix are stripped before the dynamic programming pass,
/// which keeps a single row sized by the shorter remainder.
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut short_end = short.len();
    let mut long_end = long.len();
    while short_end > 0 && short[short_end - 1] == long[long_end - 1] {
        short_end -= 1;
        long_end -= 1;
    }
    let mut start = 0;
    while start < short_end && short[start] == long[start] {
        start += 1;
    }

    let short = &short[start..short_end];
    let long = &long[start..long_end];
    if short.is_empty() {
        return long.len();
    }

    // row[i] holds the distance between short[..=i] and the prefix of long seen so far
    let mut row: Vec<usize> = (1..=short.len()).collect();
    let mut result = 0;
    for (j, &lc) in long.iter().enumerate() {
        let mut diagonal = j;
        let mut left = j + 1;
        for (i, &sc) in short.iter().enumerate() {
            let substitution = diagonal + usize::from(sc != lc);
            let value = substitution.min(row[i] + 1).min(left + 1);
            diagonal = row[i];
            row[i] = value;
            left = value;
        }
        result = left;
    }
    result
}
