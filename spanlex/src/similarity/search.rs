//! Best-window search of a phrase inside a longer text.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::distance::{EditDistance, levenshtein};
use super::words::{AlphanumericClass, WordPosition};
use super::SimilarityConfig;

/// Similarity of a window against a target of `target_len` characters.
pub fn accuracy(target_len: usize, levenshtein: usize) -> f64 {
    (target_len as f64 - levenshtein as f64) / target_len as f64
}

/// A window of the source text together with its distance to the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanMatch {
    pub start: usize,
    /// Inclusive
    pub end: usize,
    pub len: usize,
    pub levenshtein: usize,
    pub accuracy: f64,
}

impl SpanMatch {
    fn new(start: usize, end: usize, levenshtein: usize, target_len: usize) -> Self {
        Self {
            start,
            end,
            len: end - start + 1,
            levenshtein,
            accuracy: accuracy(target_len, levenshtein),
        }
    }

    pub fn overlaps(&self, other: &SpanMatch) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Finds the word-aligned window of a source that is closest to a target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarSearch {
    distance: EditDistance,
    alphanumeric: AlphanumericClass,
}

impl SimilarSearch {
    /// Exact comparison with the default word class
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self {
            distance: EditDistance {
                normalize: config.normalize,
                use_collator: config.use_collator,
            },
            alphanumeric: config.alphanumeric.clone(),
        }
    }

    pub fn with_distance(mut self, distance: EditDistance) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_alphanumeric(mut self, alphanumeric: AlphanumericClass) -> Self {
        self.alphanumeric = alphanumeric;
        self
    }

    pub fn distance(&self) -> &EditDistance {
        &self.distance
    }

    pub fn word_positions(&self, text: &str) -> Vec<WordPosition> {
        self.alphanumeric.word_positions(text)
    }

    /// Window of `source` with the smallest edit distance to `target`.
    ///
    /// Windows start at a word start and end at a word end. When the source
    /// is no longer than the target the whole source is the only window.
    /// Ties keep the window found first, scanning start words left to right
    /// and end words left to right. Pass precomputed `words` to avoid
    /// segmenting the same source repeatedly.
    pub fn best_span(
        &self,
        source: &str,
        target: &str,
        words: Option<&[WordPosition]>,
    ) -> Option<SpanMatch> {
        let chars: Vec<char> = source.chars().collect();
        match words {
            Some(words) => self.best_span_in(&chars, target, words),
            None => {
                let words = self.word_positions(source);
                self.best_span_in(&chars, target, &words)
            }
        }
    }

    /// [`best_span`](Self::best_span) over an already split source.
    pub fn best_span_in(
        &self,
        source: &[char],
        target: &str,
        words: &[WordPosition],
    ) -> Option<SpanMatch> {
        let prepared_target = self.distance.prepare(target);
        let target_len = target.chars().count();
        if source.is_empty() || target_len == 0 {
            return None;
        }

        if source.len() <= target_len {
            let levenshtein = self.window_distance(source, &prepared_target);
            return Some(SpanMatch::new(0, source.len() - 1, levenshtein, target_len));
        }

        let mut best: Option<SpanMatch> = None;
        for (index, first) in words.iter().enumerate() {
            for last in &words[index..] {
                let levenshtein =
                    self.window_distance(&source[first.start..=last.end], &prepared_target);
                if best.is_none_or(|current| levenshtein < current.levenshtein) {
                    best = Some(SpanMatch::new(first.start, last.end, levenshtein, target_len));
                    if levenshtein == 0 {
                        return best;
                    }
                }
            }
        }
        best
    }

    /// Every window of `source` that matches `target` well enough.
    ///
    /// Without a threshold only exact windows (distance 0) are returned, in
    /// order of appearance. With a threshold, windows whose accuracy reaches
    /// it are kept best first while they do not overlap an already kept
    /// window, and the survivors are returned ordered by start.
    pub fn best_span_list(
        &self,
        source: &str,
        target: &str,
        threshold: Option<f64>,
        words: Option<&[WordPosition]>,
    ) -> Vec<SpanMatch> {
        let chars: Vec<char> = source.chars().collect();
        match words {
            Some(words) => self.best_span_list_in(&chars, target, threshold, words),
            None => {
                let words = self.word_positions(source);
                self.best_span_list_in(&chars, target, threshold, &words)
            }
        }
    }

    /// [`best_span_list`](Self::best_span_list) over an already split source.
    pub fn best_span_list_in(
        &self,
        source: &[char],
        target: &str,
        threshold: Option<f64>,
        words: &[WordPosition],
    ) -> Vec<SpanMatch> {
        let prepared_target = self.distance.prepare(target);
        let target_len = target.chars().count();
        if source.is_empty() || target_len == 0 {
            return Vec::new();
        }

        let accepts = |candidate: &SpanMatch| match threshold {
            Some(threshold) => candidate.accuracy >= threshold,
            None => candidate.levenshtein == 0,
        };

        if source.len() <= target_len {
            let levenshtein = self.window_distance(source, &prepared_target);
            let candidate = SpanMatch::new(0, source.len() - 1, levenshtein, target_len);
            return if accepts(&candidate) { vec![candidate] } else { Vec::new() };
        }

        let mut candidates = Vec::new();
        for (index, first) in words.iter().enumerate() {
            for last in &words[index..] {
                let levenshtein =
                    self.window_distance(&source[first.start..=last.end], &prepared_target);
                let candidate = SpanMatch::new(first.start, last.end, levenshtein, target_len);
                if accepts(&candidate) {
                    candidates.push(candidate);
                }
            }
        }

        if threshold.is_none() {
            return candidates;
        }

        // Stable: equal distances keep scan order
        candidates.sort_by_key(|candidate| candidate.levenshtein);
        let mut kept: Vec<SpanMatch> = Vec::new();
        for candidate in candidates {
            if kept.iter().all(|other| !other.overlaps(&candidate)) {
                kept.push(candidate);
            }
        }
        kept.sort_by_key(|candidate| candidate.start);
        trace!(target_len, kept = kept.len(), "similar windows selected");
        kept
    }

    fn window_distance(&self, window: &[char], prepared_target: &[char]) -> usize {
        if !self.distance.normalize && !self.distance.use_collator {
            return levenshtein(window, prepared_target);
        }
        let window: String = window.iter().collect();
        levenshtein(&self.distance.prepare(&window), prepared_target)
    }
}
