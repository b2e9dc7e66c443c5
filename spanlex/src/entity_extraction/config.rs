//! Configuration for entity extraction functionality.

use serde::{Deserialize, Serialize};

use super::{BuiltinKind, EnumMatchMode, LocaleConfig};
use crate::similarity::SimilarityConfig;

/// Configuration for entity extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntityExtractionConfig {
    /// Minimum accuracy for an enumerated entity match
    pub threshold: f64,
    /// Whether enumerated entities report their best match or every match
    pub enum_mode: EnumMatchMode,
    /// Distance and word segmentation settings
    pub similarity: SimilarityConfig,
    /// Builtin formats to recognize
    pub builtins: Vec<BuiltinKind>,
    /// Whether builtin formats are recognized at all
    pub enable_builtins: bool,
    /// Whether enumerated entities are recognized
    pub enable_enum: bool,
    /// Whether trim entities are recognized
    pub enable_trim: bool,
    /// Spans below this accuracy are dropped before conflict resolution
    pub min_accuracy: f64,
    /// Longest utterance accepted, in characters (None for unlimited)
    pub max_utterance_chars: Option<usize>,
    /// Locale fallback chain
    pub locale: LocaleConfig,
}

impl Default for EntityExtractionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            enum_mode: EnumMatchMode::Best,
            similarity: SimilarityConfig::default(),
            builtins: BuiltinKind::ALL.to_vec(),
            enable_builtins: true,
            enable_enum: true,
            enable_trim: true,
            min_accuracy: 0.0,
            max_utterance_chars: Some(1000),
            locale: LocaleConfig::default(),
        }
    }
}
