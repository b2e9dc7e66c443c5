//! Command argument structures
//!
//! This module contains all CLI argument structs organized by command category.

use clap::Args;

// Extraction arguments
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Utterance to extract entities from
    pub text: String,

    /// Locale of the utterance (falls back to the configured default)
    #[arg(long, short)]
    pub locale: Option<String>,

    /// Restrict rule-based entities to these names (repeatable, e.g. --only hero_1)
    #[arg(long = "only")]
    pub only: Vec<String>,

    /// Override the enum acceptance threshold (0.0 to 1.0)
    #[arg(long, short)]
    pub threshold: Option<f64>,

    /// Report every close occurrence of enumerated entities, not just the best
    #[arg(long)]
    pub all: bool,

    /// Print the utterance with entities replaced by %entity% placeholders
    #[arg(long)]
    pub template: bool,
}

// Similarity arguments
#[derive(Args, Debug, Clone)]
pub struct DistanceArgs {
    /// First text
    pub a: String,

    /// Second text
    pub b: String,

    /// Fold accents and case before comparing
    #[arg(long, short)]
    pub normalize: bool,

    /// Compare characters by base letter
    #[arg(long)]
    pub collator: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Text to search in
    pub source: String,

    /// Phrase to look for
    pub target: String,

    /// List every window reaching this accuracy instead of the single best one
    #[arg(long, short)]
    pub threshold: Option<f64>,

    /// List exact occurrences (or thresholded windows with --threshold)
    #[arg(long)]
    pub list: bool,

    /// Compare raw characters, without accent and case folding
    #[arg(long)]
    pub raw: bool,
}

// Rule table arguments
#[derive(Args, Debug, Clone)]
pub struct ShowRulesArgs {
    /// Only show this locale
    #[arg(long, short)]
    pub locale: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EnumTextArgs {
    /// Locale of the texts
    #[arg(long, short, default_value = "en")]
    pub locale: String,

    /// Entity name
    pub entity: String,

    /// Option (canonical value) the texts belong to
    pub option: String,

    /// Surface texts
    #[arg(required = true)]
    pub texts: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AddTrimArgs {
    /// Locale of the anchors
    #[arg(long, short, default_value = "en")]
    pub locale: String,

    /// Entity name
    pub entity: String,

    /// before, before-first, before-last, after, after-first, after-last,
    /// between or between-last
    pub position: String,

    /// Anchor words of single-anchor positions
    #[arg(long = "word", short = 'w')]
    pub words: Vec<String>,

    /// Left anchor words of between positions
    #[arg(long)]
    pub left: Vec<String>,

    /// Right anchor words of between positions
    #[arg(long)]
    pub right: Vec<String>,

    /// Match anchors inside words as well
    #[arg(long)]
    pub no_spaces: bool,

    /// Match anchors ignoring case
    #[arg(long, short = 'i')]
    pub case_insensitive: bool,

    /// Extracted texts never to report
    #[arg(long)]
    pub skip: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RemoveEntityArgs {
    /// Entity name
    pub entity: String,

    /// Only remove it from this locale
    #[arg(long, short)]
    pub locale: Option<String>,
}
