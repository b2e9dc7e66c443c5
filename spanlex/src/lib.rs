//! # spanlex
//!
//! Fuzzy entity extraction for short free-text utterances. Several
//! independent recognizers propose candidate spans (enumerated phrases found
//! with a typo-tolerant window search, spans positioned around anchor words,
//! regex builtins, and spans supplied by the caller) and a deterministic
//! resolver reconciles them into one consistent set.
//!
//! ## Quick Start
//!
//! ```rust
//! use spanlex::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let rules = RuleTable::builder()
//!         .add_enum_texts("en", "hero", "spiderman", ["Spiderman", "Spider-man"])
//!         .add_after("en", "city", ["in"])
//!         .build()?;
//!
//!     let pipeline = ExtractionPipeline::from_config(&EntityExtractionConfig::default());
//!     let spans = pipeline.extract_text("I saw spederman in Madrid", "en", &rules)?;
//!
//!     assert!(spans.iter().any(|s| s.entity == "hero"));
//!     assert!(spans.iter().any(|s| s.entity == "city" && s.utterance_text == "Madrid"));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`similarity`]: edit distance, word segmentation and best-window search
//! - [`entity_extraction`]: recognizers, rule tables and the extraction pipeline
//! - [`config`] and [`logging`]: layered configuration and `tracing` setup
//!
//! Positions are character indices with inclusive ends throughout.

pub mod config;
pub mod entity_extraction;
pub mod logging;
pub mod similarity;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::{init, init_with_defaults};

    pub use crate::config::{ConfigBuilder, ConfigLoader, LogLevel, SpanlexConfig};

    pub use crate::entity_extraction::{
        BuiltinKind, EntityExtractionConfig, EnumMatchMode, EnumMatcher, ExtractionPipeline,
        ExtractionRequest, Recognizer, RuleTable, RuleTableBuilder, Span, SpanConflictResolver,
        SpanKind, TrimMatcher, templatize,
    };

    pub use crate::similarity::{EditDistance, SimilarSearch, SpanMatch, WordPosition};

    pub use crate::{Result, SpanlexError};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for spanlex operations
#[derive(Debug, thiserror::Error)]
pub enum SpanlexError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),

    /// Malformed or conflicting entity rules
    #[error("Rule error: {0}")]
    Rule(String),

    /// Rule table or span (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Utterance longer than the configured limit
    #[error(
        "Utterance of {len} characters exceeds the limit of {max}. Shorten the input or raise max_utterance_chars"
    )]
    UtteranceTooLong { len: usize, max: usize },

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

impl From<crate::config::ConfigError> for SpanlexError {
    fn from(err: crate::config::ConfigError) -> Self {
        SpanlexError::Configuration(err.to_string())
    }
}

/// Result type for spanlex operations
pub type Result<T> = std::result::Result<T, SpanlexError>;

/// Initialize spanlex with configuration loaded from the default locations
///
/// Reads the first default configuration file found and `SPANLEX_`
/// environment variables on top of the built-in defaults.
///
/// ```no_run
/// use spanlex::prelude::*;
///
/// fn example() -> Result<()> {
///     let pipeline = init_with_defaults()?;
///     let spans = pipeline.extract_text("mail me at ana@example.com", "en", &RuleTable::new())?;
///     println!("{:?}", spans);
///     Ok(())
/// }
/// ```
pub fn init_with_defaults() -> Result<entity_extraction::ExtractionPipeline> {
    let config = config::ConfigLoader::load(None::<&std::path::Path>)?;
    init(config)
}

/// Initialize logging and build an extraction pipeline from `config`
///
/// ```rust
/// use spanlex::prelude::*;
///
/// fn example() -> Result<()> {
///     let config = ConfigBuilder::testing().with_threshold(0.7).build()?;
///     let pipeline = init(config)?;
///     let spans = pipeline.extract_text("100%", "en", &RuleTable::new())?;
///     assert_eq!(spans.len(), 1);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
pub fn init(config: config::SpanlexConfig) -> Result<entity_extraction::ExtractionPipeline> {
    logging::init(&config.logging)?;

    let pipeline = entity_extraction::ExtractionPipeline::from_config(&config.entity_extraction);
    tracing::debug!(
        version = VERSION,
        threshold = config.entity_extraction.threshold,
        "spanlex initialized"
    );
    Ok(pipeline)
}
