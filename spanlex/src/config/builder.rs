//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use crate::entity_extraction::{BuiltinKind, EntityExtractionConfig, EnumMatchMode};
use crate::similarity::AlphanumericClass;
use std::path::Path;

/// Builder for creating [`SpanlexConfig`] instances.
///
/// ```
/// use spanlex::config::{ConfigBuilder, LogLevel};
///
/// let config = ConfigBuilder::new()
///     .with_threshold(0.7)
///     .with_default_locale("es")
///     .with_log_level(LogLevel::Debug)
///     .build()
///     .unwrap();
/// assert_eq!(config.entity_extraction.threshold, 0.7);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: SpanlexConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: SpanlexConfig::default(),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: SpanlexConfig) -> Self {
        Self { config }
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file instead of stdout.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self.config.logging.stdout = false;
        self
    }

    /// Use default logging configuration (console output at Info level)
    pub fn with_default_logging(mut self) -> Self {
        self.config.logging = LoggingConfig::default();
        self
    }

    /// Minimum accuracy for enumerated entity matches.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.entity_extraction.threshold = threshold;
        self
    }

    pub fn with_enum_mode(mut self, mode: EnumMatchMode) -> Self {
        self.config.entity_extraction.enum_mode = mode;
        self
    }

    /// Spans below this accuracy never reach conflict resolution.
    pub fn with_min_accuracy(mut self, min_accuracy: f64) -> Self {
        self.config.entity_extraction.min_accuracy = min_accuracy;
        self
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.config.entity_extraction.locale.default_locale = locale.into();
        self
    }

    /// Route `locale` to `fallback` when it has no rules of its own.
    pub fn with_locale_fallback(
        mut self,
        locale: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        self.config
            .entity_extraction
            .locale
            .fallbacks
            .insert(locale.into(), fallback.into());
        self
    }

    /// Recognize only the given builtin formats.
    pub fn with_builtins(mut self, kinds: impl IntoIterator<Item = BuiltinKind>) -> Self {
        self.config.entity_extraction.builtins = kinds.into_iter().collect();
        self.config.entity_extraction.enable_builtins = true;
        self
    }

    pub fn without_builtins(mut self) -> Self {
        self.config.entity_extraction.enable_builtins = false;
        self
    }

    pub fn without_enum(mut self) -> Self {
        self.config.entity_extraction.enable_enum = false;
        self
    }

    pub fn without_trim(mut self) -> Self {
        self.config.entity_extraction.enable_trim = false;
        self
    }

    /// Longest accepted utterance in characters; `None` removes the limit.
    pub fn with_max_utterance_chars(mut self, max: Option<usize>) -> Self {
        self.config.entity_extraction.max_utterance_chars = max;
        self
    }

    /// Fold accents and case before measuring distance.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.config.entity_extraction.similarity.normalize = normalize;
        self
    }

    /// Compare characters by base letter.
    pub fn with_collator(mut self, use_collator: bool) -> Self {
        self.config.entity_extraction.similarity.use_collator = use_collator;
        self
    }

    pub fn with_alphanumeric(mut self, alphanumeric: AlphanumericClass) -> Self {
        self.config.entity_extraction.similarity.alphanumeric = alphanumeric;
        self
    }

    /// Replace the entity extraction settings wholesale.
    pub fn with_entity_extraction_config(mut self, config: EntityExtractionConfig) -> Self {
        self.config.entity_extraction = config;
        self
    }

    /// Development settings: debug logging, pretty output.
    pub fn development() -> Self {
        Self::new()
            .with_log_level(LogLevel::Debug)
            .with_log_format(LogFormat::Pretty)
    }

    /// Testing settings: quiet logging and no utterance limit.
    pub fn testing() -> Self {
        Self::new()
            .with_log_level(LogLevel::Warn)
            .with_log_format(LogFormat::Compact)
            .with_max_utterance_chars(None)
    }

    /// Production settings: JSON logs at Info level.
    pub fn production() -> Self {
        Self::new()
            .with_default_logging()
            .with_log_format(LogFormat::Json)
    }

    /// Create a fully default configuration suitable for most uses
    pub fn defaults() -> Self {
        Self::new()
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<SpanlexConfig> {
        validation::validate_config(&self.config)?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
