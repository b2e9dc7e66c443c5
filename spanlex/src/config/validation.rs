//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;
use crate::entity_extraction::EntityExtractionConfig;
use crate::similarity::SimilarityConfig;

/// Validate the entire configuration.
pub fn validate_config(config: &SpanlexConfig) -> Result<(), ConfigError> {
    validate_entity_extraction_config(&config.entity_extraction)?;

    Ok(())
}

/// Validate entity extraction configuration.
pub fn validate_entity_extraction_config(
    config: &EntityExtractionConfig,
) -> Result<(), ConfigError> {
    validate_fraction("threshold", config.threshold)?;
    validate_fraction("min_accuracy", config.min_accuracy)?;

    if config.locale.default_locale.trim().is_empty() {
        return Err(ConfigError::InvalidLocale(
            "default locale cannot be empty".to_string(),
        ));
    }

    if let Some((from, to)) = config
        .locale
        .fallbacks
        .iter()
        .find(|(from, to)| from.trim().is_empty() || to.trim().is_empty())
    {
        return Err(ConfigError::InvalidLocale(format!(
            "fallback '{}' -> '{}' has an empty side",
            from, to
        )));
    }

    if config.max_utterance_chars == Some(0) {
        return Err(ConfigError::ValidationError(
            "max_utterance_chars must be greater than zero".to_string(),
        ));
    }

    if config.enable_builtins && config.builtins.is_empty() {
        return Err(ConfigError::ValidationError(
            "Builtins are enabled but none are selected".to_string(),
        ));
    }

    validate_similarity_config(&config.similarity)
}

fn validate_similarity_config(config: &SimilarityConfig) -> Result<(), ConfigError> {
    if let Some(range) = config
        .alphanumeric
        .extra_ranges
        .iter()
        .find(|range| range.from > range.to)
    {
        return Err(ConfigError::ValidationError(format!(
            "Character range U+{:04X}..U+{:04X} is reversed",
            range.from as u32, range.to as u32
        )));
    }

    Ok(())
}

fn validate_fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ScoreOutOfRange { field, value });
    }
    Ok(())
}
