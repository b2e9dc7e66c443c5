//! Configuration system for spanlex.
//!
//! [`SpanlexConfig`] gathers the logging settings and the extraction
//! settings: the enum acceptance threshold and mode, the enabled builtin
//! recognizers, locale fallbacks, the utterance length guard and the word
//! class used for fuzzy search.
//!
//! Settings are layered: built-in defaults, then the first configuration
//! file found (TOML, YAML or JSON), then `SPANLEX_`-prefixed environment
//! variables. Every loaded configuration is validated before use.

mod builder;
mod loader;
mod models;
#[cfg(test)]
mod tests;
pub mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

use std::path::PathBuf;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "spanlex.toml",
    "spanlex.yaml",
    "spanlex.yml",
    "spanlex.json",
    ".spanlex/config.toml",
    ".spanlex/config.yaml",
    ".spanlex/config.yml",
    ".spanlex/config.json",
];

/// Environment variable prefix for spanlex configuration
pub const ENV_PREFIX: &str = "SPANLEX_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file extension is not one of toml, yaml, yml or json
    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The merged sources do not deserialize into a `SpanlexConfig`
    #[error("Configuration parsing error: {0}")]
    ParseError(String),

    /// A score setting (`threshold`, `min_accuracy`) outside 0.0..=1.0
    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    ScoreOutOfRange { field: &'static str, value: f64 },

    /// The default locale or a locale fallback is unusable
    #[error("Invalid locale setting: {0}")]
    InvalidLocale(String),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
