//! Loads configuration from a file and the environment, then from the builder.
//!
//! Run with `cargo run -p spanlex --example config_example`.

use spanlex::config::{ConfigBuilder, ConfigLoader, LogLevel};
use spanlex::entity_extraction::EnumMatchMode;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Method 1: defaults, any spanlex.toml in the working directory, SPANLEX_* variables
    let mut loader = ConfigLoader::new();
    loader.load_default_files().load_env();
    let config = loader.extract()?;

    println!("Configuration from files and environment:");
    println!("  Threshold: {}", config.entity_extraction.threshold);
    println!("  Default locale: {}", config.entity_extraction.locale.default_locale);
    println!("  Log level: {}", config.logging.level);

    // Method 2: the builder
    let config = ConfigBuilder::new()
        .with_threshold(0.7)
        .with_enum_mode(EnumMatchMode::All)
        .with_default_locale("es")
        .with_locale_fallback("ca", "es")
        .with_log_level(LogLevel::Debug)
        .build()?;

    println!("\nConfiguration created with builder:");
    println!("{}", serde_json::to_string_pretty(&config)?);

    // Method 3: presets
    let dev_config = ConfigBuilder::development().build()?;
    let test_config = ConfigBuilder::testing().build()?;
    let prod_config = ConfigBuilder::production().build()?;

    println!("\nPresets:");
    println!("  development: {:?} / {:?}", dev_config.logging.level, dev_config.logging.format);
    println!("  testing: max utterance {:?}", test_config.entity_extraction.max_utterance_chars);
    println!("  production: {:?} / {:?}", prod_config.logging.level, prod_config.logging.format);

    Ok(())
}
