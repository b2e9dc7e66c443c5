#[cfg(test)]
mod tests {
    use crate::config::{
        ConfigBuilder, ConfigError, ConfigLoader, LogFormat, LogLevel, SpanlexConfig, validation,
    };
    use crate::entity_extraction::{BuiltinKind, EnumMatchMode};
    use crate::similarity::{AlphanumericClass, CharRange};
    use figment::providers::Serialized;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SpanlexConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Default);
        assert!(config.logging.stdout);
        assert_eq!(config.entity_extraction.threshold, 0.8);
        assert_eq!(config.entity_extraction.enum_mode, EnumMatchMode::Best);
        assert_eq!(config.entity_extraction.locale.default_locale, "en");
        assert_eq!(config.entity_extraction.builtins.len(), BuiltinKind::ALL.len());
        assert!(validation::validate_config(&config).is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_threshold(0.6)
            .with_enum_mode(EnumMatchMode::All)
            .with_default_locale("es")
            .with_locale_fallback("ca", "es")
            .with_builtins([BuiltinKind::Email, BuiltinKind::Number])
            .with_collator(true)
            .with_log_level(LogLevel::Debug)
            .build()
            .unwrap();

        let extraction = &config.entity_extraction;
        assert_eq!(extraction.threshold, 0.6);
        assert_eq!(extraction.enum_mode, EnumMatchMode::All);
        assert_eq!(extraction.locale.default_locale, "es");
        assert_eq!(extraction.locale.fallbacks.get("ca").map(String::as_str), Some("es"));
        assert_eq!(extraction.builtins, vec![BuiltinKind::Email, BuiltinKind::Number]);
        assert!(extraction.similarity.use_collator);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_log_file_disables_stdout() {
        let config = ConfigBuilder::new()
            .with_log_file("/tmp/spanlex.log")
            .build()
            .unwrap();
        assert!(!config.logging.stdout);
        assert!(config.logging.file.is_some());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(matches!(
            ConfigBuilder::new().with_threshold(1.5).build(),
            Err(ConfigError::ScoreOutOfRange { field: "threshold", value }) if value == 1.5
        ));
        assert!(matches!(
            ConfigBuilder::new().with_min_accuracy(-0.1).build(),
            Err(ConfigError::ScoreOutOfRange { field: "min_accuracy", .. })
        ));
        assert!(matches!(
            ConfigBuilder::new().with_default_locale("  ").build(),
            Err(ConfigError::InvalidLocale(_))
        ));
        assert!(ConfigBuilder::new().with_max_utterance_chars(Some(0)).build().is_err());
        assert!(ConfigBuilder::new().with_builtins([]).build().is_err());
        assert!(matches!(
            ConfigBuilder::new().with_locale_fallback("ca", "").build(),
            Err(ConfigError::InvalidLocale(_))
        ));

        let reversed = AlphanumericClass {
            extra_ranges: vec![CharRange::new('\u{1FFF}', '\u{00C0}')],
            split_ideographs: true,
        };
        assert!(ConfigBuilder::new().with_alphanumeric(reversed).build().is_err());
    }

    #[test]
    fn test_empty_builtins_allowed_when_disabled() {
        let mut config = SpanlexConfig::default();
        config.entity_extraction.builtins.clear();
        config.entity_extraction.enable_builtins = false;
        assert!(validation::validate_config(&config).is_ok());
    }

    #[test]
    fn test_predefined_configs() {
        let dev = ConfigBuilder::development().build().unwrap();
        let test = ConfigBuilder::testing().build().unwrap();
        let prod = ConfigBuilder::production().build().unwrap();

        assert_eq!(dev.logging.level, LogLevel::Debug);
        assert_eq!(dev.logging.format, LogFormat::Pretty);
        assert_eq!(test.entity_extraction.max_utterance_chars, None);
        assert_eq!(prod.logging.level, LogLevel::Info);
        assert_eq!(prod.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_serialization() {
        let config = ConfigBuilder::new()
            .with_threshold(0.75)
            .with_builtins([BuiltinKind::Ipv4])
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SpanlexConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_loader_merges_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[logging]\nlevel = \"debug\"\n\n[entity_extraction]\nthreshold = 0.65\nenum_mode = \"all\"\n\n[entity_extraction.locale]\ndefault_locale = \"fr\""
        )
        .unwrap();

        let mut loader = ConfigLoader::new();
        loader.load_file(file.path()).unwrap();
        let config = loader.extract().unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.entity_extraction.threshold, 0.65);
        assert_eq!(config.entity_extraction.enum_mode, EnumMatchMode::All);
        assert_eq!(config.entity_extraction.locale.default_locale, "fr");
        // untouched keys keep their defaults
        assert!(config.entity_extraction.enable_trim);
    }

    #[test]
    fn test_loader_merges_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"entity_extraction": {{"builtins": ["email", "url"], "min_accuracy": 0.5}}}}"#
        )
        .unwrap();

        let mut loader = ConfigLoader::new();
        loader.load_file(file.path()).unwrap();
        let config = loader.extract().unwrap();
        assert_eq!(
            config.entity_extraction.builtins,
            vec![BuiltinKind::Email, BuiltinKind::Url]
        );
        assert_eq!(config.entity_extraction.min_accuracy, 0.5);
    }

    #[test]
    fn test_loader_rejects_missing_and_unsupported_files() {
        let mut loader = ConfigLoader::new();
        assert!(matches!(
            loader.load_file("/nonexistent/spanlex.toml"),
            Err(ConfigError::FileNotFound(_))
        ));

        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(
            loader.load_file(file.path()),
            Err(ConfigError::UnsupportedFormat(path)) if path == file.path()
        ));
    }

    #[test]
    fn test_loader_validates_on_extract() {
        let mut config = SpanlexConfig::default();
        config.entity_extraction.threshold = 2.0;

        let mut loader = ConfigLoader::new();
        loader.merge(Serialized::defaults(config));
        let err = loader.extract().unwrap_err();
        assert!(matches!(err, ConfigError::ScoreOutOfRange { field: "threshold", .. }));
        assert_eq!(err.to_string(), "threshold must be between 0.0 and 1.0, got 2");
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(LogLevel::Error.to_string(), "error");
    }
}
