use spanlex::config::{ConfigLoader, SpanlexConfig};
use spanlex::entity_extraction::{ExtractionPipeline, RuleTable};
use std::path::{Path, PathBuf};

/// Rule file used when `--rules` is not given
pub const DEFAULT_RULES_FILE: &str = "spanlex-rules.json";

pub struct SpanlexCliContext {
    pub config: SpanlexConfig,
    pub pipeline: ExtractionPipeline,
    pub rules: RuleTable,
    pub rules_path: PathBuf,
}

impl SpanlexCliContext {
    /// Loads configuration and the rule table; a missing rule file is an empty table.
    pub fn new(config_path: Option<&Path>, rules_path: Option<&Path>) -> spanlex::Result<Self> {
        let config = ConfigLoader::load(config_path)?;
        let rules_path = rules_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RULES_FILE));
        Self::with_config(config, rules_path)
    }

    pub fn with_config(config: SpanlexConfig, rules_path: PathBuf) -> spanlex::Result<Self> {
        let rules = if rules_path.exists() {
            RuleTable::load_file(&rules_path)?
        } else {
            tracing::debug!(path = %rules_path.display(), "No rule file yet, starting empty");
            RuleTable::new()
        };
        let pipeline = ExtractionPipeline::from_config(&config.entity_extraction);

        Ok(Self {
            config,
            pipeline,
            rules,
            rules_path,
        })
    }

    /// Replace the rule table and persist it.
    pub fn save_rules(&mut self, rules: RuleTable) -> spanlex::Result<()> {
        rules.save_file(&self.rules_path)?;
        self.rules = rules;
        Ok(())
    }
}
