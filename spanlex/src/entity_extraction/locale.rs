//! Locale resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Locale fallback settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale used when nothing better is available
    pub default_locale: String,

    /// Explicit fallbacks, e.g. `"ca" -> "es"`
    pub fallbacks: BTreeMap<String, String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            fallbacks: BTreeMap::new(),
        }
    }
}

/// Language part of a locale tag, lower-cased: `"pt-BR"` gives `"pt"`.
pub fn language_of(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Picks the locale an extraction runs under.
///
/// The chain is: the requested locale, its explicit fallback, its language
/// family, the family's explicit fallback, and finally the default locale.
/// The first entry the caller reports as available wins.
#[derive(Debug, Clone, Default)]
pub struct LocaleResolver {
    config: LocaleConfig,
}

impl LocaleResolver {
    pub fn new(config: LocaleConfig) -> Self {
        Self { config }
    }

    pub fn default_locale(&self) -> &str {
        &self.config.default_locale
    }

    /// Candidate locales for `requested`, most specific first, without repeats.
    pub fn chain(&self, requested: Option<&str>) -> Vec<String> {
        let mut chain: Vec<String> = Vec::new();
        let mut push = |locale: &str| {
            let locale = locale.trim();
            if !locale.is_empty() && !chain.iter().any(|l| l == locale) {
                chain.push(locale.to_string());
            }
        };

        if let Some(requested) = requested.map(str::trim).filter(|r| !r.is_empty()) {
            push(requested);
            if let Some(fallback) = self.config.fallbacks.get(requested) {
                push(fallback);
            }
            let language = language_of(requested);
            push(&language);
            if let Some(fallback) = self.config.fallbacks.get(&language) {
                push(fallback);
            }
        }
        push(&self.config.default_locale);
        chain
    }

    /// First locale of the chain satisfying `is_available`, or the default.
    pub fn resolve<F>(&self, requested: Option<&str>, is_available: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let chain = self.chain(requested);
        let resolved = chain
            .iter()
            .find(|locale| is_available(locale.as_str()))
            .cloned()
            .unwrap_or_else(|| self.config.default_locale.clone());
        trace!(?requested, %resolved, "Resolved locale");
        resolved
    }
}
