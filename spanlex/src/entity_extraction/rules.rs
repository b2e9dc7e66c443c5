//! Named-entity rule tables.
//!
//! A [`RuleTable`] maps a locale to its entity definitions. Each entity is
//! either an enumerated entity (canonical options with surface texts) or a
//! trim entity (anchor-word conditions). The table serializes to a plain
//! JSON mapping so it can be stored next to the application's data.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TrimKind;
use crate::{Result, SpanlexError};

/// One canonical value of an enumerated entity and its surface texts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnumOption {
    pub name: String,
    pub texts: Vec<String>,
}

/// An enumerated entity; option order decides ties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnumRule {
    pub options: Vec<EnumOption>,
}

impl EnumRule {
    pub fn option(&self, name: &str) -> Option<&EnumOption> {
        self.options.iter().find(|option| option.name == name)
    }
}

/// Anchor positions of the single-anchor trim conditions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AnchorPosition {
    Before,
    BeforeFirst,
    BeforeLast,
    After,
    AfterFirst,
    AfterLast,
}

impl From<AnchorPosition> for TrimKind {
    fn from(position: AnchorPosition) -> Self {
        match position {
            AnchorPosition::Before => TrimKind::Before,
            AnchorPosition::BeforeFirst => TrimKind::BeforeFirst,
            AnchorPosition::BeforeLast => TrimKind::BeforeLast,
            AnchorPosition::After => TrimKind::After,
            AnchorPosition::AfterFirst => TrimKind::AfterFirst,
            AnchorPosition::AfterLast => TrimKind::AfterLast,
        }
    }
}

impl std::str::FromStr for AnchorPosition {
    type Err = SpanlexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "before" => Ok(AnchorPosition::Before),
            "beforefirst" => Ok(AnchorPosition::BeforeFirst),
            "beforelast" => Ok(AnchorPosition::BeforeLast),
            "after" => Ok(AnchorPosition::After),
            "afterfirst" => Ok(AnchorPosition::AfterFirst),
            "afterlast" => Ok(AnchorPosition::AfterLast),
            _ => Err(SpanlexError::Rule(format!("Unknown trim position: {}", s))),
        }
    }
}

/// How left anchors are paired with right anchors in a between condition.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BetweenStrategy {
    /// Every left occurrence paired with its nearest right occurrence
    #[default]
    Simplest,
    /// Only the last left occurrence that has a right occurrence after it
    Last,
}

/// Matching switches of a trim condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrimOptions {
    /// Match anchors inside words as well
    pub no_spaces: bool,
    /// Compare anchors ignoring case
    pub case_insensitive: bool,
    /// Extracted texts that are never reported
    pub skip: Vec<String>,
}

/// One anchor condition of a trim entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "condition", rename_all = "lowercase")]
pub enum TrimCondition {
    Position {
        position: AnchorPosition,
        words: Vec<String>,
        #[serde(default)]
        options: TrimOptions,
    },
    Between {
        left: Vec<String>,
        right: Vec<String>,
        #[serde(default)]
        strategy: BetweenStrategy,
        #[serde(default)]
        options: TrimOptions,
    },
}

/// A trim entity; every condition is evaluated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrimRule {
    pub conditions: Vec<TrimCondition>,
}

/// Definition of one named entity.
///
/// Only enumerated and trim rules exist; a table holding any other `type`
/// (e.g. `regex`) fails to load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityRule {
    Enum(EnumRule),
    Trim(TrimRule),
}

impl EntityRule {
    pub fn type_name(&self) -> &'static str {
        match self {
            EntityRule::Enum(_) => "enum",
            EntityRule::Trim(_) => "trim",
        }
    }
}

/// Locale to entity name to entity definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RuleTable {
    locales: BTreeMap<String, BTreeMap<String, EntityRule>>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::new()
    }

    /// Start editing a copy of this table
    pub fn to_builder(&self) -> RuleTableBuilder {
        RuleTableBuilder::from_table(self.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.locales.values().all(BTreeMap::is_empty)
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    /// Entities defined for `locale`, in name order.
    pub fn entities(&self, locale: &str) -> Option<&BTreeMap<String, EntityRule>> {
        self.locales.get(locale)
    }

    pub fn entity(&self, locale: &str, name: &str) -> Option<&EntityRule> {
        self.locales.get(locale)?.get(name)
    }

    /// Names of every entity across all locales, deduplicated.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .locales
            .values()
            .flat_map(|entities| entities.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SpanlexError::Serialization(format!("Invalid rule table: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SpanlexError::Serialization(e.to_string()))
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let table = Self::from_json(&contents)?;
        debug!(path = %path.display(), locales = table.locales.len(), "Loaded rule table");
        Ok(table)
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "Saved rule table");
        Ok(())
    }
}

/// Editor for [`RuleTable`]s.
///
/// Edits are chained; the first failing edit is remembered and reported by
/// [`build`](Self::build), later edits are ignored.
///
/// ```
/// use spanlex::entity_extraction::RuleTable;
///
/// let rules = RuleTable::builder()
///     .add_enum_texts("en", "hero", "spiderman", ["Spiderman", "Spider-man"])
///     .add_between("en", "route", ["from"], ["to"])
///     .build()
///     .unwrap();
/// assert!(rules.entity("en", "hero").is_some());
/// ```
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    table: RuleTable,
    error: Option<SpanlexError>,
}

impl RuleTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: RuleTable) -> Self {
        Self { table, error: None }
    }

    /// Adds surface texts to an option of an enumerated entity, creating the
    /// entity and option as needed. Texts already present are not repeated.
    pub fn add_enum_texts<I, S>(mut self, locale: &str, entity: &str, option: &str, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.error.is_some() {
            return self;
        }
        let rule = self
            .entities_mut(locale)
            .entry(entity.to_string())
            .or_insert_with(|| EntityRule::Enum(EnumRule::default()));
        let EntityRule::Enum(rule) = rule else {
            return self.fail(entity, "enum", "trim");
        };

        let index = match rule.options.iter().position(|o| o.name == option) {
            Some(index) => index,
            None => {
                rule.options.push(EnumOption {
                    name: option.to_string(),
                    texts: Vec::new(),
                });
                rule.options.len() - 1
            }
        };
        let target = &mut rule.options[index];
        for text in texts {
            let text = text.into();
            if !target.texts.contains(&text) {
                target.texts.push(text);
            }
        }
        self
    }

    /// Removes surface texts from an option; an option left without texts is
    /// removed, and so is an entity left without options.
    pub fn remove_enum_texts<I, S>(mut self, locale: &str, entity: &str, option: &str, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.error.is_some() {
            return self;
        }
        let Some(entities) = self.table.locales.get_mut(locale) else {
            return self;
        };
        let Some(rule) = entities.get_mut(entity) else {
            return self;
        };
        let EntityRule::Enum(rule) = rule else {
            return self.fail(entity, "enum", "trim");
        };

        let texts: Vec<S> = texts.into_iter().collect();
        if let Some(target) = rule.options.iter_mut().find(|o| o.name == option) {
            target
                .texts
                .retain(|existing| !texts.iter().any(|t| t.as_ref() == existing.as_str()));
        }
        rule.options.retain(|o| !o.texts.is_empty());
        if rule.options.is_empty() {
            entities.remove(entity);
        }
        self
    }

    /// Adds a single-anchor trim condition.
    pub fn add_position<I, S>(
        mut self,
        locale: &str,
        entity: &str,
        position: AnchorPosition,
        words: I,
        options: TrimOptions,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let condition = TrimCondition::Position {
            position,
            words: words.into_iter().map(Into::into).collect(),
            options,
        };
        self.push_condition(locale, entity, condition);
        self
    }

    pub fn add_before<I, S>(self, locale: &str, entity: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_position(locale, entity, AnchorPosition::Before, words, TrimOptions::default())
    }

    pub fn add_before_first<I, S>(self, locale: &str, entity: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_position(locale, entity, AnchorPosition::BeforeFirst, words, TrimOptions::default())
    }

    pub fn add_before_last<I, S>(self, locale: &str, entity: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_position(locale, entity, AnchorPosition::BeforeLast, words, TrimOptions::default())
    }

    pub fn add_after<I, S>(self, locale: &str, entity: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_position(locale, entity, AnchorPosition::After, words, TrimOptions::default())
    }

    pub fn add_after_first<I, S>(self, locale: &str, entity: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_position(locale, entity, AnchorPosition::AfterFirst, words, TrimOptions::default())
    }

    pub fn add_after_last<I, S>(self, locale: &str, entity: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_position(locale, entity, AnchorPosition::AfterLast, words, TrimOptions::default())
    }

    /// Adds a between condition using the simplest pairing strategy.
    pub fn add_between<L, R, S, T>(self, locale: &str, entity: &str, left: L, right: R) -> Self
    where
        L: IntoIterator<Item = S>,
        R: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.add_between_with(locale, entity, left, right, BetweenStrategy::Simplest, TrimOptions::default())
    }

    /// Adds a between condition that only reports the last pairing.
    pub fn add_between_last<L, R, S, T>(self, locale: &str, entity: &str, left: L, right: R) -> Self
    where
        L: IntoIterator<Item = S>,
        R: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.add_between_with(locale, entity, left, right, BetweenStrategy::Last, TrimOptions::default())
    }

    pub fn add_between_with<L, R, S, T>(
        mut self,
        locale: &str,
        entity: &str,
        left: L,
        right: R,
        strategy: BetweenStrategy,
        options: TrimOptions,
    ) -> Self
    where
        L: IntoIterator<Item = S>,
        R: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let condition = TrimCondition::Between {
            left: left.into_iter().map(Into::into).collect(),
            right: right.into_iter().map(Into::into).collect(),
            strategy,
            options,
        };
        self.push_condition(locale, entity, condition);
        self
    }

    /// Removes an entity from every locale.
    pub fn remove_entity(mut self, entity: &str) -> Self {
        for entities in self.table.locales.values_mut() {
            entities.remove(entity);
        }
        self
    }

    /// Removes an entity from one locale.
    pub fn remove_entity_in(mut self, locale: &str, entity: &str) -> Self {
        if let Some(entities) = self.table.locales.get_mut(locale) {
            entities.remove(entity);
        }
        self
    }

    pub fn build(self) -> Result<RuleTable> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.table),
        }
    }

    fn entities_mut(&mut self, locale: &str) -> &mut BTreeMap<String, EntityRule> {
        self.table.locales.entry(locale.to_string()).or_default()
    }

    fn push_condition(&mut self, locale: &str, entity: &str, condition: TrimCondition) {
        if self.error.is_some() {
            return;
        }
        let rule = self
            .entities_mut(locale)
            .entry(entity.to_string())
            .or_insert_with(|| EntityRule::Trim(TrimRule::default()));
        match rule {
            EntityRule::Trim(rule) => rule.conditions.push(condition),
            EntityRule::Enum(_) => {
                self.error = Some(kind_mismatch(entity, "trim", "enum"));
            }
        }
    }

    fn fail(mut self, entity: &str, wanted: &str, found: &str) -> Self {
        self.error = Some(kind_mismatch(entity, wanted, found));
        self
    }
}

fn kind_mismatch(entity: &str, wanted: &str, found: &str) -> SpanlexError {
    SpanlexError::Rule(format!(
        "Entity '{}' is a {} entity and cannot take {} rules",
        entity, found, wanted
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove_texts() {
        let table = RuleTable::builder()
            .add_enum_texts("en", "hero", "spiderman", ["Spiderman", "Spider-man"])
            .add_enum_texts("en", "hero", "spiderman", ["Spiderman"])
            .add_enum_texts("en", "hero", "iron man", ["iron man"])
            .build()
            .unwrap();
        let Some(EntityRule::Enum(rule)) = table.entity("en", "hero") else {
            panic!("expected enum rule");
        };
        assert_eq!(rule.options.len(), 2);
        assert_eq!(rule.option("spiderman").unwrap().texts, vec!["Spiderman", "Spider-man"]);

        let table = table
            .to_builder()
            .remove_enum_texts("en", "hero", "iron man", ["iron man"])
            .build()
            .unwrap();
        let Some(EntityRule::Enum(rule)) = table.entity("en", "hero") else {
            panic!("expected enum rule");
        };
        assert_eq!(rule.options.len(), 1);
    }

    #[test]
    fn test_removing_last_text_removes_entity() {
        let table = RuleTable::builder()
            .add_enum_texts("en", "color", "red", ["red"])
            .remove_enum_texts("en", "color", "red", ["red"])
            .build()
            .unwrap();
        assert!(table.entity("en", "color").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_kind_mismatch_is_reported() {
        let result = RuleTable::builder()
            .add_enum_texts("en", "place", "home", ["home"])
            .add_after("en", "place", ["to"])
            .build();
        assert!(matches!(result, Err(SpanlexError::Rule(_))));

        let result = RuleTable::builder()
            .add_before("en", "place", ["from"])
            .add_enum_texts("en", "place", "home", ["home"])
            .build();
        assert!(matches!(result, Err(SpanlexError::Rule(_))));
    }

    #[test]
    fn test_remove_entity() {
        let table = RuleTable::builder()
            .add_enum_texts("en", "hero", "spiderman", ["spiderman"])
            .add_enum_texts("es", "hero", "spiderman", ["hombre araña"])
            .add_after("es", "destino", ["a"])
            .remove_entity("hero")
            .build()
            .unwrap();
        assert!(table.entity("en", "hero").is_none());
        assert!(table.entity("es", "hero").is_none());
        assert!(table.entity("es", "destino").is_some());
        assert_eq!(table.entity_names(), vec!["destino"]);
    }

    #[test]
    fn test_json_shape() {
        let table = RuleTable::builder()
            .add_enum_texts("en", "hero", "spiderman", ["spiderman"])
            .add_between("en", "route", ["from"], ["to"])
            .build()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();
        assert_eq!(value["en"]["hero"]["type"], "enum");
        assert_eq!(value["en"]["hero"]["options"][0]["name"], "spiderman");
        assert_eq!(value["en"]["route"]["type"], "trim");
        assert_eq!(value["en"]["route"]["conditions"][0]["condition"], "between");
        assert_eq!(value["en"]["route"]["conditions"][0]["strategy"], "simplest");

        let parsed = RuleTable::from_json(&table.to_json().unwrap()).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_regex_rule_type_is_rejected() {
        assert!(matches!(
            RuleTable::from_json("{\"en\": {\"x\": {\"type\": \"regex\"}}}"),
            Err(SpanlexError::Serialization(_))
        ));
    }

    #[test]
    fn test_anchor_position_parsing() {
        assert_eq!("afterLast".parse::<AnchorPosition>().unwrap(), AnchorPosition::AfterLast);
        assert_eq!("before-first".parse::<AnchorPosition>().unwrap(), AnchorPosition::BeforeFirst);
        assert!("between".parse::<AnchorPosition>().is_err());
    }
}
