//! The `.skillsrc` document: model, validation, and normalization.

use crate::agents::Agent;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the project configuration, relative to the project root.
pub const CONFIG_FILE_NAME: &str = ".skillsrc";
/// Revision used when a category does not pin a `ref`.
pub const DEFAULT_REF: &str = "main";
/// Registry offered by `init` when the user does not choose another.
pub const DEFAULT_REGISTRY: &str = "https://github.com/fierzone/agent-skills-standard";
/// Comment line written at the top of a freshly initialized `.skillsrc`.
pub const INIT_HEADER: &str = "# Auto-detected configuration";

/// Errors raised while loading or saving `.skillsrc`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed YAML.
    #[error("failed to parse .skillsrc: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// The document is YAML but does not describe a valid configuration.
    #[error("Invalid .skillsrc format: {0}")]
    Invalid(String),

    #[error("failed to serialize .skillsrc: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Per-category sync settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Branch or tag the category's tree is resolved against.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// Restricts discovery to these skills. Entries containing `/` are
    /// absolute references into another category (`other/skill`, `other/*`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    /// Skills suppressed even when discovered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

impl CategoryEntry {
    /// Creates an entry pinned to `git_ref`.
    pub fn at_ref(git_ref: impl Into<String>) -> Self {
        Self {
            git_ref: Some(git_ref.into()),
            ..Self::default()
        }
    }

    /// The revision to resolve, falling back to [`DEFAULT_REF`].
    pub fn git_ref(&self) -> &str {
        self.git_ref.as_deref().unwrap_or(DEFAULT_REF)
    }

    pub fn is_excluded(&self, skill: &str) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|ids| ids.iter().any(|id| id == skill))
    }

    /// Collapses duplicate ids and turns empty lists into absent fields.
    pub fn normalize(&mut self) {
        normalize_list(&mut self.include);
        normalize_list(&mut self.exclude);
    }
}

fn normalize_list(list: &mut Option<Vec<String>>) {
    if let Some(items) = list.as_mut() {
        dedupe_in_order(items);
        if items.is_empty() {
            *list = None;
        }
    }
}

fn dedupe_in_order<T: PartialEq>(items: &mut Vec<T>) {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    *items = kept;
}

/// The project's declarative sync configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillConfig {
    /// URL of the hosted skills registry.
    pub registry: String,
    /// Agents receiving skills. Empty means every supported agent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<Agent>,
    /// Category name to settings, in document order.
    pub skills: IndexMap<String, CategoryEntry>,
    /// Project-relative path prefixes that sync never overwrites.
    #[serde(default)]
    pub custom_overrides: Vec<String>,
}

impl SkillConfig {
    /// Creates a configuration with no categories.
    pub fn new(registry: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
            agents: Vec::new(),
            skills: IndexMap::new(),
            custom_overrides: Vec::new(),
        }
    }

    /// Parses and validates a `.skillsrc` document.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let raw: serde_yaml::Value = serde_yaml::from_str(text).map_err(ConfigError::Parse)?;
        let config: SkillConfig =
            serde_yaml::from_value(raw).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.registry).map_err(|e| {
            let reason = format!("registry '{}' is not a valid URL: {e}", self.registry);
            ConfigError::Invalid(reason)
        })?;
        if let Some(name) = self.skills.keys().find(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "category name '{name}' must not be blank"
            )));
        }
        Ok(())
    }

    /// Agents to write to: the configured list, or every agent when none is set.
    pub fn effective_agents(&self) -> Vec<Agent> {
        if self.agents.is_empty() {
            Agent::ALL.to_vec()
        } else {
            self.agents.clone()
        }
    }

    /// Applies the absent-vs-empty rules used for persistence.
    ///
    /// Duplicate agents and ids are removed keeping first occurrence, and
    /// empty `include`/`exclude` lists become absent fields.
    pub fn normalize(&mut self) {
        dedupe_in_order(&mut self.agents);
        for entry in self.skills.values_mut() {
            entry.normalize();
        }
    }

    /// Serializes the normalized document.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        let mut normalized = self.clone();
        normalized.normalize();
        serde_yaml::to_string(&normalized).map_err(ConfigError::Serialize)
    }
}
