//! The registry's `skills/metadata.json`.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Release information for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMetadata {
    pub version: Option<String>,
    pub last_updated: Option<String>,
    /// Prefix of the category's release tags, e.g. `flutter-v`.
    pub tag_prefix: Option<String>,
}

impl CategoryMetadata {
    /// The git tag for the current version, when both parts are known.
    pub fn release_tag(&self) -> Option<String> {
        match (&self.tag_prefix, &self.version) {
            (Some(prefix), Some(version)) => Some(format!("{prefix}{version}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalMetadata {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub repository: String,
}

/// Parsed `skills/metadata.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMetadata {
    #[serde(default)]
    pub global: Option<GlobalMetadata>,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryMetadata>,
}

impl RegistryMetadata {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse skills/metadata.json")
    }

    pub fn category(&self, name: &str) -> Option<&CategoryMetadata> {
        self.categories.get(name)
    }
}

/// Checks that every category declares a `version` and a `tag_prefix`.
///
/// Returns `(category, version, tag_prefix)` for each category.
pub fn validate_metadata(path: &Path) -> Result<Vec<(String, String, String)>> {
    check_metadata(path).map_err(|e| anyhow!("Metadata validation failed: {e}"))
}

fn check_metadata(path: &Path) -> Result<Vec<(String, String, String)>> {
    if !path.is_file() {
        bail!("skills/metadata.json not found");
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let doc: serde_json::Value =
        serde_json::from_str(&text).context("metadata.json is not valid JSON")?;
    let Some(categories) = doc.get("categories").and_then(|c| c.as_object()) else {
        bail!("metadata.json missing \"categories\" field");
    };

    let mut checked = Vec::with_capacity(categories.len());
    for (name, entry) in categories {
        let field = |key: &str| {
            entry
                .get(key)
                .and_then(|v| v.as_str())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let Some(version) = field("version") else {
            bail!("Category \"{name}\" missing version in metadata.json");
        };
        let Some(tag_prefix) = field("tag_prefix") else {
            bail!("Category \"{name}\" missing tag_prefix in metadata.json");
        };
        checked.push((name.clone(), version, tag_prefix));
    }
    Ok(checked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillsrc_test_utils::ProjectFixture;

    #[test]
    fn parses_registry_metadata() {
        let text = serde_json::json!({
            "global": {"author": "a", "repository": "r"},
            "categories": {"flutter": {"version": "1.2.0", "tag_prefix": "flutter-v"}}
        });
        let meta = RegistryMetadata::parse(&text.to_string()).unwrap();
        let flutter = meta.category("flutter").unwrap();
        assert_eq!(flutter.release_tag().as_deref(), Some("flutter-v1.2.0"));
        assert!(meta.category("react").is_none());
    }

    #[test]
    fn valid_metadata_lists_categories() {
        let project = ProjectFixture::new().unwrap();
        let path = project
            .write(
                "skills/metadata.json",
                r#"{"categories":{"dart":{"version":"1.0.0","tag_prefix":"dart-v"}}}"#,
            )
            .unwrap();
        let categories = validate_metadata(&path).unwrap();
        assert_eq!(categories.len(), 1);
        let (name, version, prefix) = &categories[0];
        assert_eq!((name.as_str(), version.as_str()), ("dart", "1.0.0"));
        assert_eq!(prefix, "dart-v");
    }

    #[test]
    fn missing_tag_prefix_is_rejected() {
        let project = ProjectFixture::new().unwrap();
        let path = project
            .write(
                "skills/metadata.json",
                r#"{"categories":{"dart":{"version":"1.0.0"}}}"#,
            )
            .unwrap();
        let err = validate_metadata(&path).unwrap_err().to_string();
        assert_eq!(
            err,
            "Metadata validation failed: Category \"dart\" missing tag_prefix in metadata.json"
        );
    }

    #[test]
    fn missing_file_is_rejected() {
        let project = ProjectFixture::new().unwrap();
        let err = validate_metadata(&project.root().join("skills/metadata.json")).unwrap_err();
        assert!(err.to_string().contains("skills/metadata.json not found"));
    }
}
