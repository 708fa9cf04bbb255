//! Starter `.skillsrc` built from detection results and registry metadata.

use skillsrc_discovery::DependencySet;
use skillsrc_state::{Agent, CategoryEntry, SkillConfig, DEFAULT_REF};
use skillsrc_sync::{apply_exclusions, CategoryMetadata, RegistryMetadata};

/// Category holding skills shared by every framework.
pub const COMMON_CATEGORY: &str = "common";

/// React skills that React Native projects include by default.
const REACT_NATIVE_INCLUDES: &[&str] = &["react/hooks", "react/component-patterns"];

/// Ref for a category: its current release tag, or [`DEFAULT_REF`] when the
/// registry publishes no version for it.
fn category_ref(meta: Option<&CategoryMetadata>) -> String {
    match meta.and_then(|m| m.version.as_deref()) {
        Some(version) => format!(
            "{}{version}",
            meta.and_then(|m| m.tag_prefix.as_deref()).unwrap_or("")
        ),
        None => DEFAULT_REF.to_string(),
    }
}

/// Builds the configuration written by `init`.
///
/// The framework category is always present. Language categories and the
/// common category are added only when the registry metadata knows them.
pub fn build_initial_config(
    framework: &str,
    agents: &[Agent],
    registry: &str,
    metadata: &RegistryMetadata,
    languages: &[&str],
) -> SkillConfig {
    let mut config = SkillConfig::new(registry);
    config.agents = agents.to_vec();

    let mut entry = CategoryEntry {
        git_ref: Some(category_ref(metadata.category(framework))),
        ..Default::default()
    };
    if framework == "react-native" && metadata.category("react").is_some() {
        let includes = REACT_NATIVE_INCLUDES.iter().map(|s| s.to_string());
        entry.include = Some(includes.collect());
    }
    config.skills.insert(framework.to_string(), entry);

    for category in languages.iter().copied().chain([COMMON_CATEGORY]) {
        if config.skills.contains_key(category) {
            continue;
        }
        if let Some(meta) = metadata.category(category) {
            let entry = CategoryEntry::at_ref(category_ref(Some(meta)));
            config.skills.insert(category.to_string(), entry);
        }
    }
    config
}

/// Excludes every configured category's skills whose detection rule the
/// project's dependencies do not satisfy.
pub fn exclude_undetected(config: &mut SkillConfig, deps: &DependencySet) {
    let categories: Vec<String> = config.skills.keys().cloned().collect();
    for category in categories {
        apply_exclusions(config, &category, deps);
    }
}
