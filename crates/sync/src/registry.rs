//! What a registry offers: its categories, release metadata, and the skill
//! folders of one framework.

use crate::remote::{EntryKind, GitHubRef, RemoteRepository};
use crate::resolve::skill_folders;
use serde::{Deserialize, Serialize};
use skillsrc_discovery::{detection_rules, DependencySet};
use skillsrc_state::DEFAULT_REF;
use skillsrc_validate::RegistryMetadata;
use std::fmt;

/// Registry path of the release metadata.
pub const METADATA_PATH: &str = "skills/metadata.json";

/// Categories assumed when the registry cannot be listed.
pub const FALLBACK_CATEGORIES: &[&str] = &["flutter", "dart"];

/// Categories and release metadata found in a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryListing {
    pub categories: Vec<String>,
    pub metadata: RegistryMetadata,
}

impl RegistryListing {
    fn fallback() -> Self {
        Self {
            categories: FALLBACK_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            metadata: RegistryMetadata::default(),
        }
    }
}

/// Lists the registry's categories on its default branch.
///
/// Falls back to [`FALLBACK_CATEGORIES`] with empty metadata when the URL is
/// not a GitHub repository, the tree cannot be listed, or it has no
/// categories.
pub async fn discover_registry<R>(remote: &R, registry_url: &str) -> RegistryListing
where
    R: RemoteRepository + ?Sized,
{
    let Some(repo) = GitHubRef::parse(registry_url) else {
        tracing::debug!(registry_url, "Registry is not a GitHub URL");
        return RegistryListing::fallback();
    };
    let branch = remote
        .default_branch(&repo)
        .await
        .unwrap_or_else(|| DEFAULT_REF.to_string());
    let Some(tree) = remote.tree(&repo, &branch).await else {
        tracing::debug!(%repo, branch, "Registry discovery failed");
        return RegistryListing::fallback();
    };

    let mut categories: Vec<String> = Vec::new();
    for entry in tree.iter().filter(|e| e.kind == EntryKind::Tree) {
        let Some(name) = entry.path.strip_prefix("skills/") else {
            continue;
        };
        if !name.is_empty() && !name.contains('/') && !categories.iter().any(|c| c == name) {
            categories.push(name.to_string());
        }
    }
    if categories.is_empty() {
        return RegistryListing::fallback();
    }

    let metadata = match remote.raw_file(&repo, &branch, METADATA_PATH).await {
        Some(text) => RegistryMetadata::parse(&text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable registry metadata");
            RegistryMetadata::default()
        }),
        None => RegistryMetadata::default(),
    };
    RegistryListing {
        categories,
        metadata,
    }
}

/// Skill folder names of `framework` on the registry's `main` branch.
pub async fn framework_skills<R>(remote: &R, registry_url: &str, framework: &str) -> Vec<String>
where
    R: RemoteRepository + ?Sized,
{
    let Some(repo) = GitHubRef::parse(registry_url) else {
        return Vec::new();
    };
    match remote.tree(&repo, DEFAULT_REF).await {
        Some(tree) => skill_folders(&tree, framework),
        None => Vec::new(),
    }
}

/// Whether the project's dependencies call for a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillStatus {
    Detected,
    NotDetected,
    /// The skill has no detection rule.
    NoRule,
}

impl fmt::Display for SkillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkillStatus::Detected => "detected",
            SkillStatus::NotDetected => "not-detected",
            SkillStatus::NoRule => "no-rule",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillWithStatus {
    pub name: String,
    pub status: SkillStatus,
}

/// Tags each of the framework's skills with its detection status, sorted
/// by name.
///
/// Uses the framework's rule ids when the registry lists no skills.
pub async fn skills_with_status<R>(
    remote: &R,
    framework: &str,
    registry_url: &str,
    deps: &DependencySet,
) -> Vec<SkillWithStatus>
where
    R: RemoteRepository + ?Sized,
{
    let rules = detection_rules(framework);
    let mut names = framework_skills(remote, registry_url, framework).await;
    if names.is_empty() {
        names = rules.iter().map(|r| r.id.to_string()).collect();
    }
    names.sort();
    names.dedup();

    names
        .into_iter()
        .map(|name| {
            let status = match rules.iter().find(|r| r.id == name) {
                Some(rule) if rule.is_satisfied_by(deps) => SkillStatus::Detected,
                Some(_) => SkillStatus::NotDetected,
                None => SkillStatus::NoRule,
            };
            SkillWithStatus { name, status }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRepository;

    const URL: &str = "https://github.com/acme/skills";

    fn registry() -> MemoryRepository {
        MemoryRepository::new()
            .with_default_branch("develop")
            .with_refs(["develop", "main"])
            .with_file("skills/flutter/bloc-state-management/SKILL.md", "a")
            .with_file("skills/flutter/custom-lints/SKILL.md", "b")
            .with_file("skills/flutter/getx-navigation/SKILL.md", "c")
            .with_file("skills/dart/language/SKILL.md", "d")
            .with_file(
                METADATA_PATH,
                r#"{"categories":{"flutter":{"version":"1.2.0","tag_prefix":"flutter-v"}}}"#,
            )
    }

    #[tokio::test]
    async fn discovers_categories_and_metadata() {
        let remote = registry();
        let listing = discover_registry(&remote, URL).await;
        assert_eq!(listing.categories, vec!["flutter", "dart"]);
        let flutter = listing.metadata.category("flutter");
        assert_eq!(
            flutter.and_then(|c| c.release_tag()),
            Some("flutter-v1.2.0".to_string())
        );
        assert_eq!(remote.tree_requests(), vec!["develop"]);
    }

    #[tokio::test]
    async fn falls_back_when_registry_is_unreachable() {
        let remote = MemoryRepository::new().with_refs(Vec::<String>::new());
        let listing = discover_registry(&remote, URL).await;
        assert_eq!(listing.categories, vec!["flutter", "dart"]);
        assert_eq!(listing.metadata, RegistryMetadata::default());

        let listing = discover_registry(&remote, "https://gitlab.com/a/b").await;
        assert_eq!(listing.categories, vec!["flutter", "dart"]);
    }

    #[tokio::test]
    async fn status_reflects_dependencies() {
        let remote = registry();
        let deps: DependencySet = ["flutter_bloc".to_string()].into_iter().collect();
        let skills = skills_with_status(&remote, "flutter", URL, &deps).await;
        assert_eq!(
            skills,
            vec![
                SkillWithStatus {
                    name: "bloc-state-management".into(),
                    status: SkillStatus::Detected
                },
                SkillWithStatus {
                    name: "custom-lints".into(),
                    status: SkillStatus::NoRule
                },
                SkillWithStatus {
                    name: "getx-navigation".into(),
                    status: SkillStatus::NotDetected
                },
            ]
        );
    }

    #[tokio::test]
    async fn status_falls_back_to_rule_ids() {
        let remote = MemoryRepository::new();
        let skills = skills_with_status(&remote, "nestjs", URL, &DependencySet::new()).await;
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["caching", "database", "security"]);
        assert!(skills.iter().all(|s| s.status == SkillStatus::NotDetected));
    }
}
