//! Downloads the files that make up one skill.

use crate::remote::{fetch_files, GitHubRef, RemoteRepository, TreeEntry};
use serde::{Deserialize, Serialize};

/// Skill-relative prefixes that are synced besides `SKILL.md`.
pub const SKILL_ASSET_DIRS: &[&str] = &["references/", "scripts/", "assets/"];

/// Entry point file of every skill.
pub const SKILL_FILE: &str = "SKILL.md";

/// One downloaded file, named relative to its skill folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFile {
    pub name: String,
    pub content: String,
}

/// A skill ready to be written into agent folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedSkill {
    pub category: String,
    pub skill: String,
    /// Sorted by name.
    pub files: Vec<SkillFile>,
}

impl CollectedSkill {
    /// `category/skill`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.category, self.skill)
    }
}

/// Owning category and folder of a resolved skill id.
///
/// Absolute ids (`other/skill`) name their own category; plain ids belong
/// to `category`.
pub fn skill_source<'a>(category: &'a str, id: &'a str) -> (&'a str, &'a str) {
    id.split_once('/').unwrap_or((category, id))
}

fn is_synced_file(relative: &str) -> bool {
    let in_asset_dir = SKILL_ASSET_DIRS.iter().any(|d| relative.starts_with(d));
    relative == SKILL_FILE || in_asset_dir
}

/// Repository paths of the skill's blobs that are synced.
pub fn select_skill_files(tree: &[TreeEntry], category: &str, skill: &str) -> Vec<String> {
    let prefix = format!("skills/{category}/{skill}/");
    tree.iter()
        .filter(|e| e.is_blob())
        .filter(|e| e.path.strip_prefix(&prefix).is_some_and(is_synced_file))
        .map(|e| e.path.clone())
        .collect()
}

/// Downloads one resolved skill.
///
/// Returns `None` when none of its files could be fetched.
pub async fn fetch_skill<R>(
    remote: &R,
    repo: &GitHubRef,
    git_ref: &str,
    category: &str,
    id: &str,
    tree: &[TreeEntry],
    concurrency: usize,
) -> Option<CollectedSkill>
where
    R: RemoteRepository + ?Sized,
{
    let (source_category, skill) = skill_source(category, id);
    let paths = select_skill_files(tree, source_category, skill);
    let downloaded = fetch_files(remote, repo, git_ref, paths, concurrency).await;
    if downloaded.is_empty() {
        tracing::debug!(skill = id, "No files fetched for skill");
        return None;
    }

    let prefix = format!("skills/{source_category}/{skill}/");
    let files: Vec<SkillFile> = downloaded
        .into_iter()
        .map(|(path, content)| SkillFile {
            name: path.strip_prefix(&prefix).unwrap_or(&path).to_string(),
            content,
        })
        .collect();
    tracing::info!(
        "  + Fetched {}/{} ({} files)",
        source_category,
        skill,
        files.len()
    );

    Some(CollectedSkill {
        category: source_category.to_string(),
        skill: skill.to_string(),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRepository;

    fn repo() -> GitHubRef {
        GitHubRef::parse("https://github.com/acme/skills").unwrap()
    }

    fn registry() -> MemoryRepository {
        MemoryRepository::new()
            .with_file("skills/flutter/bloc/SKILL.md", "# bloc")
            .with_file("skills/flutter/bloc/references/events.md", "events")
            .with_file("skills/flutter/bloc/scripts/gen.sh", "echo")
            .with_file("skills/flutter/bloc/assets/logo.svg", "<svg/>")
            .with_file("skills/flutter/bloc/README.md", "not synced")
            .with_file("skills/flutter/bloc/examples/x.dart", "not synced")
            .with_file("skills/flutter/bloc-extra/SKILL.md", "other skill")
            .with_file("skills/react/hooks/SKILL.md", "# hooks")
    }

    #[test]
    fn source_of_absolute_and_plain_ids() {
        assert_eq!(skill_source("flutter", "bloc"), ("flutter", "bloc"));
        assert_eq!(
            skill_source("react-native", "react/hooks"),
            ("react", "hooks")
        );
    }

    #[tokio::test]
    async fn selects_only_allowed_files() {
        let remote = registry();
        let tree = remote.tree(&repo(), "main").await.unwrap();
        assert_eq!(
            select_skill_files(&tree, "flutter", "bloc"),
            vec![
                "skills/flutter/bloc/SKILL.md",
                "skills/flutter/bloc/references/events.md",
                "skills/flutter/bloc/scripts/gen.sh",
                "skills/flutter/bloc/assets/logo.svg",
            ]
        );
    }

    #[tokio::test]
    async fn fetches_absolute_skill_under_its_own_category() {
        let remote = registry();
        let tree = remote.tree(&repo(), "main").await.unwrap();
        let repo = repo();
        let fetched = fetch_skill(
            &remote,
            &repo,
            "main",
            "react-native",
            "react/hooks",
            &tree,
            10,
        );
        let skill = fetched.await.unwrap();
        assert_eq!(skill.id(), "react/hooks");
        assert_eq!(
            skill.files,
            vec![SkillFile {
                name: "SKILL.md".into(),
                content: "# hooks".into()
            }]
        );
    }

    #[tokio::test]
    async fn files_are_sorted_by_name() {
        let remote = registry();
        let tree = remote.tree(&repo(), "main").await.unwrap();
        let skill = fetch_skill(&remote, &repo(), "main", "flutter", "bloc", &tree, 2)
            .await
            .unwrap();
        let names: Vec<_> = skill.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "SKILL.md",
                "assets/logo.svg",
                "references/events.md",
                "scripts/gen.sh"
            ]
        );
    }

    #[tokio::test]
    async fn skill_without_files_is_dropped() {
        let remote = registry();
        let tree = remote.tree(&repo(), "main").await.unwrap();
        assert!(
            fetch_skill(&remote, &repo(), "main", "flutter", "missing", &tree, 10)
                .await
                .is_none()
        );
    }
}
