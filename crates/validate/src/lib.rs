//! SKILL.md parsing and linting for skill registries.
//!
//! A registry keeps its skills under `skills/<category>/<skill>/SKILL.md` and
//! describes category releases in `skills/metadata.json`. This crate parses
//! skill frontmatter and checks skills and metadata against the registry's
//! authoring rules.
//!
//! # Example
//!
//! ```rust
//! use skillsrc_validate::lint_skill_content;
//!
//! let content = "---\nname: my-skill\ndescription: A helpful skill\n---\n\
//!                ### **Priority: P1**\n";
//!
//! assert!(lint_skill_content(content).is_empty());
//! ```

pub mod common;
pub mod frontmatter;
pub mod lint;
pub mod metadata;

pub use common::{Severity, ValidationIssue, ValidationResult, ValidationSummary};
pub use frontmatter::{
    parse_frontmatter, parse_priority, split_frontmatter, FrontmatterMetadata, ParsedSkill,
    SkillFrontmatter, SkillTriggers, DEFAULT_PRIORITY,
};
pub use lint::{lint_skill_content, lint_skill_dir, validate_skill_file};
pub use metadata::{validate_metadata, CategoryMetadata, RegistryMetadata};

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Which skills a validation run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScope {
    /// Every SKILL.md under `skills/`.
    All,
    /// SKILL.md files changed against git, plus untracked ones.
    Changed,
}

/// Outcome of validating a registry checkout.
#[derive(Debug, Clone)]
pub struct ValidationRun {
    pub results: Vec<ValidationResult>,
    /// `(category, version, tag_prefix)` for each valid metadata category.
    pub categories: Vec<(String, String, String)>,
    pub metadata_error: Option<String>,
    pub summary: ValidationSummary,
}

impl ValidationRun {
    /// True when any skill or the metadata failed.
    pub fn failed(&self) -> bool {
        self.summary.failed > 0 || self.metadata_error.is_some()
    }
}

/// Walks up from `start` to the nearest directory holding `.git` or
/// `pnpm-workspace.yaml`; falls back to `start`.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists() || dir.join("pnpm-workspace.yaml").exists())
        .unwrap_or(start)
        .to_path_buf()
}

/// Every SKILL.md below `skills_dir`, sorted.
pub fn find_skill_files(skills_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(skills_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == "SKILL.md")
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn git_lines(root: &Path, args: &[&str]) -> Result<Vec<String>> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "Git command failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());
    Ok(lines.map(str::to_string).collect())
}

fn is_skill_path(file: &str) -> bool {
    file.starts_with("skills/") && file.ends_with("SKILL.md")
}

/// SKILL.md files changed relative to git, followed by untracked ones.
///
/// In CI (`GITHUB_BASE_REF` set) changes are taken against the base branch;
/// locally against `HEAD`.
pub fn changed_skill_files(root: &Path) -> Result<Vec<PathBuf>> {
    let changed = match std::env::var("GITHUB_BASE_REF") {
        Ok(base) if !base.is_empty() => {
            if let Err(e) = git_lines(root, &["fetch", "origin", &base, "--depth=1"]) {
                tracing::debug!(error = %e, base = %base, "Could not fetch base branch");
            }
            let range = format!("origin/{base}...HEAD");
            git_lines(root, &["diff", "--name-only", &range])?
        }
        _ => git_lines(root, &["diff", "--name-only", "HEAD"])?,
    };
    let untracked = git_lines(root, &["ls-files", "--others", "--exclude-standard"])?;

    Ok(changed
        .iter()
        .filter(|f| root.join(f).exists())
        .chain(untracked.iter())
        .filter(|f| is_skill_path(f))
        .map(|f| root.join(f))
        .collect())
}

/// Validates skills and metadata of the registry checkout at `root`.
pub fn validate_registry(root: &Path, scope: ValidationScope) -> Result<ValidationRun> {
    let skills_dir = root.join("skills");
    if !skills_dir.is_dir() {
        bail!(
            "skills/ directory not found (searched at {})",
            skills_dir.display()
        );
    }

    let files = match scope {
        ValidationScope::All => find_skill_files(&skills_dir),
        ValidationScope::Changed => changed_skill_files(root).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not determine changed files");
            Vec::new()
        }),
    };
    tracing::info!(count = files.len(), ?scope, "Validating skills");

    let results: Vec<ValidationResult> = files
        .iter()
        .map(|path| validate_skill_file(root, path))
        .collect();
    let summary = ValidationSummary::from_results(&results);

    let metadata_path = skills_dir.join("metadata.json");
    let (categories, metadata_error) = match validate_metadata(&metadata_path) {
        Ok(categories) => (categories, None),
        Err(e) => (Vec::new(), Some(e.to_string())),
    };

    Ok(ValidationRun {
        results,
        categories,
        metadata_error,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillsrc_test_utils::ProjectFixture;

    const METADATA: &str =
        r#"{"categories":{"flutter":{"version":"1.0.0","tag_prefix":"flutter-v"}}}"#;

    #[test]
    fn validate_all_checks_every_skill() {
        let project = ProjectFixture::new().unwrap();
        project
            .create_skill("flutter", "bloc", "BLoC", "P0")
            .unwrap();
        project
            .write("skills/flutter/broken/SKILL.md", "# no frontmatter")
            .unwrap();
        project.write("skills/metadata.json", METADATA).unwrap();

        let run = validate_registry(project.root(), ValidationScope::All).unwrap();
        assert_eq!(run.summary.total, 2);
        assert_eq!(run.summary.failed, 1);
        assert!(run.failed());
        assert_eq!(run.categories.len(), 1);
        assert_eq!(
            run.results[0].path,
            Path::new("skills/flutter/bloc/SKILL.md")
        );
    }

    #[test]
    fn metadata_failure_fails_the_run() {
        let project = ProjectFixture::new().unwrap();
        project
            .create_skill("flutter", "bloc", "BLoC", "P0")
            .unwrap();

        let run = validate_registry(project.root(), ValidationScope::All).unwrap();
        assert_eq!(run.summary.failed, 0);
        assert!(run.failed());
        let error = run.metadata_error.unwrap();
        assert!(error.contains("skills/metadata.json not found"));
    }

    #[test]
    fn missing_skills_dir_is_an_error() {
        let project = ProjectFixture::new().unwrap();
        let result = validate_registry(project.root(), ValidationScope::All);
        assert!(result.is_err());
    }

    #[test]
    fn project_root_found_by_git_marker() {
        let project = ProjectFixture::new().unwrap();
        project.write(".git/HEAD", "ref: refs/heads/main").unwrap();
        project.write("skills/x/keep", "").unwrap();
        let nested = project.root().join("skills/x");
        assert_eq!(find_project_root(&nested), project.root());
    }

    #[test]
    fn skill_path_filter() {
        assert!(is_skill_path("skills/flutter/bloc/SKILL.md"));
        assert!(!is_skill_path("docs/SKILL.md"));
        assert!(!is_skill_path("skills/flutter/bloc/references/a.md"));
    }
}
