//! Writes collected skills into every enabled agent's skills folder.

use crate::fetch::CollectedSkill;
use crate::report::{SkipReason, WriteReport};
use skillsrc_state::SkillConfig;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Resolves `.` and `..` without touching the filesystem.
///
/// `..` above the start of a relative path is kept so that escapes remain
/// visible to [`is_path_safe`].
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// True when `target` stays inside `base` after lexical normalization.
pub fn is_path_safe(base: &Path, target: &Path) -> bool {
    normalize_lexically(target).starts_with(normalize_lexically(base))
}

/// True when the project-relative `relative` path equals an override or
/// lies beneath one.
pub fn is_overridden(relative: &str, overrides: &[String]) -> bool {
    overrides.iter().any(|entry| {
        let entry = entry.replace('\\', "/");
        let prefix = entry.trim_end_matches('/');
        relative == entry || relative.starts_with(&format!("{prefix}/"))
    })
}

fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Places skill files under a project root.
#[derive(Debug, Clone)]
pub struct SkillWriter {
    root: PathBuf,
}

impl SkillWriter {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes every skill for every effective agent of `config`.
    ///
    /// Existing files are overwritten. Overridden and escaping paths are
    /// skipped; I/O failures become warnings. Nothing here aborts the run.
    pub fn write_skills(&self, skills: &[CollectedSkill], config: &SkillConfig) -> WriteReport {
        let mut report = WriteReport::default();
        for agent in config.effective_agents() {
            let skills_path = agent.definition().skills_path;
            for skill in skills {
                let written = self.write_skill(skills_path, skill, &config.custom_overrides);
                report.merge(written);
            }
            tracing::info!("  Updated {}/ ({})", skills_path, agent.definition().name);
        }
        report
    }

    fn write_skill(
        &self,
        skills_path: &str,
        skill: &CollectedSkill,
        overrides: &[String],
    ) -> WriteReport {
        let mut report = WriteReport::default();
        let category_dir = self.root.join(skills_path).join(&skill.category);
        let skill_dir = normalize_lexically(&category_dir.join(&skill.skill));

        for file in &skill.files {
            let target = normalize_lexically(&skill_dir.join(&file.name));
            let relative = relative_display(&self.root, &target);

            if is_overridden(&relative, overrides) {
                tracing::info!("  Skipping overridden: {}", relative);
                report.skipped.push(SkipReason::Overridden {
                    path: PathBuf::from(&relative),
                });
                continue;
            }

            if !is_path_safe(&skill_dir, &target) {
                tracing::warn!(
                    file = %file.name,
                    skill = %skill.id(),
                    "Security Error: Invalid path"
                );
                report.skipped.push(SkipReason::UnsafePath {
                    path: PathBuf::from(&file.name),
                });
                continue;
            }

            if let Err(e) = write_file(&target, &file.content) {
                tracing::warn!(error = %e, path = %relative, "Failed to write skill file");
                report.warnings.push(format!("{relative}: {e}"));
                continue;
            }
            report.written += 1;
        }
        report
    }
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
