use anyhow::{Context, Result};
use inquire::Select;
use skillsrc_discovery::{project_dependencies, Framework};
use skillsrc_state::{ConfigStore, FileConfigStore, DEFAULT_REGISTRY};
use skillsrc_sync::{skills_with_status, GithubClient, RemoteRepository, SkillWithStatus};
use std::path::Path;

const LIST_TIP: &str =
    "Tip: Use the .skillsrc exclude array to disable/enable sub-skills before running sync.";

/// Handle the `list-skills` command.
pub(crate) async fn handle_list_skills_command(
    root: &Path,
    framework: Option<Framework>,
) -> Result<()> {
    let framework = match framework {
        Some(fw) => fw,
        None => Select::new("Select framework:", Framework::ALL.to_vec())
            .prompt()
            .context("Failed to read framework selection")?,
    };

    let skills = list_skills(root, &GithubClient::new(), framework).await;
    println!("\nAvailable skills for {framework}:");
    for skill in &skills {
        println!("- {} ({})", skill.name, skill.status);
    }
    println!("\n{LIST_TIP}");
    Ok(())
}

/// The framework's skills tagged against the project's dependencies.
///
/// Reads the registry from `.skillsrc`, falling back to the default registry
/// when the file is missing or unreadable.
pub(crate) async fn list_skills<R>(
    root: &Path,
    remote: &R,
    framework: Framework,
) -> Vec<SkillWithStatus>
where
    R: RemoteRepository + ?Sized,
{
    let registry = match FileConfigStore::with_root(root).load() {
        Ok(Some(config)) => config.registry,
        Ok(None) => DEFAULT_REGISTRY.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable .skillsrc");
            DEFAULT_REGISTRY.to_string()
        }
    };
    let deps = project_dependencies(root);
    skills_with_status(remote, framework.as_str(), &registry, &deps).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillsrc_sync::{MemoryRepository, SkillStatus};
    use skillsrc_test_utils::ProjectFixture;

    #[tokio::test]
    async fn tags_skills_from_project_dependencies() {
        let fixture = ProjectFixture::new().unwrap();
        fixture
            .write("pubspec.yaml", "dependencies:\n  flutter_bloc: ^8.1.0\n")
            .unwrap();
        fixture.write(".skillsrc", "not: [valid").unwrap();
        let remote = MemoryRepository::new()
            .with_file("skills/flutter/bloc-state-management/SKILL.md", "a")
            .with_file("skills/flutter/widgets/SKILL.md", "b");

        let skills = list_skills(fixture.root(), &remote, Framework::Flutter).await;
        let statuses: Vec<_> = skills
            .iter()
            .map(|s| (s.name.as_str(), s.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("bloc-state-management", SkillStatus::Detected),
                ("widgets", SkillStatus::NoRule),
            ]
        );
    }
}
