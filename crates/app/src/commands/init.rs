use crate::init::{build_initial_config, exclude_undetected};
use anyhow::{anyhow, Context, Result};
use inquire::{Confirm, MultiSelect, Select, Text};
use skillsrc_discovery::{detect_languages, Framework, ProjectContext};
use skillsrc_state::{Agent, FileConfigStore, SkillConfig, DEFAULT_REGISTRY, INIT_HEADER};
use skillsrc_sync::{discover_registry, GithubClient, RemoteRepository};
use std::path::Path;

/// Choices made for a new `.skillsrc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InitSelection {
    pub framework: Framework,
    pub agents: Vec<Agent>,
    pub registry: String,
}

/// Handle the `init` command.
pub(crate) async fn handle_init_command(
    root: &Path,
    framework: Option<Framework>,
    agents: Option<Vec<Agent>>,
    registry: Option<String>,
    yes: bool,
) -> Result<()> {
    let store = FileConfigStore::with_root(root);
    if store.exists() && !yes {
        let overwrite = Confirm::new(".skillsrc already exists. Do you want to overwrite it?")
            .with_default(false)
            .prompt()
            .context("Failed to get user confirmation")?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let context = ProjectContext::analyze(root);
    let selection = select(&context, framework, agents, registry, yes)?;
    let remote = GithubClient::new();
    let config = write_initial_config(&store, &remote, &context, &selection).await?;

    println!("Initialized {}", store.path().display());
    println!("  Framework: {}", selection.framework);
    println!("  Registry:  {}", config.registry);
    println!("Next step: Run `skillsrc sync`");
    Ok(())
}

/// Resolves every choice from flags, detection, or prompts.
fn select(
    context: &ProjectContext,
    framework: Option<Framework>,
    agents: Option<Vec<Agent>>,
    registry: Option<String>,
    yes: bool,
) -> Result<InitSelection> {
    let framework = match framework {
        Some(fw) => fw,
        None if yes => context
            .primary_framework()
            .ok_or_else(|| anyhow!("No framework detected; pass --framework"))?,
        None => {
            let cursor = context
                .primary_framework()
                .and_then(|fw| Framework::ALL.iter().position(|f| *f == fw))
                .unwrap_or(0);
            Select::new("Select framework:", Framework::ALL.to_vec())
                .with_starting_cursor(cursor)
                .prompt()
                .context("Failed to read framework selection")?
        }
    };

    let agents = match agents {
        Some(agents) => agents,
        None if yes => context.agents.clone(),
        None => {
            let defaults: Vec<usize> = Agent::ALL
                .iter()
                .enumerate()
                .filter(|(_, agent)| context.agents.contains(*agent))
                .map(|(i, _)| i)
                .collect();
            MultiSelect::new("Select AI agents to sync skills to:", Agent::ALL.to_vec())
                .with_default(&defaults)
                .prompt()
                .context("Failed to read agent selection")?
        }
    };

    let registry = match registry {
        Some(url) => url,
        None if yes => DEFAULT_REGISTRY.to_string(),
        None => Text::new("Skills Registry URL:")
            .with_default(DEFAULT_REGISTRY)
            .prompt()
            .context("Failed to read registry URL")?,
    };

    Ok(InitSelection {
        framework,
        agents,
        registry,
    })
}

/// Builds the starter configuration for `selection` and saves it with the
/// init header.
pub(crate) async fn write_initial_config<R>(
    store: &FileConfigStore,
    remote: &R,
    context: &ProjectContext,
    selection: &InitSelection,
) -> Result<SkillConfig>
where
    R: RemoteRepository + ?Sized,
{
    let listing = discover_registry(remote, &selection.registry).await;
    tracing::debug!(categories = ?listing.categories, "Registry discovered");

    let languages = detect_languages(&context.root, selection.framework);
    let mut config = build_initial_config(
        selection.framework.as_str(),
        &selection.agents,
        &selection.registry,
        &listing.metadata,
        &languages,
    );
    exclude_undetected(&mut config, &context.dependencies);

    store
        .save_with_header(&config, INIT_HEADER)
        .context("Failed to write .skillsrc")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillsrc_state::ConfigStore;
    use skillsrc_sync::MemoryRepository;
    use skillsrc_test_utils::ProjectFixture;

    const REGISTRY: &str = "https://github.com/acme/skills";

    fn flutter_project() -> ProjectFixture {
        let fixture = ProjectFixture::new().unwrap();
        fixture
            .write(
                "pubspec.yaml",
                "name: app\ndependencies:\n  flutter:\n    sdk: flutter\n  flutter_bloc: ^8.1.0\n",
            )
            .unwrap();
        fixture.write(".cursor/rules/keep.md", "").unwrap();
        fixture
    }

    #[test]
    fn yes_uses_detected_defaults() {
        let fixture = flutter_project();
        let context = ProjectContext::analyze(fixture.root());
        let selection = select(&context, None, None, None, true).unwrap();
        assert_eq!(selection.framework, Framework::Flutter);
        assert_eq!(selection.agents, vec![Agent::Cursor]);
        assert_eq!(selection.registry, DEFAULT_REGISTRY);
    }

    #[test]
    fn yes_without_detection_needs_a_framework() {
        let fixture = ProjectFixture::new().unwrap();
        let context = ProjectContext::analyze(fixture.root());
        let err = select(&context, None, None, None, true).unwrap_err();
        assert!(err.to_string().contains("--framework"));

        let selection = select(&context, Some(Framework::Golang), None, None, true).unwrap();
        assert_eq!(selection.framework, Framework::Golang);
        assert!(selection.agents.is_empty());
    }

    #[tokio::test]
    async fn writes_config_with_header_and_exclusions() {
        let fixture = flutter_project();
        let context = ProjectContext::analyze(fixture.root());
        let metadata = serde_json::json!({"categories": {
            "flutter": {"version": "1.0.0", "tag_prefix": "flutter-v"},
            "dart": {"version": "1.1.0", "tag_prefix": "dart-v"}
        }});
        let remote = MemoryRepository::new()
            .with_file("skills/flutter/bloc-state-management/SKILL.md", "a")
            .with_file("skills/dart/language/SKILL.md", "b")
            .with_file("skills/metadata.json", metadata.to_string());
        let selection = InitSelection {
            framework: Framework::Flutter,
            agents: vec![Agent::Cursor],
            registry: REGISTRY.to_string(),
        };
        let store = FileConfigStore::with_root(fixture.root());

        let config = write_initial_config(&store, &remote, &context, &selection)
            .await
            .unwrap();

        assert_eq!(config.skills["flutter"].git_ref(), "flutter-v1.0.0");
        assert_eq!(config.skills["dart"].git_ref(), "dart-v1.1.0");
        assert!(!config.skills["flutter"].is_excluded("bloc-state-management"));
        assert!(config.skills["flutter"].is_excluded("riverpod-state-management"));

        let text = fixture.read(".skillsrc").unwrap();
        assert!(text.starts_with(INIT_HEADER));
        assert_eq!(store.load().unwrap(), Some(config));
    }
}
