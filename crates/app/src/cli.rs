use clap::{Args, Parser, Subcommand};
use skillsrc_discovery::Framework;
use skillsrc_state::Agent;
use std::path::PathBuf;

/// Command-line interface for the `skillsrc` application.
#[derive(Debug, Parser)]
#[command(
    name = "skillsrc",
    version,
    about = "Syncs agent skills from a hosted registry into your project"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available `skillsrc` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detects the project's stack and writes a starter `.skillsrc`.
    Init {
        /// Framework category to configure instead of prompting.
        #[arg(long, value_parser = parse_framework)]
        framework: Option<Framework>,
        /// Comma-separated agents to target instead of prompting.
        #[arg(long, value_delimiter = ',', value_parser = parse_agent)]
        agents: Option<Vec<Agent>>,
        /// Registry URL instead of prompting.
        #[arg(long, value_name = "URL")]
        registry: Option<String>,
        /// Accept detected defaults and overwrite an existing `.skillsrc`.
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
    /// Fetches configured skills into every agent folder and refreshes AGENTS.md.
    Sync,
    /// Lists a framework's skills and whether the project needs them.
    ListSkills {
        /// Framework category to list instead of prompting.
        #[arg(long, value_parser = parse_framework)]
        framework: Option<Framework>,
    },
    /// Lints SKILL.md files and registry metadata.
    Validate {
        /// Validate every skill instead of only changed ones.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Regenerates the registry's `index.json` from its skills.
    GenerateIndex {
        /// Skills directory to index.
        #[arg(long, value_name = "DIR", default_value = "skills")]
        skills_dir: PathBuf,
    },
    /// Reports a problem with a skill to the feedback service.
    Feedback(FeedbackArgs),
    /// Checks for a newer skillsrc release and installs it.
    Upgrade {
        /// Only report whether an upgrade is available.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

/// Arguments of the `feedback` command.
#[derive(Debug, Clone, Default, Args)]
pub struct FeedbackArgs {
    /// Skill id with the issue, e.g. `flutter/bloc-state-management`.
    #[arg(long)]
    pub skill: Option<String>,
    /// Brief description of the issue.
    #[arg(long)]
    pub issue: Option<String>,
    /// AI model that used the skill.
    #[arg(long)]
    pub model: Option<String>,
    /// Extra context such as framework versions.
    #[arg(long)]
    pub context: Option<String>,
    /// Suggested improvement.
    #[arg(long)]
    pub suggestion: Option<String>,
    /// Exact quote from the skill.
    #[arg(long)]
    pub skill_instruction: Option<String>,
    /// What was done instead of the instruction.
    #[arg(long)]
    pub actual_action: Option<String>,
    /// Why that approach was chosen.
    #[arg(long)]
    pub decision_reason: Option<String>,
    /// Comma-separated list of active skills.
    #[arg(long)]
    pub loaded_skills: Option<String>,
    /// Feedback service endpoint.
    #[arg(
        long,
        value_name = "URL",
        env = "FEEDBACK_API_URL",
        hide_env_values = true
    )]
    pub api_url: Option<String>,
}

fn parse_framework(s: &str) -> Result<Framework, String> {
    s.parse()
}

fn parse_agent(s: &str) -> Result<Agent, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn init_accepts_comma_separated_agents() {
        let cli = Cli::parse_from([
            "skillsrc",
            "init",
            "--framework",
            "flutter",
            "--agents",
            "cursor,claude",
            "--yes",
        ]);
        match cli.command {
            Commands::Init {
                framework,
                agents,
                registry,
                yes,
            } => {
                assert_eq!(framework, Some(Framework::Flutter));
                assert_eq!(agents, Some(vec![Agent::Cursor, Agent::Claude]));
                assert_eq!(registry, None);
                assert!(yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_agent_is_rejected() {
        let args = ["skillsrc", "init", "--agents", "cursor,emacs"];
        let err = Cli::try_parse_from(args).unwrap_err();
        assert!(err.to_string().contains("unknown agent 'emacs'"));
    }

    #[test]
    fn generate_index_defaults_to_skills_dir() {
        let cli = Cli::parse_from(["skillsrc", "generate-index"]);
        assert!(matches!(
            cli.command,
            Commands::GenerateIndex { skills_dir } if skills_dir.as_path() == Path::new("skills")
        ));
    }

    #[test]
    fn feedback_flags_are_kebab_case() {
        let cli = Cli::parse_from([
            "skillsrc",
            "feedback",
            "--skill",
            "flutter/bloc",
            "--issue",
            "wrong import",
            "--skill-instruction",
            "use Cubit",
        ]);
        let Commands::Feedback(args) = cli.command else {
            panic!("expected feedback");
        };
        assert_eq!(args.skill.as_deref(), Some("flutter/bloc"));
        assert_eq!(args.skill_instruction.as_deref(), Some("use Cubit"));
        assert_eq!(args.model, None);
    }
}
