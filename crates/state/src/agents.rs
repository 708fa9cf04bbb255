//! Supported AI agents and where each one expects skills and rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An AI agent whose project directory can receive synced skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    Cursor,
    Trae,
    Claude,
    Copilot,
    Antigravity,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "opencode")]
    OpenCode,
    Gemini,
    Roo,
    Windsurf,
}

/// Static layout information for an [`Agent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentDefinition {
    /// Display name used in prompts and summaries.
    pub name: &'static str,
    /// Project-relative directory that receives `<category>/<skill>/` trees.
    pub skills_path: &'static str,
    /// Project-relative directory that receives the bridge rule file.
    pub rule_dir: &'static str,
    /// Files or directories whose presence indicates the agent is in use.
    pub detection_files: &'static [&'static str],
}

impl Agent {
    /// Every supported agent, in catalog order.
    pub const ALL: [Agent; 10] = [
        Agent::Cursor,
        Agent::Trae,
        Agent::Claude,
        Agent::Copilot,
        Agent::Antigravity,
        Agent::OpenAi,
        Agent::OpenCode,
        Agent::Gemini,
        Agent::Roo,
        Agent::Windsurf,
    ];

    /// Identifier as written in `.skillsrc`.
    pub fn as_str(self) -> &'static str {
        match self {
            Agent::Cursor => "cursor",
            Agent::Trae => "trae",
            Agent::Claude => "claude",
            Agent::Copilot => "copilot",
            Agent::Antigravity => "antigravity",
            Agent::OpenAi => "openai",
            Agent::OpenCode => "opencode",
            Agent::Gemini => "gemini",
            Agent::Roo => "roo",
            Agent::Windsurf => "windsurf",
        }
    }

    pub fn definition(self) -> AgentDefinition {
        match self {
            Agent::Cursor => AgentDefinition {
                name: "Cursor",
                skills_path: ".cursor/skills",
                rule_dir: ".cursor/rules",
                detection_files: &[".cursor", ".cursorrules"],
            },
            Agent::Trae => AgentDefinition {
                name: "Trae",
                skills_path: ".trae/skills",
                rule_dir: ".trae/rules",
                detection_files: &[".trae"],
            },
            Agent::Claude => AgentDefinition {
                name: "Claude Code",
                skills_path: ".claude/skills",
                rule_dir: ".claude/rules",
                detection_files: &[".claude", "CLAUDE.md"],
            },
            Agent::Copilot => AgentDefinition {
                name: "GitHub Copilot",
                skills_path: ".github/skills",
                rule_dir: ".github/instructions",
                detection_files: &[".github"],
            },
            Agent::Antigravity => AgentDefinition {
                name: "Antigravity",
                skills_path: ".agent/skills",
                rule_dir: ".agent/rules",
                detection_files: &[".agent"],
            },
            Agent::OpenAi => AgentDefinition {
                name: "OpenAI",
                skills_path: ".codex/skills",
                rule_dir: ".codex/rules",
                detection_files: &[".codex"],
            },
            Agent::OpenCode => AgentDefinition {
                name: "OpenCode",
                skills_path: ".opencode/skills",
                rule_dir: ".opencode/rules",
                detection_files: &[".opencode"],
            },
            Agent::Gemini => AgentDefinition {
                name: "Gemini",
                skills_path: ".gemini/skills",
                rule_dir: ".gemini/rules",
                detection_files: &[".gemini"],
            },
            Agent::Roo => AgentDefinition {
                name: "Roo Code",
                skills_path: ".roo/skills",
                rule_dir: ".roo/rules",
                detection_files: &[".roo"],
            },
            Agent::Windsurf => AgentDefinition {
                name: "Windsurf",
                skills_path: ".windsurf/skills",
                rule_dir: ".windsurf/rules",
                detection_files: &[".windsurf", ".windsurfrules"],
            },
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Agent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Agent::ALL
            .into_iter()
            .find(|agent| agent.as_str() == needle)
            .ok_or_else(|| format!("unknown agent '{}'", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_ids_case_insensitively() {
        assert_eq!("Cursor".parse::<Agent>().unwrap(), Agent::Cursor);
        assert_eq!(" openai ".parse::<Agent>().unwrap(), Agent::OpenAi);
        assert!("vim".parse::<Agent>().is_err());
    }

    #[test]
    fn serde_names_match_display() {
        for agent in Agent::ALL {
            let yaml = serde_yaml::to_string(&agent).unwrap();
            assert_eq!(yaml.trim(), agent.as_str());
        }
    }

    #[test]
    fn every_agent_has_distinct_skills_path() {
        let mut paths: Vec<_> = Agent::ALL
            .iter()
            .map(|a| a.definition().skills_path)
            .collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), Agent::ALL.len());
    }
}
