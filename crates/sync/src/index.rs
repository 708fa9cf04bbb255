//! The compact skills index kept in `AGENTS.md` and the per-agent bridge rules
//! pointing at it.
//!
//! Rows have the form `category/skill|<marker><description>`. Registries ship
//! pre-generated rows per category in `skills/index.json`; the same rows can be
//! generated locally from a skills checkout.

use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use skillsrc_state::Agent;
use skillsrc_validate::{parse_frontmatter, parse_priority, SkillTriggers, DEFAULT_PRIORITY};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Shared index document, relative to the project root.
pub const INDEX_FILE: &str = "AGENTS.md";
pub const INDEX_START_MARKER: &str = "<!-- SKILLS_INDEX_START -->";
pub const INDEX_END_MARKER: &str = "<!-- SKILLS_INDEX_END -->";

/// Registry path of the pre-generated per-category rows.
pub const INDEX_FRAGMENTS_PATH: &str = "skills/index.json";

/// Descriptions longer than this are truncated in index rows.
pub const MAX_INDEX_DESCRIPTION_CHARS: usize = 12;

const TRUNCATION_MARK: char = '…';
const CRITICAL_MARKER: &str = "🚨";

const BRIDGE_FILE_STEM: &str = "agent-skill-standard-rule";
const BRIDGE_DESCRIPTION: &str = "Rule for Agent Skills Standard - Always consult AGENTS.md \
    for consolidated project context and technical triggers.";
const BRIDGE_BODY: &[&str] = &[
    "# 🛠 Agent Skills Standard",
    "",
    "This project uses a modular skills library for specialized engineering tasks.",
    "",
    "> [!IMPORTANT]",
    "> ALWAYS consult the consolidated index in **AGENTS.md** to identify relevant triggers \
     before acting.",
    "",
    "The `AGENTS.md` file contains mapping between project files and the specific agent skills \
     located in the respective agent-specific folders (e.g., `.cursor/skills`, `.claude/skills`).",
];

/// What the index needs to know about one skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMetadata {
    pub name: String,
    pub description: String,
    /// e.g. `P0 (CRITICAL)`; [`DEFAULT_PRIORITY`] when the body has none.
    pub priority: String,
    pub triggers: SkillTriggers,
}

/// Reads index metadata from a SKILL.md document.
///
/// Returns `None` when the document has no frontmatter or it is not valid YAML.
pub fn parse_skill_metadata(content: &str) -> Option<SkillMetadata> {
    let parsed = parse_frontmatter(content).ok()?;
    let frontmatter = parsed.frontmatter?;
    Some(SkillMetadata {
        triggers: frontmatter.triggers(),
        name: frontmatter.name.unwrap_or_default(),
        description: frontmatter.description.unwrap_or_default(),
        priority: parse_priority(&parsed.content).unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
    })
}

/// Shortens a description to the index column width.
///
/// ```
/// use skillsrc_sync::index::truncate_description;
///
/// assert_eq!(truncate_description("Twelve chars"), "Twelve chars");
/// assert_eq!(truncate_description("Thirteen char"), "Thirteen ch…");
/// ```
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() > MAX_INDEX_DESCRIPTION_CHARS {
        let mut short: String = description
            .chars()
            .take(MAX_INDEX_DESCRIPTION_CHARS - 1)
            .collect();
        short.push(TRUNCATION_MARK);
        short
    } else {
        description.to_string()
    }
}

/// One index row.
pub fn format_entry(category: &str, skill: &str, metadata: &SkillMetadata) -> String {
    let marker = if metadata.priority.starts_with("P0") {
        CRITICAL_MARKER
    } else {
        ""
    };
    format!(
        "{category}/{skill}|{marker}{}",
        truncate_description(&metadata.description)
    )
}

/// Wraps rows in the index table header.
pub fn assemble_index(entries: &[String]) -> String {
    let header = [
        "# Index",
        "Retrieval-led reasoning required.",
        "ID|Desc",
        ":--|:--",
    ]
    .join("\n");
    format!("{header}\n{}\n", entries.join("\n"))
}

/// The skill id of a row: its first non-empty pipe-delimited cell.
///
/// Accepts both compact rows and table rows with outer pipes.
pub fn row_id(row: &str) -> Option<&str> {
    row.split('|').map(str::trim).find(|cell| !cell.is_empty())
}

/// Non-empty rows of `fragment` whose id is in `synced`.
///
/// Every row is kept when `synced` is `None`.
pub fn filter_rows(fragment: &str, synced: Option<&HashSet<String>>) -> Vec<String> {
    fragment
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| match synced {
            Some(ids) => row_id(line).is_some_and(|id| ids.contains(id)),
            None => true,
        })
        .map(str::to_string)
        .collect()
}

/// Replaces the marked block of `existing`, or appends one.
pub fn splice_index(existing: Option<&str>, index: &str) -> String {
    let block = format!("{INDEX_START_MARKER}\n{index}\n{INDEX_END_MARKER}");
    let Some(existing) = existing else {
        return format!("{block}\n");
    };

    let start = existing.find(INDEX_START_MARKER);
    let end = existing.rfind(INDEX_END_MARKER);
    match (start, end) {
        (Some(start), Some(end)) if end >= start => {
            let tail = &existing[end + INDEX_END_MARKER.len()..];
            format!("{}{block}{tail}", &existing[..start])
        }
        _ => format!("{existing}\n\n{block}\n"),
    }
}

/// Writes `index` into the project's `AGENTS.md`, keeping content outside
/// the markers.
pub fn inject_index(root: &Path, index: &str) -> Result<PathBuf> {
    let path = root.join(INDEX_FILE);
    let existing = if path.is_file() {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Some(text)
    } else {
        None
    };
    let updated = splice_index(existing.as_deref(), index);
    fs::write(&path, updated).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// File name of the bridge rule for `agent`.
pub fn bridge_file_name(agent: Agent) -> String {
    let extension = match agent {
        Agent::Cursor => ".mdc",
        Agent::Copilot => ".instructions.md",
        _ => ".md",
    };
    format!("{BRIDGE_FILE_STEM}{extension}")
}

/// Content of the bridge rule for `agent`.
pub fn bridge_content(agent: Agent) -> String {
    let mut content = String::new();
    let frontmatter: &[&str] = match agent {
        Agent::Cursor | Agent::Antigravity => &["globs: [\"**/*\"]", "alwaysApply: true"],
        Agent::Copilot => &["applyTo: \"**/*\""],
        _ => &[],
    };
    if matches!(agent, Agent::Cursor | Agent::Antigravity | Agent::Copilot) {
        let description = format!("description: {BRIDGE_DESCRIPTION}");
        let mut lines = vec!["---", description.as_str()];
        lines.extend_from_slice(frontmatter);
        lines.extend_from_slice(&["---", "", ""]);
        content.push_str(&lines.join("\n"));
    }
    content.push_str(&BRIDGE_BODY.join("\n"));
    content
}

/// Writes a bridge rule into each agent's rule directory.
pub fn write_bridges(root: &Path, agents: &[Agent]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(agents.len());
    for &agent in agents {
        let dir = root.join(agent.definition().rule_dir);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create rule directory: {}", dir.display()))?;
        let path = dir.join(bridge_file_name(agent));
        fs::write(&path, bridge_content(agent))
            .with_context(|| format!("Failed to write bridge rule: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn sorted_dirs(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(read) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<(String, PathBuf)> = read
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            Some((name, path))
        })
        .collect();
    dirs.sort();
    dirs
}

fn category_rows(category: &str, category_dir: &Path) -> Vec<String> {
    sorted_dirs(category_dir)
        .into_iter()
        .filter_map(|(skill, path)| {
            let content = fs::read_to_string(path.join("SKILL.md")).ok()?;
            let metadata = parse_skill_metadata(&content)?;
            Some(format_entry(category, &skill, &metadata))
        })
        .collect()
}

/// Builds the index table for `common` plus `categories` from a local
/// skills directory.
pub fn generate_local_index(skills_dir: &Path, categories: &[String]) -> String {
    let mut entries = Vec::new();
    let all = std::iter::once("common").chain(categories.iter().map(String::as_str));
    for category in all {
        entries.extend(category_rows(category, &skills_dir.join(category)));
    }
    assemble_index(&entries)
}

/// Rows per category for every category folder of `skills_dir`.
///
/// Hidden folders and categories without indexable skills are left out.
pub fn generate_fragments(skills_dir: &Path) -> BTreeMap<String, String> {
    sorted_dirs(skills_dir)
        .into_iter()
        .filter(|(name, _)| !name.starts_with('.'))
        .filter_map(|(category, path)| {
            let rows = category_rows(&category, &path);
            (!rows.is_empty()).then(|| (category, rows.join("\n")))
        })
        .collect()
}

/// Writes `fragments` to `<skills_dir>/index.json`.
pub fn write_fragments(skills_dir: &Path, fragments: &BTreeMap<String, String>) -> Result<PathBuf> {
    let path = skills_dir.join("index.json");
    let json = serde_json::to_string_pretty(fragments)?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
