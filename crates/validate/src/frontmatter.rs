//! YAML frontmatter parsing for SKILL.md files.
//!
//! Registry skills open with a frontmatter block:
//!
//! ```yaml
//! name: bloc-state-management
//! description: BLoC patterns for Flutter
//! metadata:
//!   triggers:
//!     files: ["**/*_bloc.dart"]
//!     keywords: [bloc, cubit]
//! ```
//!
//! and declare their priority in the body as `## **Priority: P0 (CRITICAL)**`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Priority assumed when a skill body has no priority heading.
pub const DEFAULT_PRIORITY: &str = "P1";

/// Marker every skill body must contain.
pub const PRIORITY_HEADING: &str = "## **Priority:";

static PRIORITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## \*\*Priority:\s*([^*]+)\*\*").expect("valid regex"));

/// File globs and keywords that should make an agent load a skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTriggers {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The `metadata` block of the frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontmatterMetadata {
    #[serde(default)]
    pub triggers: SkillTriggers,
}

/// Frontmatter fields of a SKILL.md. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFrontmatter {
    pub name: Option<String>,
    /// One-line description; the linter caps it at 200 characters.
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<FrontmatterMetadata>,
}

impl SkillFrontmatter {
    /// Trigger globs and keywords, empty when the metadata block is absent.
    pub fn triggers(&self) -> SkillTriggers {
        self.metadata
            .as_ref()
            .map(|m| m.triggers.clone())
            .unwrap_or_default()
    }
}

/// A SKILL.md split into frontmatter and body.
#[derive(Debug, Clone)]
pub struct ParsedSkill {
    pub frontmatter: Option<SkillFrontmatter>,
    /// Markdown after the closing fence.
    pub content: String,
    /// 1-based line on which `content` starts.
    pub content_start_line: usize,
}

const FENCE: &str = "---";

/// Splits `content` at its `---` fences.
///
/// Returns the frontmatter YAML, the body, and the 1-based line the body
/// starts on. Without an opening and a closing fence the whole document is
/// body.
pub fn split_frontmatter(content: &str) -> (Option<String>, String, usize) {
    let mut offset = 0;
    let mut yaml_start = None;
    for (idx, line) in content.split_inclusive('\n').enumerate() {
        let line_end = offset + line.len();
        match yaml_start {
            None if line.trim().is_empty() => {}
            None if line.trim() == FENCE => yaml_start = Some(line_end),
            None => break,
            Some(start) if line.trim_end() == FENCE => {
                let yaml = content[start..offset].trim_end_matches(['\r', '\n']);
                let rest = &content[line_end..];
                let (blank_lines, blank_bytes) = rest
                    .split_inclusive('\n')
                    .take_while(|l| l.trim().is_empty() && l.ends_with('\n'))
                    .fold((0, 0), |(n, bytes), l| (n + 1, bytes + l.len()));
                return (
                    Some(yaml.to_string()),
                    rest[blank_bytes..].to_string(),
                    idx + 2 + blank_lines,
                );
            }
            Some(_) => {}
        }
        offset = line_end;
    }
    (None, content.to_string(), 1)
}

/// Parses the frontmatter of a SKILL.md document.
///
/// A document without frontmatter parses to `frontmatter: None`; malformed
/// YAML is an error.
pub fn parse_frontmatter(content: &str) -> Result<ParsedSkill, String> {
    let (yaml, body, content_start_line) = split_frontmatter(content);
    let frontmatter = yaml
        .map(|yaml| serde_yaml::from_str::<SkillFrontmatter>(&yaml))
        .transpose()
        .map_err(|e| format!("Invalid YAML frontmatter: {e}"))?;
    Ok(ParsedSkill {
        frontmatter,
        content: body,
        content_start_line,
    })
}

/// Extracts the priority label from a skill body, e.g. `P0 (CRITICAL)`.
pub fn parse_priority(body: &str) -> Option<String> {
    PRIORITY_REGEX
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty())
}
