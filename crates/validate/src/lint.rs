//! Content and layout checks for a single skill.

use crate::common::{ValidationIssue, ValidationResult};
use crate::frontmatter::{parse_frontmatter, PRIORITY_HEADING};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Longest SKILL.md accepted, in lines.
pub const MAX_SKILL_LINES: usize = 500;

/// Longest frontmatter description accepted, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Extensions expected for files under `scripts/`.
pub const SCRIPT_EXTENSIONS: &[&str] = &["py", "js", "ts", "sh"];

// Bullets or numbered items opening with a conversational phrase.
static CONVERSATIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\s*[-*+]\s*|\s*\d+\.\s*)(?:you should|please|let's|we can|i recommend)")
        .expect("valid regex")
});

/// Checks the text of a SKILL.md.
pub fn lint_skill_content(content: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    check_content(content, &mut issues);
    issues
}

// Returns false when the frontmatter is missing or unparseable.
fn check_content(content: &str, issues: &mut Vec<ValidationIssue>) -> bool {
    let line_count = content.split('\n').count();
    if line_count > MAX_SKILL_LINES {
        issues.push(ValidationIssue::error(format!(
            "SKILL.md too large ({line_count} lines > {MAX_SKILL_LINES} limit)"
        )));
    }

    let parsed = match parse_frontmatter(content) {
        Ok(parsed) => parsed,
        Err(e) => {
            issues.push(ValidationIssue::error(e).with_line(1));
            return false;
        }
    };
    let Some(frontmatter) = parsed.frontmatter else {
        issues.push(
            ValidationIssue::error("Missing or invalid frontmatter")
                .with_line(1)
                .with_suggestion("Start the file with a '---' delimited YAML block"),
        );
        return false;
    };

    let name = frontmatter.name.as_deref().unwrap_or_default();
    if name.trim().is_empty() {
        issues.push(ValidationIssue::error(
            "Missing \"name\" field in frontmatter",
        ));
    }

    match frontmatter.description.as_deref() {
        None => issues.push(ValidationIssue::error(
            "Missing \"description\" field in frontmatter",
        )),
        Some(desc) => {
            let chars = desc.chars().count();
            if chars > MAX_DESCRIPTION_CHARS {
                issues.push(ValidationIssue::error(format!(
                    "Description too long ({chars} chars > {MAX_DESCRIPTION_CHARS} limit)"
                )));
            }
        }
    }

    if let Some(offset) = conversational_line(&parsed.content) {
        issues.push(
            ValidationIssue::warning(
                "Consider using imperative mood instead of conversational style in instructions",
            )
            .with_line(parsed.content_start_line + offset),
        );
    }

    if !parsed.content.contains(PRIORITY_HEADING) {
        issues.push(
            ValidationIssue::error("Missing priority section")
                .with_suggestion(format!("Add a '{PRIORITY_HEADING} P1**' heading")),
        );
    }

    true
}

/// Zero-based index of the first conversational list item outside code fences.
fn conversational_line(body: &str) -> Option<usize> {
    let mut in_code_block = false;
    for (idx, line) in body.split('\n').enumerate() {
        if line.trim().starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }
        if !in_code_block && CONVERSATIONAL_REGEX.is_match(line) {
            return Some(idx);
        }
    }
    None
}

/// Checks the `scripts/` and `references/` folders next to a SKILL.md.
pub fn lint_skill_dir(skill_dir: &Path) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for name in dir_entries(&skill_dir.join("scripts")) {
        let ext = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if !SCRIPT_EXTENSIONS.contains(&ext) {
            issues.push(ValidationIssue::warning(format!(
                "Script without standard extension: {name}"
            )));
        }
    }

    let refs_dir = skill_dir.join("references");
    if refs_dir.is_dir() && !dir_entries(&refs_dir).iter().any(|f| f.ends_with(".md")) {
        issues.push(ValidationIssue::warning(
            "References directory exists but contains no .md files",
        ));
    }

    issues
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Validates one SKILL.md on disk; `root` is used to report a relative path.
pub fn validate_skill_file(root: &Path, path: &Path) -> ValidationResult {
    let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    let mut result = ValidationResult::new(relative);

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            result.add_issue(ValidationIssue::error(format!(
                "Failed to read or validate file: {e}"
            )));
            return result;
        }
    };

    if check_content(&content, &mut result.issues) {
        if let Some(dir) = path.parent() {
            result.issues.extend(lint_skill_dir(dir));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Severity;
    use proptest::prelude::*;
    use skillsrc_test_utils::{skill_markdown, ProjectFixture};

    fn errors(issues: &[ValidationIssue]) -> Vec<&str> {
        issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.message.as_str())
            .collect()
    }

    #[test]
    fn well_formed_skill_has_no_issues() {
        let issues = lint_skill_content(&skill_markdown("bloc", "BLoC patterns", "P0"));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn missing_frontmatter_stops_further_checks() {
        let issues = lint_skill_content("# Title\n\nNo priority here");
        assert_eq!(errors(&issues), vec!["Missing or invalid frontmatter"]);
    }

    #[test]
    fn required_fields_are_reported() {
        let issues = lint_skill_content("---\nversion: 1\n---\n# T\n");
        assert_eq!(
            errors(&issues),
            vec![
                "Missing \"name\" field in frontmatter",
                "Missing \"description\" field in frontmatter",
                "Missing priority section",
            ]
        );
    }

    #[test]
    fn long_description_and_file_are_errors() {
        let desc = "d".repeat(201);
        let mut content = skill_markdown("x", &desc, "P1");
        content.push_str(&"line\n".repeat(MAX_SKILL_LINES));
        let issues = lint_skill_content(&content);
        let errs = errors(&issues);
        assert!(errs.iter().any(|e| e.starts_with("SKILL.md too large")));
        assert!(errs.contains(&"Description too long (201 chars > 200 limit)"));
    }

    #[test]
    fn conversational_bullets_warn_outside_code_fences() {
        let fenced = "---\nname: a\ndescription: b\n---\n## **Priority: P1**\n\
                      ```\n- please run this\n```\n";
        assert!(lint_skill_content(fenced).is_empty());

        let chatty = "---\nname: a\ndescription: b\n---\n## **Priority: P1**\n\n\
                      1. You should prefer const\n";
        let issues = lint_skill_content(chatty);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].line, Some(7));
    }

    #[test]
    fn skill_dir_layout_warnings() {
        let project = ProjectFixture::new().unwrap();
        project
            .create_skill("flutter", "bloc", "BLoC patterns", "P1")
            .unwrap();
        let bloc = project.root().join("skills/flutter/bloc");
        fs::create_dir_all(bloc.join("scripts")).unwrap();
        fs::create_dir_all(bloc.join("references")).unwrap();
        fs::write(bloc.join("scripts/gen.py"), "").unwrap();
        fs::write(bloc.join("scripts/run.rb"), "").unwrap();
        fs::write(bloc.join("references/notes.txt"), "").unwrap();

        let result = validate_skill_file(project.root(), &bloc.join("SKILL.md"));
        assert!(result.passed());
        assert_eq!(result.path, Path::new("skills/flutter/bloc/SKILL.md"));
        let messages: Vec<_> = result.issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Script without standard extension: run.rb",
                "References directory exists but contains no .md files",
            ]
        );
    }

    proptest! {
        /// Property: anything inside a code fence is never flagged.
        #[test]
        fn fenced_lines_never_flagged(text in "[a-zA-Z' ]{0,40}") {
            let body = format!("```\n- you should {text}\n- please {text}\n```\n");
            prop_assert_eq!(conversational_line(&body), None);
        }
    }
}
