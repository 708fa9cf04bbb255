//! Common types for skill validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Severity {
    /// Fails validation.
    Error,
    /// Reported but does not fail validation.
    Warning,
    /// Suggestion for improvement.
    Info,
}

/// A single validation issue found in a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Line number in the file (1-indexed), if applicable.
    pub line: Option<usize>,
    /// Suggested fix, if available.
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            line: None,
            suggestion: None,
        }
    }

    /// Create an error-level issue.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning-level issue.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create an info-level issue.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Add a line number to the issue.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add a suggested fix to the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of validating a single SKILL.md.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Path to the skill file, relative to the repository root when known.
    pub path: PathBuf,
    /// Issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new validation result with no issues.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            issues: Vec::new(),
        }
    }

    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// True when no error-level issue was found.
    pub fn passed(&self) -> bool {
        !self.has_errors()
    }

    /// Returns true if there are any error-level issues.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Returns the number of error-level issues.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Returns the number of warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .count()
    }
}

/// Summary of validation results.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl ValidationSummary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut summary = ValidationSummary {
            total: results.len(),
            ..Default::default()
        };

        for result in results {
            if result.passed() {
                summary.passed += 1;
            } else {
                summary.failed += 1;
            }
            summary.warnings += result.warning_count();
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_fail_a_result() {
        let mut result = ValidationResult::new("skills/a/b/SKILL.md".into());
        result.add_issue(ValidationIssue::warning("style"));
        assert!(result.passed());
        result.add_issue(ValidationIssue::error("missing name").with_line(2));
        assert!(!result.passed());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn summary_counts_passed_and_failed() {
        let ok = ValidationResult::new("a".into());
        let mut bad = ValidationResult::new("b".into());
        bad.add_issue(ValidationIssue::error("x"));
        bad.add_issue(ValidationIssue::warning("y"));

        let summary = ValidationSummary::from_results(&[ok, bad]);
        assert_eq!(
            summary,
            ValidationSummary {
                total: 2,
                passed: 1,
                failed: 1,
                warnings: 1,
            }
        );
    }

    #[test]
    fn issue_display_includes_line() {
        let issue = ValidationIssue::error("Missing priority section").with_line(7);
        assert_eq!(issue.to_string(), "line 7: Missing priority section");
    }
}
