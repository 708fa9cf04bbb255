//! Sync reporting types for tracking what was synced and what was skipped.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reasons why an item was skipped during sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SkipReason {
    /// Target path lies under a `custom_overrides` entry
    Overridden { path: PathBuf },
    /// Target path would escape the skill directory
    UnsafePath { path: PathBuf },
    /// Absolute include names a skill the registry doesn't have
    MissingInclude { category: String, include: String },
    /// Tree listing for the category could not be fetched
    CategoryUnavailable { category: String, git_ref: String },
}

impl SkipReason {
    /// Returns a human-readable description of the skip reason.
    pub fn description(&self) -> String {
        match self {
            Self::Overridden { path } => format!("Skipping overridden: {}", path.display()),
            Self::UnsafePath { path } => format!("Security Error: Invalid path {}", path.display()),
            Self::MissingInclude { include, .. } => {
                format!("Absolute include {} not found in repository", include)
            }
            Self::CategoryUnavailable { category, git_ref } => {
                format!("Failed to fetch {}@{}", category, git_ref)
            }
        }
    }

    /// Returns actionable guidance for the user.
    pub fn guidance(&self) -> Option<&str> {
        match self {
            Self::Overridden { .. } => Some("Intentional override, no action needed"),
            Self::UnsafePath { .. } => {
                Some("Report the offending file to the registry maintainers")
            }
            Self::MissingInclude { .. } => Some("Fix the include entry in .skillsrc or remove it"),
            Self::CategoryUnavailable { .. } => {
                Some("Check the category ref exists, or set GITHUB_TOKEN if rate limited")
            }
        }
    }
}

/// Report for a write operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteReport {
    /// Number of files successfully written
    pub written: usize,
    /// Items that were skipped with reasons
    pub skipped: Vec<SkipReason>,
    /// Non-fatal warnings
    pub warnings: Vec<String>,
}

impl WriteReport {
    /// Folds another report into this one.
    pub fn merge(&mut self, other: WriteReport) {
        self.written += other.written;
        self.skipped.extend(other.skipped);
        self.warnings.extend(other.warnings);
    }
}

/// A category whose registry release is newer than its configured ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAvailable {
    pub category: String,
    pub current: String,
    pub latest: String,
}

/// Complete report of one sync run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Skill ids re-enabled by dependency reconciliation, per category.
    pub reenabled: Vec<(String, Vec<String>)>,
    /// Categories with a newer release in the registry.
    pub updates: Vec<UpdateAvailable>,
    /// `category/skill` ids that were fetched.
    pub skills: Vec<String>,
    /// Files written, plus everything skipped while resolving or writing.
    pub files: WriteReport,
    /// Rows written to the shared index, if it was updated.
    pub indexed: Option<usize>,
}

impl SyncReport {
    /// Returns total items skipped.
    pub fn total_skipped(&self) -> usize {
        self.files.skipped.len()
    }

    /// Generates a formatted summary for display.
    pub fn format_summary(&self, registry: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("Sync Complete: {}\n", registry));
        for (category, ids) in &self.reenabled {
            let ids = ids.join(", ");
            out.push_str(&format!("  Re-enabled:  [{ids}] in '{category}'\n"));
        }
        for update in &self.updates {
            out.push_str(&format!(
                "  Update:      {} {} -> {}\n",
                update.category, update.current, update.latest
            ));
        }
        out.push_str(&format!(
            "  Skills:      {} fetched, {} files written, {} skipped\n",
            self.skills.len(),
            self.files.written,
            self.total_skipped()
        ));
        let index = match self.indexed {
            Some(rows) => format!("AGENTS.md updated ({rows} skills)"),
            None => "not updated".to_string(),
        };
        out.push_str(&format!("  Index:       {index}\n"));
        out
    }
}
