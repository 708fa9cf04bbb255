//! Turns a category's include/exclude settings into the list of skills to fetch.

use crate::remote::{EntryKind, TreeEntry};
use crate::report::SkipReason;
use skillsrc_state::CategoryEntry;

/// Wildcard skill name in an absolute include (`other/*`).
pub const INCLUDE_WILDCARD: &str = "*";

/// Skills selected for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Local skill names followed by absolute `other/skill` ids.
    pub skills: Vec<String>,
    /// Absolute includes that could not be satisfied.
    pub skipped: Vec<SkipReason>,
}

/// Distinct immediate child folders of `skills/<category>/`, in first-seen order.
///
/// A child counts when some entry lies beneath it, or when it is itself
/// listed as a directory.
pub fn skill_folders(tree: &[TreeEntry], category: &str) -> Vec<String> {
    let prefix = format!("skills/{category}/");
    let mut folders: Vec<String> = Vec::new();
    for entry in tree {
        let Some(rest) = entry.path.strip_prefix(&prefix) else {
            continue;
        };
        let (name, nested) = match rest.split_once('/') {
            Some((name, _)) => (name, true),
            None => (rest, false),
        };
        if name.is_empty() || !(nested || entry.kind == EntryKind::Tree) {
            continue;
        }
        if !folders.iter().any(|f| f == name) {
            folders.push(name.to_string());
        }
    }
    folders
}

fn skill_exists(tree: &[TreeEntry], category: &str, skill: &str) -> bool {
    let prefix = format!("skills/{category}/{skill}/");
    tree.iter().any(|e| e.path.starts_with(&prefix))
}

/// Applies the entry's filters to the category's folders, then appends
/// absolute includes from other categories.
///
/// `include` and `exclude` only ever match local folder names; entries
/// containing `/` bypass the filter.
pub fn resolve_skills(category: &str, entry: &CategoryEntry, tree: &[TreeEntry]) -> Resolution {
    let mut skills: Vec<String> = skill_folders(tree, category)
        .into_iter()
        .filter(|folder| {
            entry
                .include
                .as_ref()
                .is_none_or(|include| include.iter().any(|i| i == folder))
        })
        .filter(|folder| !entry.is_excluded(folder))
        .collect();

    let mut skipped = Vec::new();
    let absolute = entry.include.iter().flatten().filter(|i| i.contains('/'));
    for include in absolute {
        let Some((other, skill)) = include.split_once('/') else {
            continue;
        };
        if other.is_empty() || skill.is_empty() {
            continue;
        }

        if skill == INCLUDE_WILDCARD {
            for name in skill_folders(tree, other) {
                let id = format!("{other}/{name}");
                if !skills.contains(&id) {
                    skills.push(id);
                }
            }
        } else if !skills.contains(include) {
            if skill_exists(tree, other, skill) {
                skills.push(include.clone());
            } else {
                tracing::warn!(category, %include, "Absolute include not found");
                skipped.push(SkipReason::MissingInclude {
                    category: category.to_string(),
                    include: include.clone(),
                });
            }
        }
    }

    Resolution { skills, skipped }
}
