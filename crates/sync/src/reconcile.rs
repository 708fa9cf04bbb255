//! Keeps a category's `exclude` list in step with the project's dependencies.
//!
//! Skills whose detection rule matches nothing are excluded at `init`; skills
//! that were excluded but whose rule now matches are re-enabled at sync.

use skillsrc_discovery::{detection_rules, DependencySet};
use skillsrc_state::SkillConfig;

/// Adds every rule of `category` that matches no dependency to its `exclude`.
///
/// Existing exclusions are kept. The field is only written when the
/// resulting list is non-empty. Unknown categories are left alone.
pub fn apply_exclusions(config: &mut SkillConfig, category: &str, deps: &DependencySet) {
    let Some(entry) = config.skills.get_mut(category) else {
        return;
    };
    let mut exclude = entry.exclude.take().unwrap_or_default();
    for rule in detection_rules(category) {
        if !rule.is_satisfied_by(deps) && !exclude.iter().any(|id| id == rule.id) {
            exclude.push(rule.id.to_string());
        }
    }
    entry.exclude = (!exclude.is_empty()).then_some(exclude);
}

/// Removes excluded ids whose rule is now satisfied and returns them.
///
/// An `exclude` list emptied this way is removed from the entry.
pub fn reconcile_dependencies(
    config: &mut SkillConfig,
    category: &str,
    deps: &DependencySet,
) -> Vec<String> {
    let Some(entry) = config.skills.get_mut(category) else {
        return Vec::new();
    };
    let Some(exclude) = entry.exclude.as_mut() else {
        return Vec::new();
    };

    let rules = detection_rules(category);
    let mut reenabled = Vec::new();
    exclude.retain(|id| {
        let satisfied = rules
            .iter()
            .any(|rule| rule.id == id.as_str() && rule.is_satisfied_by(deps));
        if satisfied {
            reenabled.push(id.clone());
        }
        !satisfied
    });
    if exclude.is_empty() {
        entry.exclude = None;
    }
    reenabled
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillsrc_state::CategoryEntry;

    fn deps(names: &[&str]) -> DependencySet {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn config() -> SkillConfig {
        let mut config = SkillConfig::new("https://github.com/o/r");
        config
            .skills
            .insert("flutter".into(), CategoryEntry::at_ref("main"));
        config
    }

    #[test]
    fn unmatched_rules_are_excluded() {
        let mut config = config();
        apply_exclusions(&mut config, "flutter", &deps(&["flutter", "flutter_bloc"]));
        let exclude = config.skills["flutter"].exclude.clone().unwrap();
        assert!(exclude.contains(&"riverpod-state-management".to_string()));
        assert!(exclude.contains(&"getx-navigation".to_string()));
        assert!(!exclude.contains(&"bloc-state-management".to_string()));
        assert!(!exclude.contains(&"navigator-v1-navigation".to_string()));
    }

    #[test]
    fn existing_exclusions_are_kept() {
        let mut config = config();
        config.skills["flutter"].exclude = Some(vec!["custom".into()]);
        apply_exclusions(&mut config, "flutter", &deps(&["flutter"]));
        let exclude = config.skills["flutter"].exclude.clone().unwrap();
        assert_eq!(exclude[0], "custom");
    }

    #[test]
    fn category_without_rules_gets_no_exclude() {
        let mut config = config();
        config
            .skills
            .insert("dart".into(), CategoryEntry::default());
        apply_exclusions(&mut config, "dart", &deps(&[]));
        assert_eq!(config.skills["dart"].exclude, None);
    }

    #[test]
    fn exclusion_round_trips_through_reenable() {
        let mut config = config();
        apply_exclusions(&mut config, "flutter", &deps(&["flutter"]));
        assert!(config.skills["flutter"].is_excluded("bloc-state-management"));

        let reenabled =
            reconcile_dependencies(&mut config, "flutter", &deps(&["flutter", "flutter_bloc"]));
        assert_eq!(reenabled, vec!["bloc-state-management"]);
        assert!(!config.skills["flutter"].is_excluded("bloc-state-management"));
        assert!(config.skills["flutter"].is_excluded("go-router-navigation"));
    }

    #[test]
    fn emptied_exclude_is_removed() {
        let mut config = config();
        config.skills["flutter"].exclude = Some(vec!["bloc-state-management".into()]);
        let reenabled = reconcile_dependencies(&mut config, "flutter", &deps(&["bloc"]));
        assert_eq!(reenabled, vec!["bloc-state-management"]);
        assert_eq!(config.skills["flutter"].exclude, None);
    }

    #[test]
    fn nothing_to_reconcile() {
        let mut config = config();
        let bloc = deps(&["bloc"]);
        assert!(reconcile_dependencies(&mut config, "flutter", &bloc).is_empty());
        assert!(reconcile_dependencies(&mut config, "missing", &bloc).is_empty());

        config.skills["flutter"].exclude = Some(vec!["custom-skill".into()]);
        assert!(reconcile_dependencies(&mut config, "flutter", &bloc).is_empty());
        assert_eq!(
            config.skills["flutter"].exclude,
            Some(vec!["custom-skill".to_string()])
        );
    }
}
