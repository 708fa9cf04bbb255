//! Detects what a project is built with.
//!
//! This crate provides:
//! - The supported framework catalog ([`Framework`]).
//! - The per-category skill detection rules ([`DetectionRule`]).
//! - Dependency extraction from package manifests ([`project_dependencies`]).
//! - Framework, language, and agent detection from marker files.
//!
//! # Examples
//!
//! ```
//! use skillsrc_discovery::{detection_rules, project_dependencies};
//! use tempfile::tempdir;
//!
//! let temp = tempdir().unwrap();
//! std::fs::write(
//!     temp.path().join("pubspec.yaml"),
//!     "dependencies:\n  flutter:\n    sdk: flutter\n  flutter_bloc: ^8.1.0\n",
//! )
//! .unwrap();
//!
//! let deps = project_dependencies(temp.path());
//! assert!(deps.contains("flutter_bloc"));
//!
//! let bloc = detection_rules("flutter")
//!     .iter()
//!     .find(|rule| rule.id == "bloc-state-management")
//!     .unwrap();
//! assert!(bloc.is_satisfied_by(&deps));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Supported frameworks and their marker files.
pub mod catalog;
/// Manifest parsers producing the project's dependency names.
pub mod dependencies;
/// Marker-file based detection of frameworks, languages, and agents.
pub mod detect;
/// Rules mapping registry skills to the packages that indicate them.
pub mod rules;
/// Bounded-depth directory traversal.
pub mod scan;

pub use catalog::{Framework, FrameworkDefinition};
pub use dependencies::{project_dependencies, DependencySet};
pub use detect::{detect_agents, detect_frameworks, detect_languages, ProjectContext};
pub use rules::{detection_rules, package_matches, DetectionRule, SKILL_DETECTION_REGISTRY};
pub use scan::{scan_files, DEFAULT_SKIP_DIRS};
