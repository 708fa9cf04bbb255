//! Skill sync for skillsrc.
//!
//! Pulls skill folders from a hosted registry into each agent's project
//! directory, following the categories, refs, and include/exclude rules of
//! `.skillsrc`, then refreshes the shared `AGENTS.md` index.
//!
//! The registry is reached through the [`RemoteRepository`] seam, so the
//! whole pipeline runs against [`MemoryRepository`] as well as GitHub.
//!
//! # Examples
//!
//! ```
//! use skillsrc_state::{Agent, CategoryEntry, MemoryConfigStore, SkillConfig};
//! use skillsrc_sync::{MemoryRepository, SyncService};
//!
//! let remote = MemoryRepository::new()
//!     .with_file("skills/flutter/bloc/SKILL.md", "# bloc")
//!     .with_file("skills/flutter/bloc/README.md", "not synced");
//!
//! let mut config = SkillConfig::new("https://github.com/acme/skills");
//! config.agents = vec![Agent::Claude];
//! config.skills.insert("flutter".into(), CategoryEntry::default());
//!
//! let project = tempfile::tempdir().unwrap();
//! let service = SyncService::new(
//!     project.path(),
//!     remote,
//!     MemoryConfigStore::with_config(config),
//! );
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let report = runtime.block_on(service.run()).unwrap();
//! assert_eq!(report.skills, vec!["flutter/bloc"]);
//! assert_eq!(report.files.written, 1);
//! assert!(project.path().join(".claude/skills/flutter/bloc/SKILL.md").exists());
//! ```

#![deny(unsafe_code)]

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub mod error;
pub mod fetch;
pub mod index;
pub mod orchestrator;
pub mod reconcile;
pub mod registry;
pub mod remote;
pub mod report;
pub mod resolve;
pub mod writer;

pub use error::{RegistryError, VersionError};
pub use fetch::{fetch_skill, select_skill_files, CollectedSkill, SkillFile};
pub use index::{
    assemble_index, format_entry, generate_fragments, generate_local_index, inject_index,
    parse_skill_metadata, write_bridges, write_fragments, SkillMetadata, INDEX_FILE,
};
pub use orchestrator::{AssembledSkills, SyncService};
pub use reconcile::{apply_exclusions, reconcile_dependencies};
pub use registry::{
    discover_registry, framework_skills, skills_with_status, RegistryListing, SkillStatus,
    SkillWithStatus,
};
pub use remote::{
    fetch_files, EntryKind, GitHubRef, GithubClient, MemoryRepository, RemoteRepository,
    TreeEntry,
};
pub use report::{SkipReason, SyncReport, UpdateAvailable, WriteReport};
pub use resolve::{resolve_skills, Resolution};
pub use skillsrc_validate::{CategoryMetadata, RegistryMetadata};
pub use writer::SkillWriter;
