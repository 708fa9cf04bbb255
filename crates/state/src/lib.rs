//! Project configuration state for skillsrc.
//!
//! This crate provides:
//! - The `.skillsrc` document model ([`SkillConfig`], [`CategoryEntry`]).
//! - The supported agent catalog ([`Agent`]) with per-agent target layout.
//! - Loading, validation, and persistence through the [`ConfigStore`] seam.
//! - Environment variable helpers used by the remote clients.
//!
//! # Examples
//!
//! ```
//! use skillsrc_state::{ConfigStore, MemoryConfigStore, SkillConfig, DEFAULT_REF};
//!
//! let config = SkillConfig::parse(
//!     "registry: https://github.com/o/r\nskills:\n  flutter: {}\n",
//! )
//! .unwrap();
//! assert_eq!(config.skills["flutter"].git_ref(), DEFAULT_REF);
//!
//! let store = MemoryConfigStore::default();
//! assert!(store.load().unwrap().is_none());
//! store.save(&config).unwrap();
//! assert_eq!(store.load().unwrap(), Some(config));
//! ```

#![deny(unsafe_code)]

pub mod agents;
pub mod config;
pub mod env;
pub mod store;

pub use agents::{Agent, AgentDefinition};
pub use config::{
    CategoryEntry, ConfigError, SkillConfig, CONFIG_FILE_NAME, DEFAULT_REF, DEFAULT_REGISTRY,
    INIT_HEADER,
};
pub use env::{download_concurrency, feedback_api_url, github_token, DEFAULT_CONCURRENCY};
pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore};
