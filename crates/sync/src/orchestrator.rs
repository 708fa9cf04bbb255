//! Sync service that drives one run from `.skillsrc` to files on disk.

use crate::error::{RegistryError, VersionError};
use crate::fetch::{fetch_skill, CollectedSkill};
use crate::index::{assemble_index, filter_rows, inject_index, write_bridges, INDEX_FRAGMENTS_PATH};
use crate::reconcile::reconcile_dependencies;
use crate::registry::METADATA_PATH;
use crate::remote::{GitHubRef, RemoteRepository, TreeEntry};
use crate::report::{SkipReason, SyncReport, UpdateAvailable, WriteReport};
use crate::resolve::resolve_skills;
use crate::writer::SkillWriter;
use crate::Result;
use anyhow::anyhow;
use skillsrc_discovery::{project_dependencies, DependencySet};
use skillsrc_state::{ConfigStore, SkillConfig, CONFIG_FILE_NAME, DEFAULT_CONCURRENCY, DEFAULT_REF};
use skillsrc_validate::RegistryMetadata;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Skills fetched from the registry, and what could not be.
#[derive(Debug, Clone, Default)]
pub struct AssembledSkills {
    pub skills: Vec<CollectedSkill>,
    pub skipped: Vec<SkipReason>,
}

/// Syncs a project's configured skills from its registry.
///
/// The remote, the configuration store, and the project root are supplied
/// by the caller; nothing here reads the working directory.
pub struct SyncService<R: RemoteRepository, S: ConfigStore> {
    root: PathBuf,
    remote: R,
    store: S,
    concurrency: usize,
}

impl<R: RemoteRepository, S: ConfigStore> SyncService<R, S> {
    pub fn new(root: impl Into<PathBuf>, remote: R, store: S) -> Self {
        Self {
            root: root.into(),
            remote,
            store,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets the number of concurrent downloads per skill.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Re-enables excluded skills whose dependencies are now present.
    ///
    /// The configuration is saved only when at least one skill was
    /// re-enabled. Returns the re-enabled ids per category.
    pub fn reconcile_config(
        &self,
        config: &mut SkillConfig,
        deps: &DependencySet,
    ) -> Result<Vec<(String, Vec<String>)>> {
        let categories: Vec<String> = config.skills.keys().cloned().collect();
        let mut changes = Vec::new();
        for category in categories {
            let reenabled = reconcile_dependencies(config, &category, deps);
            if !reenabled.is_empty() {
                tracing::info!(
                    "Dynamic re-detection: re-enabling [{}] in '{}' category",
                    reenabled.join(", "),
                    category
                );
                changes.push((category, reenabled));
            }
        }
        if !changes.is_empty() {
            self.store.save(config)?;
        }
        Ok(changes)
    }

    /// Compares each category's pinned release with the registry's metadata.
    ///
    /// Categories tracking a branch, or without release metadata, are not
    /// checked.
    pub async fn check_for_updates(&self, config: &SkillConfig) -> Result<Vec<UpdateAvailable>> {
        let repo = registry_repo(config)?;
        let remote = &self.remote;
        let Some(text) = remote.raw_file(&repo, DEFAULT_REF, METADATA_PATH).await else {
            tracing::debug!("Registry has no release metadata");
            return Ok(Vec::new());
        };
        let metadata = RegistryMetadata::parse(&text)?;

        let mut updates = Vec::new();
        for (category, entry) in &config.skills {
            let Some(meta) = metadata.category(category) else {
                continue;
            };
            let (Some(prefix), Some(latest)) = (&meta.tag_prefix, &meta.version) else {
                continue;
            };
            let Some(current) = entry.git_ref().strip_prefix(prefix.as_str()) else {
                continue;
            };
            let current_version = parse_version(category, current)?;
            let latest_version = parse_version(category, latest)?;
            if latest_version > current_version {
                tracing::info!(category, current, latest = %latest, "Update available");
                updates.push(UpdateAvailable {
                    category: category.clone(),
                    current: current.to_string(),
                    latest: latest.clone(),
                });
            }
        }
        Ok(updates)
    }

    /// Resolves and downloads the skills of every configured category.
    ///
    /// Categories are processed in file order. Tree listings are fetched
    /// once per ref.
    pub async fn assemble_skills(&self, config: &SkillConfig) -> Result<AssembledSkills> {
        let repo = registry_repo(config)?;
        let remote = &self.remote;
        let concurrency = self.concurrency;
        let mut trees: HashMap<String, Option<Vec<TreeEntry>>> = HashMap::new();
        let mut assembled = AssembledSkills::default();

        for (category, entry) in &config.skills {
            let git_ref = entry.git_ref();
            tracing::info!("  - Discovering {} ({})...", category, git_ref);

            if !trees.contains_key(git_ref) {
                let tree = remote.tree(&repo, git_ref).await;
                trees.insert(git_ref.to_string(), tree);
            }
            let Some(tree) = trees.get(git_ref).and_then(|t| t.as_deref()) else {
                tracing::warn!("Failed to fetch {}@{}", category, git_ref);
                assembled.skipped.push(SkipReason::CategoryUnavailable {
                    category: category.clone(),
                    git_ref: git_ref.to_string(),
                });
                continue;
            };

            let resolution = resolve_skills(category, entry, tree);
            assembled.skipped.extend(resolution.skipped);
            for id in &resolution.skills {
                let fetched = fetch_skill(remote, &repo, git_ref, category, id, tree, concurrency);
                if let Some(skill) = fetched.await {
                    assembled.skills.push(skill);
                }
            }
        }
        Ok(assembled)
    }

    pub fn write_skills(&self, skills: &[CollectedSkill], config: &SkillConfig) -> WriteReport {
        SkillWriter::with_root(&self.root).write_skills(skills, config)
    }

    /// Updates `AGENTS.md` from the registry's pre-generated index rows and
    /// writes a bridge rule for every effective agent.
    ///
    /// With `synced`, only rows of those skills are kept, matched within the
    /// category that lists them. Rows come only from configured categories,
    /// so skills pulled in by an absolute include from another category
    /// (`react/*` under `react-native`) are written to disk but not indexed.
    /// Returns the number of rows written, or `None` when the index was left
    /// untouched.
    pub async fn apply_indices(
        &self,
        config: &SkillConfig,
        synced: Option<&[CollectedSkill]>,
    ) -> Result<Option<usize>> {
        let repo = registry_repo(config)?;
        let git_ref = config
            .skills
            .values()
            .next()
            .map(|entry| entry.git_ref())
            .unwrap_or(DEFAULT_REF);

        tracing::info!("Updating Agent Skills index...");
        let remote = &self.remote;
        let Some(text) = remote.raw_file(&repo, git_ref, INDEX_FRAGMENTS_PATH).await else {
            tracing::warn!("No pre-generated index found on registry");
            return Ok(None);
        };
        let fragments: HashMap<String, String> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse {INDEX_FRAGMENTS_PATH}: {e}"))?;

        let mut rows = Vec::new();
        for category in config.skills.keys() {
            let Some(fragment) = fragments.get(category) else {
                continue;
            };
            let ids: Option<HashSet<String>> = synced.map(|skills| {
                skills
                    .iter()
                    .filter(|s| &s.category == category)
                    .map(CollectedSkill::id)
                    .collect()
            });
            rows.extend(filter_rows(fragment, ids.as_ref()));
        }

        if rows.is_empty() {
            tracing::info!("  - No matching skills found to index");
            return Ok(None);
        }

        inject_index(&self.root, &assemble_index(&rows))?;
        write_bridges(&self.root, &config.effective_agents())?;
        tracing::info!("  AGENTS.md index updated ({} skills)", rows.len());
        Ok(Some(rows.len()))
    }

    /// Runs the whole pipeline: reconcile, update check, fetch, write, index.
    ///
    /// Update-check and index failures are logged and do not fail the run.
    pub async fn run(&self) -> Result<SyncReport> {
        let mut config = self
            .store
            .load()?
            .ok_or_else(|| anyhow!("No {CONFIG_FILE_NAME} found. Run `init` first"))?;
        let deps = project_dependencies(&self.root);

        let mut report = SyncReport {
            reenabled: self.reconcile_config(&mut config, &deps)?,
            ..SyncReport::default()
        };

        match self.check_for_updates(&config).await {
            Ok(updates) => report.updates = updates,
            Err(e) => tracing::warn!(error = %e, "Update check failed"),
        }

        let assembled = self.assemble_skills(&config).await?;
        report.skills = assembled.skills.iter().map(CollectedSkill::id).collect();
        report.files.skipped.extend(assembled.skipped);
        report
            .files
            .merge(self.write_skills(&assembled.skills, &config));

        report.indexed = match self.apply_indices(&config, Some(&assembled.skills)).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to update index");
                None
            }
        };
        Ok(report)
    }
}

fn registry_repo(config: &SkillConfig) -> Result<GitHubRef> {
    GitHubRef::parse(&config.registry)
        .ok_or_else(|| RegistryError::UnsupportedHost(config.registry.clone()).into())
}

fn parse_version(
    category: &str,
    version: &str,
) -> std::result::Result<semver::Version, VersionError> {
    semver::Version::parse(version).map_err(|source| VersionError {
        category: category.to_string(),
        version: version.to_string(),
        source,
    })
}
