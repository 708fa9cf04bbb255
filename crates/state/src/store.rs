//! Persistence seam for `.skillsrc`.

use crate::config::{ConfigError, SkillConfig, CONFIG_FILE_NAME};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads and saves the project configuration.
pub trait ConfigStore: Send + Sync {
    /// Returns `Ok(None)` when the project has not been initialized.
    fn load(&self) -> Result<Option<SkillConfig>, ConfigError>;

    /// Persists the normalized configuration.
    fn save(&self, config: &SkillConfig) -> Result<(), ConfigError>;
}

/// Stores `.skillsrc` in a project directory.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    root: PathBuf,
}

impl FileConfigStore {
    /// Uses `root` as the project directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Persists the configuration preceded by a comment line.
    pub fn save_with_header(&self, config: &SkillConfig, header: &str) -> Result<(), ConfigError> {
        let body = config.to_yaml()?;
        self.write(&format!("{header}\n{body}"))
    }

    fn write(&self, text: &str) -> Result<(), ConfigError> {
        let path = self.path();
        fs::write(&path, text).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Option<SkillConfig>, ConfigError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        SkillConfig::parse(&text).map(Some)
    }

    fn save(&self, config: &SkillConfig) -> Result<(), ConfigError> {
        let body = config.to_yaml()?;
        self.write(&body)
    }
}

/// Keeps the configuration in memory; used where no project directory exists.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    saved: Mutex<Option<SkillConfig>>,
    saves: Mutex<usize>,
}

impl MemoryConfigStore {
    pub fn with_config(config: SkillConfig) -> Self {
        Self {
            saved: Mutex::new(Some(config)),
            saves: Mutex::new(0),
        }
    }

    /// Number of times [`ConfigStore::save`] has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Option<SkillConfig>, ConfigError> {
        Ok(self.saved.lock().clone())
    }

    fn save(&self, config: &SkillConfig) -> Result<(), ConfigError> {
        let mut normalized = config.clone();
        normalized.normalize();
        *self.saved.lock() = Some(normalized);
        *self.saves.lock() += 1;
        Ok(())
    }
}
