//! Shared test utilities for skillsrc crates.
//!
//! Provides an isolated project directory fixture, SKILL.md builders, and
//! guards for tests that mutate process environment variables.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = skillsrc_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value" until _guard drops
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// Renders a SKILL.md document with frontmatter and a priority heading.
pub fn skill_markdown(name: &str, description: &str, priority: &str) -> String {
    format!(
        "---\nname: {name}\ndescription: {description}\n---\n\n# {name}\n\n\
         ## **Priority: {priority}**\n\n- Use the documented patterns.\n"
    )
}

/// A temporary project directory.
///
/// The directory is removed when the fixture drops.
pub struct ProjectFixture {
    pub tempdir: tempfile::TempDir,
}

impl ProjectFixture {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            tempdir: tempfile::tempdir()?,
        })
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.tempdir.path()
    }

    /// Writes `content` to a project-relative path, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Reads a project-relative file.
    pub fn read(&self, relative: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.root().join(relative))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root().join(relative).exists()
    }

    /// Creates `skills/<category>/<skill>/SKILL.md` under the project root.
    pub fn create_skill(
        &self,
        category: &str,
        skill: &str,
        description: &str,
        priority: &str,
    ) -> std::io::Result<PathBuf> {
        self.write(
            &format!("skills/{category}/{skill}/SKILL.md"),
            &skill_markdown(skill, description, priority),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_guard_serializes_tests() {
        let _g = env_guard();
    }

    #[test]
    fn test_set_env_var_sets_and_restores() {
        let _g = env_guard();

        const KEY: &str = "SKILLSRC_TEST_UTILS_TEST_VAR";
        std::env::remove_var(KEY);

        {
            let _guard = set_env_var(KEY, Some("test_value"));
            assert_eq!(std::env::var(KEY).ok(), Some("test_value".to_string()));
        }
        assert!(std::env::var(KEY).is_err());
    }

    #[test]
    fn test_set_env_var_restores_previous_value() {
        let _g = env_guard();

        const KEY: &str = "SKILLSRC_TEST_RESTORE_VAR";
        std::env::set_var(KEY, "original");

        {
            let _guard = set_env_var(KEY, None);
            assert!(std::env::var(KEY).is_err());
        }
        assert_eq!(std::env::var(KEY).ok(), Some("original".to_string()));

        std::env::remove_var(KEY);
    }

    #[test]
    fn test_fixture_writes_nested_files() {
        let fixture = ProjectFixture::new().expect("fixture creation");
        fixture.write("a/b/c.txt", "hello").unwrap();
        assert_eq!(fixture.read("a/b/c.txt").unwrap(), "hello");
        assert!(fixture.exists("a/b"));
    }

    #[test]
    fn test_fixture_create_skill() {
        let fixture = ProjectFixture::new().expect("fixture creation");
        let path = fixture
            .create_skill("flutter", "bloc", "State management", "P0")
            .unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("---\nname: bloc\n"));
        assert!(content.contains("## **Priority: P0**"));
    }
}
