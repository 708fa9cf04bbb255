use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never descended into while scanning a project.
pub const DEFAULT_SKIP_DIRS: &[&str] = &["node_modules", ".git", "build", ".gradle"];

/// Collects files under `root` accepted by `accept_file`.
///
/// `max_depth` is the number of directory levels below `root` that are
/// entered; files directly in `root` are always considered. Directories
/// named in `skip_dirs` are pruned along with everything beneath them.
/// Unreadable entries are skipped. Results are sorted.
pub fn scan_files<F>(
    root: &Path,
    max_depth: usize,
    skip_dirs: &[&str],
    accept_file: F,
) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(max_depth + 1)
        .into_iter()
        .filter_entry(|e| {
            // Don't filter the root directory itself
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !skip_dirs.contains(&name.as_ref())
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && accept_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn is_gradle(path: &Path) -> bool {
        matches!(
            path.file_name().and_then(|n| n.to_str()),
            Some("build.gradle" | "build.gradle.kts")
        )
    }

    #[test]
    fn respects_depth_limit() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "build.gradle");
        touch(tmp.path(), "a/b/c/build.gradle");
        touch(tmp.path(), "a/b/c/d/build.gradle");

        let found = scan_files(tmp.path(), 3, DEFAULT_SKIP_DIRS, is_gradle);
        assert_eq!(
            found,
            vec![
                tmp.path().join("a/b/c/build.gradle"),
                tmp.path().join("build.gradle"),
            ]
        );
    }

    #[test]
    fn prunes_skip_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "node_modules/pkg/build.gradle");
        touch(tmp.path(), "build/generated/build.gradle.kts");
        touch(tmp.path(), "app/build.gradle.kts");

        let found = scan_files(tmp.path(), 3, DEFAULT_SKIP_DIRS, is_gradle);
        assert_eq!(found, vec![tmp.path().join("app/build.gradle.kts")]);
    }
}
