//! Self-upgrade against the project's GitHub releases.

use anyhow::{anyhow, Context, Result};
use semver::Version;
use skillsrc_sync::{GitHubRef, RemoteRepository};
use std::process::Command;

/// Repository whose releases publish the CLI.
pub const CLI_REPOSITORY: &str = "https://github.com/skillsrc/skillsrc";

/// Crate installed by `cargo install` when upgrading.
pub const CLI_CRATE: &str = "skillsrc";

/// Outcome of comparing the running version with the latest release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeCheck {
    UpToDate { current: Version },
    Available { current: Version, latest: Version },
}

/// Version carried by a release tag such as `v1.2.0` or `cli-v1.2.0`.
pub fn tag_version(tag: &str) -> Result<Version> {
    let raw = tag.trim_start_matches(|c: char| !c.is_ascii_digit());
    Version::parse(raw).with_context(|| format!("release tag '{tag}' is not a version"))
}

/// Looks up the latest release of [`CLI_REPOSITORY`] and compares it with
/// `current`.
pub async fn check_for_upgrade<R>(remote: &R, current: &str) -> Result<UpgradeCheck>
where
    R: RemoteRepository + ?Sized,
{
    let current = Version::parse(current).context("running version is not semver")?;
    let repo = GitHubRef::parse(CLI_REPOSITORY)
        .ok_or_else(|| anyhow!("{CLI_REPOSITORY} is not a GitHub repository"))?;
    let tag = remote
        .latest_release_tag(&repo)
        .await
        .ok_or_else(|| anyhow!("Could not determine latest version"))?;
    let latest = tag_version(&tag)?;

    Ok(if latest > current {
        UpgradeCheck::Available { current, latest }
    } else {
        UpgradeCheck::UpToDate { current }
    })
}

/// Installs `version` of the CLI with `cargo install`.
pub fn install_release(version: &Version) -> Result<()> {
    let status = Command::new("cargo")
        .args(["install", CLI_CRATE, "--version"])
        .arg(version.to_string())
        .arg("--force")
        .status()
        .context("failed to run cargo")?;
    if !status.success() {
        return Err(anyhow!("cargo install exited with {status}"));
    }
    Ok(())
}

/// Command users can run when the automatic upgrade fails.
pub fn manual_upgrade_command() -> String {
    format!("cargo install {CLI_CRATE} --force")
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillsrc_sync::MemoryRepository;

    #[test]
    fn tag_prefixes_are_ignored() {
        assert_eq!(tag_version("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(tag_version("cli-v0.4.0").unwrap(), Version::new(0, 4, 0));
        assert!(tag_version("nightly").is_err());
    }

    #[tokio::test]
    async fn newer_release_is_available() {
        let remote = MemoryRepository::new().with_release_tag("v0.4.0");
        let check = check_for_upgrade(&remote, "0.3.0").await.unwrap();
        assert_eq!(
            check,
            UpgradeCheck::Available {
                current: Version::new(0, 3, 0),
                latest: Version::new(0, 4, 0)
            }
        );
    }

    #[tokio::test]
    async fn same_or_older_release_is_up_to_date() {
        for tag in ["v0.3.0", "v0.2.9"] {
            let remote = MemoryRepository::new().with_release_tag(tag);
            let check = check_for_upgrade(&remote, "0.3.0").await.unwrap();
            assert!(matches!(check, UpgradeCheck::UpToDate { .. }));
        }
    }

    #[tokio::test]
    async fn missing_release_is_an_error() {
        let remote = MemoryRepository::new();
        let err = check_for_upgrade(&remote, "0.3.0").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Could not determine latest version"));
    }
}
