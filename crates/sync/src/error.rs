use thiserror::Error;

/// The registry URL cannot be served by any supported host.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("Only GitHub registries supported (got '{0}')")]
    UnsupportedHost(String),
}

/// A category ref or registry version is not valid semver.
#[derive(Debug, Error)]
#[error("invalid version '{version}' for category '{category}': {source}")]
pub struct VersionError {
    pub category: String,
    pub version: String,
    #[source]
    pub source: semver::Error,
}
