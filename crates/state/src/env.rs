//! Environment variables that tune remote access.

/// Number of concurrent downloads when `SKILLSRC_CONCURRENCY` is unset.
pub const DEFAULT_CONCURRENCY: usize = 10;

fn non_empty_var(key: &str) -> Option<String> {
    let raw = std::env::var(key).ok()?;
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Returns the token from `GITHUB_TOKEN`, ignoring blank values.
pub fn github_token() -> Option<String> {
    non_empty_var("GITHUB_TOKEN")
}

/// Returns the feedback endpoint from `FEEDBACK_API_URL`.
pub fn feedback_api_url() -> Option<String> {
    non_empty_var("FEEDBACK_API_URL")
}

/// Returns the download pool size from `SKILLSRC_CONCURRENCY` (minimum 1).
pub fn download_concurrency() -> usize {
    non_empty_var("SKILLSRC_CONCURRENCY")
        .and_then(|v| v.parse::<usize>().ok())
        .map(|n| n.max(1))
        .unwrap_or(DEFAULT_CONCURRENCY)
}
