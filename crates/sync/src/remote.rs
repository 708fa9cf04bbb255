//! Access to a hosted skills registry.
//!
//! Every [`RemoteRepository`] call degrades to `None` on failure (network
//! error, 404, non-2xx status, undecodable body). Callers skip the affected
//! item and carry on.

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::Mutex;
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::sync::LazyLock;

#[cfg(test)]
use mockall::automock;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";
const CLIENT_USER_AGENT: &str = concat!("skillsrc/", env!("CARGO_PKG_VERSION"));

static GITHUB_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)github\.com/([^/]+)/([^/]+)").expect("valid regex"));

/// Get the GitHub API base URL, allowing override for testing.
fn github_api_base() -> String {
    std::env::var("GITHUB_API_BASE_URL").unwrap_or_else(|_| GITHUB_API_BASE.to_string())
}

/// Get the raw content base URL, allowing override for testing.
fn raw_content_base() -> String {
    std::env::var("GITHUB_RAW_BASE_URL").unwrap_or_else(|_| GITHUB_RAW_BASE.to_string())
}

/// Kind of a tree listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// Submodules and anything else the host reports.
    #[serde(other)]
    Other,
}

/// One path in a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub sha: String,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
            sha: String::new(),
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
            sha: String::new(),
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }
}

/// Owner and repository name of a GitHub-hosted registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitHubRef {
    pub owner: String,
    pub repo: String,
}

impl GitHubRef {
    /// Extracts `owner/repo` from any URL containing `github.com/<owner>/<repo>`.
    ///
    /// Matching is case-insensitive and a trailing `.git` is dropped.
    ///
    /// ```
    /// use skillsrc_sync::GitHubRef;
    ///
    /// let r = GitHubRef::parse("https://GitHub.com/acme/skills.git").unwrap();
    /// assert_eq!(r.to_string(), "acme/skills");
    /// assert!(GitHubRef::parse("https://gitlab.com/acme/skills").is_none());
    /// ```
    pub fn parse(url: &str) -> Option<Self> {
        let caps = GITHUB_URL_REGEX.captures(url)?;
        let owner = caps.get(1)?.as_str().to_string();
        let repo = caps.get(2)?.as_str();
        let repo = repo.strip_suffix(".git").unwrap_or(repo).to_string();
        Some(Self { owner, repo })
    }
}

impl fmt::Display for GitHubRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Read access to a hosted registry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Recursive tree listing of `git_ref`.
    async fn tree(&self, repo: &GitHubRef, git_ref: &str) -> Option<Vec<TreeEntry>>;

    /// Text content of one file at `git_ref`.
    async fn raw_file(&self, repo: &GitHubRef, git_ref: &str, path: &str) -> Option<String>;

    async fn default_branch(&self, repo: &GitHubRef) -> Option<String>;

    async fn latest_release_tag(&self, repo: &GitHubRef) -> Option<String>;
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

/// [`RemoteRepository`] backed by the GitHub REST API and raw content host.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    raw_base: String,
    token: Option<String>,
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubClient {
    /// Client configured from `GITHUB_API_BASE_URL`, `GITHUB_RAW_BASE_URL`
    /// and `GITHUB_TOKEN`.
    pub fn new() -> Self {
        Self::with_endpoints(
            github_api_base(),
            raw_content_base(),
            skillsrc_state::github_token(),
        )
    }

    pub fn with_endpoints(
        api_base: impl Into<String>,
        raw_base: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            raw_base: raw_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn apply_github_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn get(&self, url: &str, accept: &str) -> Option<reqwest::Response> {
        let builder = self.http.get(url).header(ACCEPT, accept);
        let request = self.apply_github_auth(builder.header(USER_AGENT, CLIENT_USER_AGENT));
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, url, "GitHub request failed");
                return None;
            }
        };
        match response.status() {
            status if status.is_success() => Some(response),
            StatusCode::NOT_FOUND => {
                tracing::debug!(url, "GitHub resource not found");
                None
            }
            status => {
                tracing::warn!(%status, url, "GitHub API error");
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let response = self.get(url, "application/vnd.github.v3+json").await?;
        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(error = %e, url, "Failed to decode GitHub response");
                None
            }
        }
    }
}

#[async_trait]
impl RemoteRepository for GithubClient {
    async fn tree(&self, repo: &GitHubRef, git_ref: &str) -> Option<Vec<TreeEntry>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, repo.owner, repo.repo, git_ref
        );
        let body: TreeResponse = self.get_json(&url).await?;
        if body.truncated {
            tracing::warn!(%repo, git_ref, "Tree listing was truncated by GitHub");
        }
        Some(body.tree)
    }

    async fn raw_file(&self, repo: &GitHubRef, git_ref: &str, path: &str) -> Option<String> {
        let url = format!(
            "{}/{}/{}/{}/{}",
            self.raw_base, repo.owner, repo.repo, git_ref, path
        );
        let response = self.get(&url, "*/*").await?;
        match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, path, "Failed to fetch file");
                None
            }
        }
    }

    async fn default_branch(&self, repo: &GitHubRef) -> Option<String> {
        let url = format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.repo);
        let info: RepoInfo = self.get_json(&url).await?;
        Some(info.default_branch).filter(|b| !b.is_empty())
    }

    async fn latest_release_tag(&self, repo: &GitHubRef) -> Option<String> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, repo.owner, repo.repo
        );
        let release: Release = self.get_json(&url).await?;
        Some(release.tag_name)
    }
}

/// In-process registry over a fixed set of files.
///
/// Directory entries are derived from file paths, so a registry only needs
/// its files listed. Every ref serves the same content unless refs are
/// restricted with [`MemoryRepository::with_refs`].
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: Vec<TreeEntry>,
    files: HashMap<String, String>,
    refs: Option<BTreeSet<String>>,
    default_branch: Option<String>,
    release_tag: Option<String>,
    tree_requests: Mutex<Vec<String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, and tree entries for any of its directories not yet listed.
    pub fn with_file(mut self, path: &str, content: impl Into<String>) -> Self {
        let mut dir = String::new();
        let segments: Vec<&str> = path.split('/').collect();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            if !dir.is_empty() {
                dir.push('/');
            }
            dir.push_str(segment);
            if !self.entries.iter().any(|e| e.path == dir) {
                self.entries.push(TreeEntry::tree(dir.clone()));
            }
        }
        if !self.files.contains_key(path) {
            self.entries.push(TreeEntry::blob(path));
        }
        self.files.insert(path.to_string(), content.into());
        self
    }

    /// Only these refs resolve; others behave like a missing branch.
    pub fn with_refs<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.refs = Some(refs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    pub fn with_release_tag(mut self, tag: impl Into<String>) -> Self {
        self.release_tag = Some(tag.into());
        self
    }

    /// Refs whose tree has been requested, in call order.
    pub fn tree_requests(&self) -> Vec<String> {
        self.tree_requests.lock().clone()
    }

    fn serves(&self, git_ref: &str) -> bool {
        match &self.refs {
            Some(refs) => refs.contains(git_ref),
            None => true,
        }
    }
}

#[async_trait]
impl RemoteRepository for MemoryRepository {
    async fn tree(&self, _repo: &GitHubRef, git_ref: &str) -> Option<Vec<TreeEntry>> {
        self.tree_requests.lock().push(git_ref.to_string());
        self.serves(git_ref).then(|| self.entries.clone())
    }

    async fn raw_file(&self, _repo: &GitHubRef, git_ref: &str, path: &str) -> Option<String> {
        if !self.serves(git_ref) {
            return None;
        }
        self.files.get(path).cloned()
    }

    async fn default_branch(&self, _repo: &GitHubRef) -> Option<String> {
        self.default_branch.clone()
    }

    async fn latest_release_tag(&self, _repo: &GitHubRef) -> Option<String> {
        self.release_tag.clone()
    }
}

/// Downloads `paths` with at most `concurrency` requests in flight.
///
/// A fixed pool of `min(concurrency, paths.len())` workers pulls from one
/// shared queue. Failed downloads are dropped. Results are sorted by path.
pub async fn fetch_files<R>(
    remote: &R,
    repo: &GitHubRef,
    git_ref: &str,
    paths: Vec<String>,
    concurrency: usize,
) -> Vec<(String, String)>
where
    R: RemoteRepository + ?Sized,
{
    let worker_count = concurrency.max(1).min(paths.len());
    let queue = Mutex::new(VecDeque::from(paths));
    let results = Mutex::new(Vec::new());

    let (queue, results_ref) = (&queue, &results);
    let workers = (0..worker_count).map(|_| async move {
        loop {
            let next = queue.lock().pop_front();
            let Some(path) = next else { break };
            if let Some(content) = remote.raw_file(repo, git_ref, &path).await {
                results_ref.lock().push((path, content));
            }
        }
    });
    join_all(workers).await;

    let mut files = results.into_inner();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn repo() -> GitHubRef {
        GitHubRef::parse("https://github.com/acme/skills").unwrap()
    }

    #[test]
    fn parse_handles_variants() {
        assert!(GitHubRef::parse("git@github.com:acme/x").is_none());
        let r = GitHubRef::parse("https://github.com/Acme/Skills.git/tree/main").unwrap();
        assert_eq!(r.owner, "Acme");
        assert_eq!(r.repo, "Skills");
    }

    #[test]
    fn memory_repository_derives_directories() {
        let remote = MemoryRepository::new()
            .with_file("skills/flutter/bloc/SKILL.md", "a")
            .with_file("skills/flutter/bloc/references/x.md", "b");
        let paths: Vec<_> = remote
            .entries
            .iter()
            .map(|e| (e.path.as_str(), e.kind))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("skills", EntryKind::Tree),
                ("skills/flutter", EntryKind::Tree),
                ("skills/flutter/bloc", EntryKind::Tree),
                ("skills/flutter/bloc/SKILL.md", EntryKind::Blob),
                ("skills/flutter/bloc/references", EntryKind::Tree),
                ("skills/flutter/bloc/references/x.md", EntryKind::Blob),
            ]
        );
    }

    #[tokio::test]
    async fn restricted_refs_behave_like_missing_branches() {
        let remote = MemoryRepository::new()
            .with_file("skills/a/b/SKILL.md", "x")
            .with_refs(["flutter-v1.0.0"]);
        assert!(remote.tree(&repo(), "main").await.is_none());
        assert!(remote.tree(&repo(), "flutter-v1.0.0").await.is_some());
        assert_eq!(remote.tree_requests(), vec!["main", "flutter-v1.0.0"]);
    }

    fn unless_missing(path: &str) -> Option<String> {
        (!path.ends_with("missing.md")).then(|| format!("content of {path}"))
    }

    #[tokio::test]
    async fn fetch_files_drops_failures_and_sorts() {
        let mut mock = MockRemoteRepository::new();
        mock.expect_raw_file()
            .returning(|_, _, path| unless_missing(path));

        let paths = vec![
            "skills/a/b/SKILL.md".to_string(),
            "skills/a/b/assets/z.png".to_string(),
            "skills/a/b/missing.md".to_string(),
            "skills/a/b/assets/a.png".to_string(),
        ];
        let files = fetch_files(&mock, &repo(), "main", paths, 10).await;
        let names: Vec<_> = files.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "skills/a/b/SKILL.md",
                "skills/a/b/assets/a.png",
                "skills/a/b/assets/z.png",
            ]
        );
    }

    struct CountingRemote {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl RemoteRepository for CountingRemote {
        async fn tree(&self, _: &GitHubRef, _: &str) -> Option<Vec<TreeEntry>> {
            None
        }

        async fn raw_file(&self, _: &GitHubRef, _: &str, path: &str) -> Option<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Some(path.to_string())
        }

        async fn default_branch(&self, _: &GitHubRef) -> Option<String> {
            None
        }

        async fn latest_release_tag(&self, _: &GitHubRef) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn fetch_files_respects_worker_ceiling() {
        let remote = Arc::new(CountingRemote {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let paths: Vec<String> = (0..20).map(|i| format!("f{i:02}")).collect();
        let files = fetch_files(remote.as_ref(), &repo(), "main", paths, 3).await;
        assert_eq!(files.len(), 20);
        assert!(remote.peak.load(Ordering::SeqCst) <= 3);
        assert!(remote.peak.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn fetch_files_with_no_paths_is_empty() {
        let remote = MemoryRepository::new();
        let files = fetch_files(&remote, &repo(), "main", Vec::new(), 10).await;
        assert!(files.is_empty());
    }
}
