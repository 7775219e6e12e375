//! Project sources: a local git checkout or a GitHub repository that bugs
//! can be traced back to.
//!
//! Sources live in their own file, independent of the bug store. Branch
//! listings are parsed from text the caller already has (for example the
//! output of `git branch --all`); nothing here runs git or calls GitHub.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::codec;
use crate::error::{BugbookError, Result};
use crate::store::LoadOutcome;
use crate::util::generate_id;

/// Where a project's code lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceType {
    #[default]
    LocalGit,
    GitHub,
}

/// A saved project source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSource {
    #[serde(default, alias = "Id")]
    pub id: String,
    #[serde(default, rename = "type", alias = "Type")]
    pub source_type: SourceType,
    #[serde(default, alias = "LocalPath")]
    pub local_path: String,
    #[serde(default, alias = "RepoUrl")]
    pub repo_url: String,
    #[serde(default, alias = "Branch")]
    pub branch: String,
}

impl ProjectSource {
    /// A local checkout at `path`.
    #[must_use]
    pub fn local(path: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            source_type: SourceType::LocalGit,
            local_path: path.into(),
            branch: branch.into(),
            ..Default::default()
        }
    }

    /// A GitHub repository at `url`.
    #[must_use]
    pub fn github(url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            source_type: SourceType::GitHub,
            repo_url: url.into(),
            branch: branch.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for ProjectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source_type {
            SourceType::LocalGit => write!(f, "Local: {} (branch: {})", self.local_path, self.branch),
            SourceType::GitHub => write!(f, "GitHub: {} (branch: {})", self.repo_url, self.branch),
        }
    }
}

/// Append-only list of attached sources.
#[derive(Debug)]
pub struct SourceStore {
    sources: Vec<ProjectSource>,
    path: PathBuf,
}

impl SourceStore {
    /// Create a store and load whatever `path` holds.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            sources: Vec::new(),
            path: path.into(),
        };
        store.load();
        store
    }

    /// Discard memory and reload. Never fails and never writes.
    pub fn load(&mut self) -> LoadOutcome {
        self.sources.clear();
        match codec::read_records::<ProjectSource>(&self.path) {
            Ok(None) => LoadOutcome::Missing,
            Ok(Some(sources)) => {
                self.sources = sources;
                LoadOutcome::Loaded(self.sources.len())
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable source file {}: {e}",
                    self.path.display()
                );
                LoadOutcome::Corrupt(e)
            }
        }
    }

    /// Append a source (assigning an ID if it has none) and save.
    ///
    /// # Errors
    ///
    /// Returns `Write` if persisting fails.
    pub fn attach(&mut self, mut source: ProjectSource) -> Result<ProjectSource> {
        if source.id.trim().is_empty() {
            let label = match source.source_type {
                SourceType::LocalGit => source.local_path.as_str(),
                SourceType::GitHub => source.repo_url.as_str(),
            };
            source.id = generate_id("src", label, Utc::now(), self.sources.len(), |id| {
                self.sources.iter().any(|s| s.id == id)
            });
        }
        self.sources.push(source.clone());
        codec::write_records(&self.path, &self.sources)?;
        Ok(source)
    }

    #[must_use]
    pub fn sources(&self) -> &[ProjectSource] {
        &self.sources
    }
}

/// Owner and repository name of a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

impl GitHubRepo {
    /// REST endpoint listing this repository's branches.
    #[must_use]
    pub fn branches_api_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/branches",
            self.owner, self.repo
        )
    }
}

/// Parse `https://github.com/owner/repo[.git]` (any `http`, `https` or
/// `ssh` URL on github.com) or the scp-style `git@github.com:owner/repo.git`.
#[must_use]
pub fn parse_github_repo(url: &str) -> Option<GitHubRepo> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    // scp-style remotes are not URLs; `Url` would read `git@github.com` as a scheme.
    if let Some(rest) = url.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        if !is_github_host(host) {
            return None;
        }
        return repo_from_segments(path.split('/'));
    }

    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "https" | "http" | "ssh") {
        return None;
    }
    if !parsed.host_str().is_some_and(is_github_host) {
        return None;
    }
    repo_from_segments(parsed.path_segments()?)
}

fn is_github_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("github.com") || host.eq_ignore_ascii_case("www.github.com")
}

fn repo_from_segments<'a>(segments: impl Iterator<Item = &'a str>) -> Option<GitHubRepo> {
    let mut segments = segments.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return None;
    }

    Some(GitHubRepo {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// Turn `git branch --all --no-color` output into a de-duplicated list.
///
/// The current-branch marker and the `remotes/` prefix are stripped;
/// symbolic refs (`remotes/origin/HEAD -> origin/main`) are skipped.
#[must_use]
pub fn parse_git_branch_output(output: &str) -> Vec<String> {
    let mut branches: Vec<String> = Vec::new();
    for line in output.lines() {
        let mut line = line.trim();
        if let Some(rest) = line.strip_prefix('*') {
            line = rest.trim();
        }
        if line.contains("->") {
            continue;
        }
        let name = line.strip_prefix("remotes/").unwrap_or(line);
        if !name.is_empty() && !branches.iter().any(|b| b == name) {
            branches.push(name.to_string());
        }
    }
    branches
}

/// Check that `path` is a directory containing a `.git` entry and return
/// its normalized absolute form.
///
/// # Errors
///
/// Returns `Validation` if the directory is missing or not a repository.
pub fn validate_local_repo(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(BugbookError::validation(
            "localPath",
            format!("{} does not exist or is not a directory", path.display()),
        ));
    }
    // Worktrees and submodules use a `.git` file instead of a directory.
    if !path.join(".git").exists() {
        return Err(BugbookError::validation(
            "localPath",
            format!("{} is not a git repository (no .git found)", path.display()),
        ));
    }
    Ok(dunce::canonicalize(path)?)
}
