// src/github/repo.rs
// =============================================================================
// The (owner, repository, branch) triple that identifies what we browse.
//
// Accepted input formats for the repository part:
//   - owner/repo
//   - github.com/owner/repo
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
// =============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A repository selection: which repo and which branch to read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

#[derive(Debug, Error)]
#[error("invalid repository reference '{input}': {reason}")]
pub struct RepoParseError {
    pub input: String,
    pub reason: &'static str,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, branch: impl Into<String>) -> Self {
        RepoRef {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }

    // Parses "owner/repo" or a GitHub URL and pairs it with a branch
    //
    // Example:
    //   "https://github.com/rust-lang/rust" + "master"
    //     -> RepoRef { owner: "rust-lang", repo: "rust", branch: "master" }
    pub fn parse(input: &str, branch: &str) -> Result<Self, RepoParseError> {
        let error = |reason| RepoParseError {
            input: input.to_string(),
            reason,
        };

        if branch.trim().is_empty() {
            return Err(error("branch must not be empty"));
        }

        // Remove the scheme, remembering whether there was one
        let input_trimmed = input.trim();
        let (had_scheme, rest) = match input_trimmed.split_once("://") {
            Some((_, rest)) => (true, rest),
            None => (false, input_trimmed),
        };
        let trimmed = rest.trim_start_matches("www.");

        // A scheme, or a host-like first segment, means this must be a github.com URL
        let first = trimmed.split('/').next().unwrap_or("");
        let path = if let Some(rest) = trimmed.strip_prefix("github.com/") {
            rest
        } else if had_scheme || first.contains('.') || trimmed.contains(':') {
            return Err(error("not a GitHub URL"));
        } else {
            trimmed
        };

        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        if parts.len() < 2 {
            return Err(error("expected owner/repo"));
        }

        let owner = parts[0];
        let repo = parts[1].trim_end_matches(".git");
        if repo.is_empty() {
            return Err(error("repository name is empty"));
        }

        Ok(RepoRef::new(owner, repo, branch.trim()))
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}
