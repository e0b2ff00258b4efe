// src/github/repo_url.rs
// =============================================================================
// Turns a repository URL into the (owner, repo) pair the API needs.
//
// Supported formats:
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - https://www.github.com/owner/repo/tree/main/src   (extra segments ignored)
//
// Anything that is not an absolute http(s) URL on github.com is rejected.
// =============================================================================

use tracing::debug;
use url::Url;

use crate::error::{Result, ScribeError};

const GITHUB_HOSTS: [&str; 2] = ["github.com", "www.github.com"];

/// Owner and repository name extracted from a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

// Parses a GitHub URL to extract owner and repository name
//
// Example:
//   "https://github.com/rust-lang/rust.git" -> RepoSlug { owner: "rust-lang", repo: "rust" }
pub fn parse_github_url(input: &str) -> Result<RepoSlug> {
    let invalid = |reason: &str| {
        debug!(url = %input, reason, "Rejected repository URL");
        ScribeError::InvalidUrlFormat(format!("{} ({})", input, reason))
    };

    let url = Url::parse(input.trim()).map_err(|_| invalid("not a well-formed URL"))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(invalid("scheme must be http or https"));
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    if !GITHUB_HOSTS.contains(&host.as_str()) {
        return Err(invalid("host is not github.com"));
    }

    // Empty segments come from doubled or trailing slashes
    let segments: Vec<&str> = url
        .path_segments()
        .map(|parts| parts.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() < 2 {
        return Err(invalid("expected /owner/repo in the path"));
    }

    let owner = segments[0];
    let repo = segments[1].strip_suffix(".git").unwrap_or(segments[1]);

    if repo.is_empty() {
        return Err(invalid("repository name is empty"));
    }

    Ok(RepoSlug {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}
