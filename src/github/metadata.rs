// src/github/metadata.rs
// =============================================================================
// Repository metadata as returned by GET /repos/{owner}/{repo}.
//
// ApiRepository mirrors the part of GitHub's JSON we read. RepositoryMetadata
// is our own normalized record; the conversion is a straight rename, and
// nullable upstream fields stay Option instead of becoming "".
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire shape of the repository endpoint (only the fields we use)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepository {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub default_branch: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
}

/// Immutable snapshot of a repository at fetch time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub name: String,
    /// "owner/name"
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub default_branch: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub language: Option<String>,
    pub stars_count: u64,
    pub forks_count: u64,
}

impl From<ApiRepository> for RepositoryMetadata {
    fn from(api: ApiRepository) -> Self {
        Self {
            name: api.name,
            full_name: api.full_name,
            description: api.description,
            html_url: api.html_url,
            default_branch: api.default_branch,
            created_at: api.created_at,
            updated_at: api.updated_at,
            language: api.language,
            stars_count: api.stargazers_count,
            forks_count: api.forks_count,
        }
    }
}
