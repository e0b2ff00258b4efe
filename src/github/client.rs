// src/github/client.rs
// =============================================================================
// Talks to the GitHub REST API.
//
// Two read-only calls are made per document:
//   GET {base}/repos/{owner}/{repo}                              -> metadata
//   GET {base}/repos/{owner}/{repo}/git/trees/{branch}?recursive=1 -> tree
//
// Every non-2xx response is turned into a specific ScribeError by
// classify_status(). Nothing is retried; the first failure is returned.
//
// The RepositoryHost trait is the seam the orchestrator depends on, so tests
// can swap GitHub for a mock.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};
use url::Url;

use super::metadata::{ApiRepository, RepositoryMetadata};
use super::tree::{reconstruct, FileTreeNode, TreeListing};
use crate::config::GithubConfig;
use crate::error::{Result, ScribeError};

const GITHUB_JSON: &str = "application/vnd.github.v3+json";

/// Anything that can describe a repository and list its files
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    async fn fetch_metadata(&self, owner: &str, repo: &str) -> Result<RepositoryMetadata>;

    async fn fetch_tree(&self, owner: &str, repo: &str, branch: &str) -> Result<Vec<FileTreeNode>>;
}

/// reqwest-backed GitHub client
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base_url: String,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);

        // The credential is optional; without it we get the anonymous rate limit
        if let Some(token) = &config.token {
            let mut value = header_value(&format!("Bearer {}", token))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ScribeError::NetworkError(format!("could not build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    // Branch names may contain '/', '#', '?' or '%', so each part is pushed as
    // an encoded path segment. owner and repo arrive already encoded from
    // parse_github_url and are joined as-is.
    fn tree_url(&self, owner: &str, repo: &str, branch: &str) -> Result<Url> {
        let base = format!("{}/repos/{}/{}/git/trees", self.api_base_url, owner, repo);
        let mut url = Url::parse(&base)
            .map_err(|e| ScribeError::InvalidRequest(format!("invalid API URL {}: {}", base, e)))?;

        url.path_segments_mut()
            .map_err(|_| ScribeError::InvalidRequest(format!("API URL {} cannot take a path", base)))?
            .extend(branch.split('/'));
        url.query_pairs_mut().append_pair("recursive", "1");
        Ok(url)
    }

    // GET a URL and decode the JSON body, classifying any failure
    async fn get_json<T: DeserializeOwned>(&self, url: &str, subject: &str) -> Result<T> {
        debug!(url, "GET");

        let response = self.http.get(url).send().await.map_err(|e| {
            error!(url, error = %e, "Request to GitHub failed");
            ScribeError::NetworkError(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            // The body is only needed to spot rate limiting, so a read failure is not fatal
            let body = response.text().await.unwrap_or_default();
            let err = classify_status(status, &body, subject);
            error!(url, status = status.as_u16(), error = %err, "GitHub returned an error");
            return Err(err);
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!(url, error = %e, "Failed to read GitHub response body");
            ScribeError::NetworkError(e.to_string())
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            error!(url, error = %e, "GitHub response did not match the expected schema");
            ScribeError::MalformedResponse(e.to_string())
        })
    }
}

#[async_trait]
impl RepositoryHost for GithubClient {
    async fn fetch_metadata(&self, owner: &str, repo: &str) -> Result<RepositoryMetadata> {
        let url = format!("{}/repos/{}/{}", self.api_base_url, owner, repo);
        let subject = format!("{}/{}", owner, repo);

        let api: ApiRepository = self.get_json(&url, &subject).await?;
        let metadata = RepositoryMetadata::from(api);

        info!(
            repo = %metadata.full_name,
            branch = %metadata.default_branch,
            stars = metadata.stars_count,
            "Fetched repository metadata"
        );
        Ok(metadata)
    }

    async fn fetch_tree(&self, owner: &str, repo: &str, branch: &str) -> Result<Vec<FileTreeNode>> {
        let url = self.tree_url(owner, repo, branch)?;
        let subject = format!("{}/{}@{}", owner, repo, branch);

        let listing: TreeListing = self.get_json(url.as_str(), &subject).await?;
        let entries = listing.tree.len();
        let nodes = reconstruct(listing);

        info!(repo = %subject, entries, roots = nodes.len(), "Fetched file tree");
        Ok(nodes)
    }
}

fn header_value(raw: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(raw)
        .map_err(|_| ScribeError::InvalidRequest("header value contains invalid characters".to_string()))
}

// Maps a non-2xx status (and its body) onto our error taxonomy
//
//   404 -> RepositoryNotFound
//   403 -> RateLimitExceeded if the body says so, else AccessForbidden
//   401 -> InvalidCredential
//   anything else -> UpstreamApiError with the status code
pub fn classify_status(status: StatusCode, body: &str, subject: &str) -> ScribeError {
    match status {
        StatusCode::NOT_FOUND => ScribeError::RepositoryNotFound(subject.to_string()),
        StatusCode::FORBIDDEN if body.to_ascii_lowercase().contains("rate limit") => {
            ScribeError::RateLimitExceeded
        }
        StatusCode::FORBIDDEN => ScribeError::AccessForbidden,
        StatusCode::UNAUTHORIZED => ScribeError::InvalidCredential,
        other => ScribeError::UpstreamApiError {
            status: other.as_u16(),
            message: other.canonical_reason().unwrap_or("unknown status").to_string(),
        },
    }
}
