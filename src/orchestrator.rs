// src/orchestrator.rs
// =============================================================================
// Runs one "generate" request from start to finish:
//
//   URL -> (owner, repo) -> metadata -> tree (on the default branch)
//       -> markdown -> stored document
//
// The first failure stops everything and is returned as-is; nothing is
// written to the store unless every earlier step succeeded. Each upstream
// call is wrapped in a timeout, and hitting it counts as a network error.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::error::{Result, ScribeError};
use crate::github::{parse_github_url, RepositoryHost};
use crate::render::render_markdown;
use crate::store::{DocumentStore, NewDocument};

/// What a successful generation hands back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub id: i64,
    pub repo_url: String,
    pub repo_name: String,
    pub description: Option<String>,
    pub markdown: String,
    pub created_at: DateTime<Utc>,
}

pub async fn generate_document<H>(
    host: &H,
    store: &dyn DocumentStore,
    repo_url: &str,
    timeout: Duration,
) -> Result<GenerationResult>
where
    H: RepositoryHost + ?Sized,
{
    let slug = parse_github_url(repo_url)?;
    info!(repo = %slug, "Generating document");

    let metadata = with_timeout(timeout, "metadata", host.fetch_metadata(&slug.owner, &slug.repo)).await?;

    let tree = with_timeout(
        timeout,
        "tree",
        host.fetch_tree(&slug.owner, &slug.repo, &metadata.default_branch),
    )
    .await?;

    let markdown = render_markdown(&metadata, &tree)?;

    let saved = store.insert(&NewDocument {
        repo_url: repo_url.trim().to_string(),
        repo_name: metadata.name.clone(),
        description: metadata.description.clone(),
        markdown,
        file_tree: tree,
    })?;

    info!(id = saved.id, repo = %slug, "Stored generated document");
    Ok(GenerationResult {
        id: saved.id,
        repo_url: saved.repo_url,
        repo_name: saved.repo_name,
        description: saved.description,
        markdown: saved.markdown,
        created_at: saved.created_at,
    })
}

async fn with_timeout<T, F>(limit: Duration, step: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            error!(step, timeout_secs = limit.as_secs_f64(), "Upstream call timed out");
            Err(ScribeError::NetworkError(format!(
                "{} request timed out after {:?}",
                step, limit
            )))
        }
    }
}
