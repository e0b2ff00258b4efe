// src/store/mod.rs
// =============================================================================
// Persistence for generated documents.
//
// The store is deliberately plain CRUD: insert, fetch one, page through
// summaries, delete. DocumentStore is the trait the rest of the program
// uses; SqliteDocumentStore is the only implementation.
// =============================================================================

mod sqlite;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::github::FileTreeNode;

pub use sqlite::SqliteDocumentStore;

/// Fields supplied by the caller when saving a document
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub repo_url: String,
    pub repo_name: String,
    pub description: Option<String>,
    pub markdown: String,
    pub file_tree: Vec<FileTreeNode>,
}

/// A stored document, as returned by insert and select_by_id
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
    pub id: i64,
    pub repo_url: String,
    pub repo_name: String,
    pub description: Option<String>,
    pub markdown: String,
    pub file_tree: Vec<FileTreeNode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A listing row: everything except the large markdown and tree fields
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub repo_url: String,
    pub repo_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentPage {
    /// Newest first
    pub items: Vec<DocumentSummary>,
    /// Number of documents in the store, not in this page
    pub total: u64,
}

pub trait DocumentStore: Send + Sync {
    fn insert(&self, doc: &NewDocument) -> Result<GeneratedDocument>;

    fn select_by_id(&self, id: i64) -> Result<Option<GeneratedDocument>>;

    fn select_page(&self, limit: u32, offset: u32) -> Result<DocumentPage>;

    /// Returns the number of rows removed (0 or 1)
    fn delete_by_id(&self, id: i64) -> Result<usize>;
}
