// src/service.rs
// =============================================================================
// The read/delete side of the request surface.
//
// These wrap the store with input validation and turn "no such row" into
// ScribeError::NotFound, so every caller sees the same messages.
// Generation lives in orchestrator.rs.
// =============================================================================

use tracing::warn;

use crate::error::{Result, ScribeError};
use crate::store::{DocumentPage, DocumentStore, GeneratedDocument};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

pub fn get_document(store: &dyn DocumentStore, id: i64) -> Result<GeneratedDocument> {
    store.select_by_id(id)?.ok_or_else(|| {
        warn!(id, "Document not found");
        ScribeError::NotFound { id }
    })
}

pub fn list_documents(store: &dyn DocumentStore, limit: u32, offset: u32) -> Result<DocumentPage> {
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(ScribeError::InvalidRequest(format!(
            "limit must be between 1 and {}, got {}",
            MAX_PAGE_LIMIT, limit
        )));
    }
    store.select_page(limit, offset)
}

pub fn delete_document(store: &dyn DocumentStore, id: i64) -> Result<()> {
    match store.delete_by_id(id)? {
        0 => {
            warn!(id, "Nothing to delete");
            Err(ScribeError::NotFound { id })
        }
        _ => Ok(()),
    }
}
