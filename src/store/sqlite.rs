// src/store/sqlite.rs
// =============================================================================
// SQLite-backed DocumentStore.
//
// One table, one row per generated document. The file tree is kept as JSON
// text next to the Markdown so a stored document can be inspected later.
// The connection sits behind a Mutex; every operation is a single
// statement (or a read of two), so SQLite's own atomicity is all we need.
// =============================================================================

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, error, info};

use super::{DocumentPage, DocumentStore, DocumentSummary, GeneratedDocument, NewDocument};
use crate::error::Result;
use crate::github::FileTreeNode;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS generated_documents (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        repo_url    TEXT NOT NULL,
        repo_name   TEXT NOT NULL,
        description TEXT,
        markdown    TEXT NOT NULL,
        file_tree   TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_generated_documents_created
        ON generated_documents(created_at);
";

#[derive(Clone)]
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// Opens (or creates) the database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to open database");
            e
        })?;
        info!(path = %path.display(), "Opened document store");
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // A panic while holding the lock leaves the connection itself usable
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn insert(&self, doc: &NewDocument) -> Result<GeneratedDocument> {
        let tree_json = serde_json::to_string(&doc.file_tree)?;
        let now = Utc::now();

        let conn = self.conn();
        conn.execute(
            "INSERT INTO generated_documents
                (repo_url, repo_name, description, markdown, file_tree, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &doc.repo_url,
                &doc.repo_name,
                &doc.description,
                &doc.markdown,
                &tree_json,
                now,
                now
            ],
        )
        .map_err(|e| {
            error!(repo = %doc.repo_name, error = %e, "Failed to insert document");
            e
        })?;
        let id = conn.last_insert_rowid();

        debug!(id, repo = %doc.repo_name, "Inserted document");
        Ok(GeneratedDocument {
            id,
            repo_url: doc.repo_url.clone(),
            repo_name: doc.repo_name.clone(),
            description: doc.description.clone(),
            markdown: doc.markdown.clone(),
            file_tree: doc.file_tree.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn select_by_id(&self, id: i64) -> Result<Option<GeneratedDocument>> {
        let row = self
            .conn()
            .query_row(
                "SELECT id, repo_url, repo_name, description, created_at, updated_at, markdown, file_tree
                 FROM generated_documents WHERE id = ?1",
                params![id],
                |row| Ok((summary_from_row(row)?, row.get::<_, String>(6)?, row.get::<_, String>(7)?)),
            )
            .optional()?;

        let Some((summary, markdown, tree_json)) = row else {
            return Ok(None);
        };
        let file_tree: Vec<FileTreeNode> = serde_json::from_str(&tree_json)?;

        Ok(Some(GeneratedDocument {
            id: summary.id,
            repo_url: summary.repo_url,
            repo_name: summary.repo_name,
            description: summary.description,
            markdown,
            file_tree,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }))
    }

    fn select_page(&self, limit: u32, offset: u32) -> Result<DocumentPage> {
        let conn = self.conn();

        let mut stmt = conn.prepare(
            "SELECT id, repo_url, repo_name, description, created_at, updated_at
             FROM generated_documents
             ORDER BY created_at DESC, id DESC
             LIMIT ?1 OFFSET ?2",
        )?;
        let items = stmt
            .query_map(params![limit, offset], summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM generated_documents", [], |row| row.get(0))?;

        Ok(DocumentPage {
            items,
            total: total.max(0) as u64,
        })
    }

    fn delete_by_id(&self, id: i64) -> Result<usize> {
        let removed = self
            .conn()
            .execute("DELETE FROM generated_documents WHERE id = ?1", params![id])?;
        debug!(id, removed, "Delete by id");
        Ok(removed)
    }
}

// Columns 0..=5 must be: id, repo_url, repo_name, description, created_at, updated_at
fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentSummary> {
    Ok(DocumentSummary {
        id: row.get(0)?,
        repo_url: row.get(1)?,
        repo_name: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get::<_, DateTime<Utc>>(4)?,
        updated_at: row.get::<_, DateTime<Utc>>(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::NodeKind;

    fn new_doc(name: &str) -> NewDocument {
        NewDocument {
            repo_url: format!("https://github.com/acme/{}", name),
            repo_name: name.to_string(),
            description: Some(format!("{} description", name)),
            markdown: format!("# {}\n", name),
            file_tree: vec![FileTreeNode {
                name: "src".to_string(),
                kind: NodeKind::Directory,
                path: "src".to_string(),
                children: None,
                size: None,
                partial: false,
            }],
        }
    }

    #[test]
    fn test_insert_and_select() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        let saved = store.insert(&new_doc("alpha")).unwrap();
        assert!(saved.id > 0);
        assert_eq!(saved.created_at, saved.updated_at);

        let loaded = store.select_by_id(saved.id).unwrap().unwrap();
        assert_eq!(loaded.repo_name, "alpha");
        assert_eq!(loaded.markdown, "# alpha\n");
        assert_eq!(loaded.file_tree, saved.file_tree);
        assert_eq!(loaded.created_at, saved.created_at);
    }

    #[test]
    fn test_select_missing_returns_none() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        assert!(store.select_by_id(99).unwrap().is_none());
    }

    #[test]
    fn test_page_is_newest_first_with_total() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        let ids: Vec<i64> = ["one", "two", "three", "four", "five"]
            .iter()
            .map(|n| store.insert(&new_doc(n)).unwrap().id)
            .collect();

        let page = store.select_page(2, 2).unwrap();
        assert_eq!(page.total, 5);
        let got: Vec<i64> = page.items.iter().map(|d| d.id).collect();
        // 3rd and 4th most recent
        assert_eq!(got, vec![ids[2], ids[1]]);

        let tail = store.select_page(10, 4).unwrap();
        assert_eq!(tail.items.len(), 1);
        assert_eq!(tail.items[0].id, ids[0]);
    }

    #[test]
    fn test_delete_only_removes_target() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        let a = store.insert(&new_doc("a")).unwrap().id;
        let b = store.insert(&new_doc("b")).unwrap().id;

        assert_eq!(store.delete_by_id(a).unwrap(), 1);
        assert_eq!(store.delete_by_id(a).unwrap(), 0);
        assert!(store.select_by_id(a).unwrap().is_none());
        assert!(store.select_by_id(b).unwrap().is_some());
        assert_eq!(store.select_page(10, 0).unwrap().total, 1);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.db");

        let id = {
            let store = SqliteDocumentStore::open(&path).unwrap();
            store.insert(&new_doc("persisted")).unwrap().id
        };

        let reopened = SqliteDocumentStore::open(&path).unwrap();
        let doc = reopened.select_by_id(id).unwrap().unwrap();
        assert_eq!(doc.repo_name, "persisted");
    }
}
