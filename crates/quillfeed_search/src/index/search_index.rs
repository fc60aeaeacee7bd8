//! SQLite FTS5-backed inverted index.
//!
//! # Responsibility
//! - Own the on-disk index store: content snapshots plus the FTS5 table
//!   kept in sync by triggers.
//! - Provide upsert, delete and single-term match queries.
//!
//! # Invariants
//! - Entries are keyed by `doc_key` (owner identity + document id).
//! - Result ordering is deterministic: bm25 relevance, then `doc_key`.
//! - Concurrent `index_document`/`search` calls need no external locking.
//!
//! The index and the relational tag rows are separate resources; nothing
//! makes their updates atomic with each other. A crash between the two
//! leaves the index stale until the document is re-indexed.

use crate::model::document::{doc_key, DocumentId};
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

const INDEX_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const INDEX_SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS index_entries (
    doc_key TEXT PRIMARY KEY,
    document_id TEXT NOT NULL,
    content TEXT NOT NULL
);

CREATE VIRTUAL TABLE IF NOT EXISTS index_fts USING fts5(
    content,
    content='index_entries',
    content_rowid='rowid'
);

CREATE TRIGGER IF NOT EXISTS index_entries_ai AFTER INSERT ON index_entries BEGIN
    INSERT INTO index_fts (rowid, content) VALUES (new.rowid, new.content);
END;

CREATE TRIGGER IF NOT EXISTS index_entries_ad AFTER DELETE ON index_entries BEGIN
    INSERT INTO index_fts (index_fts, rowid, content) VALUES ('delete', old.rowid, old.content);
END;

CREATE TRIGGER IF NOT EXISTS index_entries_au AFTER UPDATE ON index_entries BEGIN
    INSERT INTO index_fts (index_fts, rowid, content) VALUES ('delete', old.rowid, old.content);
    INSERT INTO index_fts (rowid, content) VALUES (new.rowid, new.content);
END;
";

pub type IndexResult<T> = Result<T, IndexError>;

/// Index-layer error for store lifecycle, writes and match queries.
#[derive(Debug)]
pub enum IndexError {
    /// The index store failed to open, or its handle is unusable.
    Unavailable(String),
    /// The derived match expression was rejected by FTS5.
    InvalidQuery {
        term: String,
        message: String,
    },
    Sqlite(rusqlite::Error),
    InvalidData(String),
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "search index unavailable: {message}"),
            Self::InvalidQuery { term, message } => {
                write!(f, "invalid index query `{term}`: {message}")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid index row: {message}"),
        }
    }
}

impl Error for IndexError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for IndexError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Single hit returned by [`SearchIndex::search`], in relevance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHit {
    pub doc_key: String,
    pub document_id: DocumentId,
}

/// Process-wide inverted index handle.
///
/// The host opens one instance against a durable location at startup and
/// injects it wherever indexing or search is needed. The internal mutex is
/// the index's own concurrency control; callers never lock around it.
pub struct SearchIndex {
    conn: Mutex<Connection>,
}

impl SearchIndex {
    /// Opens (creating if absent) the index store at `path`.
    pub fn open(path: impl AsRef<Path>) -> IndexResult<Self> {
        let started_at = Instant::now();
        info!("event=index_open module=index status=start mode=file");

        let conn = Connection::open(path)
            .map_err(|err| IndexError::Unavailable(format!("failed to open index store: {err}")))?;
        match Self::bootstrap(conn) {
            Ok(index) => {
                info!(
                    "event=index_open module=index status=ok mode=file duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(index)
            }
            Err(err) => {
                error!(
                    "event=index_open module=index status=error mode=file duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Opens an in-memory index store. Intended for tests.
    pub fn open_in_memory() -> IndexResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|err| IndexError::Unavailable(format!("failed to open index store: {err}")))?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> IndexResult<Self> {
        conn.busy_timeout(INDEX_BUSY_TIMEOUT)?;
        conn.execute_batch(INDEX_SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Inserts or replaces the indexed snapshot for one document.
    ///
    /// Calling this again after an edit is the re-index hook; the previous
    /// snapshot stops matching immediately.
    pub fn index_document(
        &self,
        owner: &str,
        document_id: DocumentId,
        content: &str,
    ) -> IndexResult<()> {
        let key = doc_key(owner, document_id);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO index_entries (doc_key, document_id, content)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (doc_key) DO UPDATE SET
                document_id = excluded.document_id,
                content = excluded.content;",
            params![key, document_id.to_string(), content],
        )?;
        Ok(())
    }

    /// Deletes the indexed snapshot for one document, if present.
    pub fn remove_document(&self, owner: &str, document_id: DocumentId) -> IndexResult<()> {
        let key = doc_key(owner, document_id);
        let conn = self.lock()?;
        conn.execute("DELETE FROM index_entries WHERE doc_key = ?1;", [key])?;
        Ok(())
    }

    /// Executes a single-term match query, hits in relevance order.
    ///
    /// Returns an empty list for blank terms.
    pub fn search(&self, term: &str) -> IndexResult<Vec<IndexHit>> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        let match_expr = escape_fts_term(trimmed);

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT
                index_entries.doc_key AS doc_key,
                index_entries.document_id AS document_id
             FROM index_fts
             JOIN index_entries ON index_entries.rowid = index_fts.rowid
             WHERE index_fts MATCH ?1
             ORDER BY bm25(index_fts), index_entries.doc_key ASC;",
        )?;
        let mut rows = stmt
            .query([match_expr.as_str()])
            .map_err(|err| map_query_error(err, trimmed))?;
        let mut hits = Vec::new();

        while let Some(row) = rows.next().map_err(|err| map_query_error(err, trimmed))? {
            hits.push(parse_index_hit(row)?);
        }

        Ok(hits)
    }

    /// Closes the index store, releasing the underlying connection.
    pub fn close(self) -> IndexResult<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| poisoned_handle_error())?;
        conn.close().map_err(|(_, err)| IndexError::Sqlite(err))
    }

    fn lock(&self) -> IndexResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| poisoned_handle_error())
    }
}

fn poisoned_handle_error() -> IndexError {
    IndexError::Unavailable("index handle poisoned by an earlier panic".to_string())
}

fn parse_index_hit(row: &Row<'_>) -> IndexResult<IndexHit> {
    let doc_key: String = row.get("doc_key")?;
    let id_text: String = row.get("document_id")?;
    let document_id = Uuid::parse_str(&id_text).map_err(|_| {
        IndexError::InvalidData(format!(
            "invalid uuid value `{id_text}` in index_entries.document_id"
        ))
    })?;

    Ok(IndexHit {
        doc_key,
        document_id,
    })
}

fn escape_fts_term(raw: &str) -> String {
    let escaped = raw.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

fn map_query_error(err: rusqlite::Error, term: &str) -> IndexError {
    if is_match_syntax_error(&err) {
        return IndexError::InvalidQuery {
            term: term.to_string(),
            message: err.to_string(),
        };
    }

    IndexError::Sqlite(err)
}

fn is_match_syntax_error(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            let msg = message.to_lowercase();
            (msg.contains("fts5") && msg.contains("syntax"))
                || msg.contains("malformed match expression")
                || msg.contains("unterminated")
        }
        _ => false,
    }
}
