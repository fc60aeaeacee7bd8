//! Tag repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `tags` and `document_tags` rows: diff application, lookups,
//!   and delete-path cleanup.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `apply_tag_diff` is all-or-nothing within one immediate transaction.
//! - Tag name matching is case-sensitive and includes the leading `#`.
//! - Removing the last association leaves the tag row in place.

use crate::db::DbError;
use crate::model::document::DocumentId;
use crate::tags::diff::TagDiff;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for tag persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Tag input is blank or otherwise unusable as a row key.
    InvalidTag(String),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidTag(value) => write!(f, "invalid tag name: `{value}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted tag data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract for tag rows and document/tag associations.
pub trait TagRepository {
    /// Applies one tag diff for a document in a single transaction.
    ///
    /// Additions create missing tag rows and append associations
    /// idempotently; removals delete associations only.
    fn apply_tag_diff(&mut self, document_id: DocumentId, diff: &TagDiff) -> RepoResult<()>;

    /// Removes every association of one document, keeping tag rows.
    fn remove_document_tags(&mut self, document_id: DocumentId) -> RepoResult<()>;

    /// Returns the document's current tag names, sorted.
    fn tags_for_document(&self, document_id: DocumentId) -> RepoResult<Vec<String>>;

    /// Returns ids of documents carrying the tag, deterministic order.
    ///
    /// An unknown tag yields an empty list.
    fn documents_with_tag(&self, name: &str) -> RepoResult<Vec<DocumentId>>;

    /// Returns all known tag names, orphans included, sorted.
    fn list_tags(&self) -> RepoResult<Vec<String>>;

    /// Returns tag names with at least one association, sorted.
    fn list_active_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed tag repository over the shared relational connection.
#[derive(Debug)]
pub struct SqliteTagRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tag_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn apply_tag_diff(&mut self, document_id: DocumentId, diff: &TagDiff) -> RepoResult<()> {
        for name in diff.to_add.iter().chain(diff.to_remove.iter()) {
            if name.trim().is_empty() {
                return Err(RepoError::InvalidTag(name.clone()));
            }
        }

        let document = document_id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        for name in &diff.to_add {
            insert_association(&tx, document.as_str(), name)?;
        }
        for name in &diff.to_remove {
            tx.execute(
                "DELETE FROM document_tags
                 WHERE document_id = ?1
                   AND tag_id IN (SELECT id FROM tags WHERE name = ?2);",
                params![document.as_str(), name.as_str()],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn remove_document_tags(&mut self, document_id: DocumentId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM document_tags WHERE document_id = ?1;",
            [document_id.to_string()],
        )?;
        Ok(())
    }

    fn tags_for_document(&self, document_id: DocumentId) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name
             FROM document_tags dt
             INNER JOIN tags t ON t.id = dt.tag_id
             WHERE dt.document_id = ?1
             ORDER BY t.name ASC;",
        )?;
        let mut rows = stmt.query([document_id.to_string()])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(row.get(0)?);
        }
        Ok(tags)
    }

    fn documents_with_tag(&self, name: &str) -> RepoResult<Vec<DocumentId>> {
        let mut stmt = self.conn.prepare(
            "SELECT dt.document_id
             FROM document_tags dt
             INNER JOIN tags t ON t.id = dt.tag_id
             WHERE t.name = ?1
             ORDER BY dt.document_id ASC;",
        )?;
        let mut rows = stmt.query([name])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get(0)?;
            documents.push(parse_document_id(&id_text)?);
        }
        Ok(documents)
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        collect_names(self.conn, "SELECT name FROM tags ORDER BY name ASC;")
    }

    fn list_active_tags(&self) -> RepoResult<Vec<String>> {
        collect_names(
            self.conn,
            "SELECT DISTINCT t.name
             FROM tags t
             INNER JOIN document_tags dt ON dt.tag_id = t.id
             ORDER BY t.name ASC;",
        )
    }
}

fn insert_association(tx: &Transaction<'_>, document_id: &str, name: &str) -> RepoResult<()> {
    tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1);", [name])?;
    tx.execute(
        "INSERT OR IGNORE INTO document_tags (document_id, tag_id)
         SELECT ?1, id
         FROM tags
         WHERE name = ?2;",
        params![document_id, name],
    )?;
    Ok(())
}

fn collect_names(conn: &Connection, sql: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get(0)?);
    }
    Ok(names)
}

fn parse_document_id(value: &str) -> RepoResult<DocumentId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{value}` in document_tags.document_id"
        ))
    })
}

fn ensure_tag_schema_ready(conn: &Connection) -> RepoResult<()> {
    for table in ["tags", "document_tags"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["id", "name"] {
        if !table_has_column(conn, "tags", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "tags",
                column,
            });
        }
    }

    for column in ["document_id", "tag_id"] {
        if !table_has_column(conn, "document_tags", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "document_tags",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
