//! External relational collaborator seam.
//!
//! # Responsibility
//! - Define the read-side contract the platform's CRUD layer fulfils:
//!   document fetch, author lookup, and per-caller view conversion.
//!
//! # Invariants
//! - The engine never writes through this seam.
//! - An absent document or author is `Ok` data, not an error; errors are
//!   reserved for transport and integrity failures.

use crate::model::document::{Document, DocumentId, DocumentView};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure surfaced by the platform-owned document store.
#[derive(Debug)]
pub enum StoreError {
    /// The store could not be reached or the query failed.
    Unavailable(String),
    /// A persisted row violates the documented shape.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "document store unavailable: {message}"),
            Self::InvalidData(message) => write!(f, "invalid document store row: {message}"),
        }
    }
}

impl Error for StoreError {}

/// Read access to platform-owned document rows.
///
/// Implemented by the surrounding system over its relational store; the
/// engine only depends on this trait.
pub trait DocumentStore {
    /// Fetches one document, `None` when it does not exist.
    fn get_document(&self, id: DocumentId) -> StoreResult<Option<Document>>;

    /// Lists ids of documents authored by `username`, source order.
    ///
    /// An unknown author yields an empty list.
    fn documents_by_author(&self, username: &str) -> StoreResult<Vec<DocumentId>>;

    /// Converts a document into its caller-specific view, including the
    /// author summary and whether the caller has liked it.
    fn to_view(&self, document: &Document, caller: Option<&str>) -> StoreResult<DocumentView>;
}
