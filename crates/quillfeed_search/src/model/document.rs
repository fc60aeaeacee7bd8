//! Document domain model.
//!
//! # Responsibility
//! - Define the read-side document record the engine borrows from the
//!   platform's relational store.
//! - Define the view records returned from search results.
//!
//! # Invariants
//! - `id` is stable and never reused for another document.
//! - `visibility` is the source of truth for search-result filtering.
//! - Timestamps are Unix epoch milliseconds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a document.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type DocumentId = Uuid;

/// Audience of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Readable by everyone, including anonymous callers.
    Public,
    /// Readable only by the owning author.
    Private,
}

impl Visibility {
    pub fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

/// Read model of a document as the engine sees it.
///
/// The platform's CRUD layer owns these rows; the engine reads them for
/// visibility filtering, tag synchronization input and view assembly. The
/// denormalized counters are never written from here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable global ID.
    pub id: DocumentId,
    /// Username of the owning author.
    pub author: String,
    /// Audience flag checked during result assembly.
    pub visibility: Visibility,
    /// Raw markdown body.
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub edited_at: i64,
    /// Denormalized like counter, owned by the CRUD layer.
    pub like_count: i64,
    /// Denormalized comment counter, owned by the CRUD layer.
    pub comment_count: i64,
}

impl Document {
    /// Returns whether `caller` may see this document in search results.
    ///
    /// Private documents are visible only to their owning author.
    pub fn visible_to(&self, caller: Option<&str>) -> bool {
        match self.visibility {
            Visibility::Public => true,
            Visibility::Private => caller == Some(self.author.as_str()),
        }
    }

    /// Returns the composite key this document is indexed under.
    pub fn doc_key(&self) -> String {
        doc_key(&self.author, self.id)
    }
}

/// Builds the inverted-index key for a document.
///
/// Owner identity concatenated with the document ID keeps keys globally
/// unique without a central allocator.
pub fn doc_key(owner: &str, id: DocumentId) -> String {
    format!("{owner}/{id}")
}

/// Author summary embedded in a [`DocumentView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorView {
    pub username: String,
    pub nickname: String,
    /// Whether the caller follows this author.
    pub followed_by_caller: bool,
}

/// Search-result view of a document, assembled per caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentView {
    pub document_id: DocumentId,
    pub author: AuthorView,
    pub is_private: bool,
    pub content: String,
    pub created_at: i64,
    pub edited_at: i64,
    pub like_count: i64,
    pub comment_count: i64,
    /// Whether the caller has liked this document.
    pub liked_by_caller: bool,
}
