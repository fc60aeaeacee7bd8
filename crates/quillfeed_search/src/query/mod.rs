//! Query planning and result assembly.
//!
//! # Responsibility
//! - Turn a raw query string into classified terms and resolve them to
//!   candidate documents (AND semantics across terms).
//! - Filter, paginate and map candidates into caller-specific views.
//!
//! # Invariants
//! - Term resolution and assembly have no persisted side effects; a
//!   cancelled search leaves nothing behind.
//! - A failed lookup aborts the whole search; pages are never silently
//!   partial.

use crate::index::search_index::IndexError;
use crate::repo::tag_repo::RepoError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod assemble;
pub mod planner;

pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error covering planning, resolution and assembly.
#[derive(Debug)]
pub enum SearchError {
    /// The raw query contained no usable terms.
    EmptyQuery,
    Repo(RepoError),
    Store(StoreError),
    Index(IndexError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyQuery => write!(f, "search keyword is empty"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Index(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyQuery => None,
            Self::Repo(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Index(err) => Some(err),
        }
    }
}

impl From<RepoError> for SearchError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<StoreError> for SearchError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<IndexError> for SearchError {
    fn from(value: IndexError) -> Self {
        Self::Index(value)
    }
}
