//! Content search and tag-consistency engine for the Quillfeed platform.
//!
//! This crate owns hashtag extraction, transactional tag synchronization,
//! the inverted full-text index, and the multi-term search pipeline. The
//! surrounding platform's CRUD layer stays behind the [`store::DocumentStore`]
//! seam.

pub mod config;
pub mod db;
pub mod index;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod store;
pub mod tags;

pub use config::{ConfigError, EngineConfig};
pub use index::search_index::{IndexError, IndexHit, IndexResult, SearchIndex};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{
    doc_key, AuthorView, Document, DocumentId, DocumentView, Visibility,
};
pub use query::assemble::{assemble, max_page, SearchPage};
pub use query::planner::{plan, resolve_terms, SearchTerm};
pub use query::{SearchError, SearchResult};
pub use repo::tag_repo::{RepoError, RepoResult, SqliteTagRepository, TagRepository};
pub use service::search::{normalize_page_size, SearchService, DEFAULT_PAGE_SIZE};
pub use service::sync::{SyncError, SyncResult, TagSyncOutcome, TagSyncService};
pub use store::{DocumentStore, StoreError, StoreResult};
pub use tags::diff::{diff_tags, TagDiff};
pub use tags::extract::extract_tags;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the engine crate version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
