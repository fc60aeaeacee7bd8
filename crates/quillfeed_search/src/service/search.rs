//! Search facade wiring planner, sources and assembler.
//!
//! # Responsibility
//! - Validate and normalize search requests from the handler layer.
//! - Execute term resolution and result assembly end to end.
//!
//! # Invariants
//! - An empty keyword is rejected before any source is touched.
//! - "No results" is a successful empty page, never an error.

use crate::index::search_index::SearchIndex;
use crate::query::assemble::{assemble, SearchPage};
use crate::query::planner::{plan, resolve_terms};
use crate::query::{SearchError, SearchResult};
use crate::repo::tag_repo::TagRepository;
use crate::store::DocumentStore;
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;

/// Page size applied when the caller passes `0`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
const PAGE_SIZE_MAX: u32 = 100;

/// Normalizes one page-size value according to the search contract.
pub fn normalize_page_size(page_size: u32) -> u32 {
    match page_size {
        0 => DEFAULT_PAGE_SIZE,
        value if value > PAGE_SIZE_MAX => PAGE_SIZE_MAX,
        value => value,
    }
}

/// Search service facade over the document store, tag rows and index.
pub struct SearchService<S: DocumentStore, R: TagRepository> {
    store: S,
    tags: R,
    index: Arc<SearchIndex>,
}

impl<S: DocumentStore, R: TagRepository> SearchService<S, R> {
    /// Creates a service around the injected process-wide index handle.
    pub fn new(store: S, tags: R, index: Arc<SearchIndex>) -> Self {
        Self { store, tags, index }
    }

    /// Runs one multi-term search and returns the requested page.
    ///
    /// Terms are intersected (AND); private documents are returned only to
    /// their owner; `max_page` reflects the total filtered count.
    pub fn search(
        &self,
        raw_query: &str,
        caller: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> SearchResult<SearchPage> {
        let terms = plan(raw_query);
        if terms.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let applied_page_size = normalize_page_size(page_size);
        let started_at = Instant::now();

        let ids = match resolve_terms(&terms, &self.store, &self.tags, self.index.as_ref()) {
            Ok(ids) => ids,
            Err(err) => {
                error!(
                    "event=search module=service status=error stage=resolve terms={} error={err}",
                    terms.len()
                );
                return Err(err);
            }
        };

        match assemble(&self.store, &ids, caller, page, applied_page_size) {
            Ok(result) => {
                info!(
                    "event=search module=service status=ok terms={} candidates={} page={page} returned={} duration_ms={}",
                    terms.len(),
                    ids.len(),
                    result.items.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(result)
            }
            Err(err) => {
                error!(
                    "event=search module=service status=error stage=assemble terms={} error={err}",
                    terms.len()
                );
                Err(err)
            }
        }
    }
}
