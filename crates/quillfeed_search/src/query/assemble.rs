//! Result assembly: visibility filtering, pagination and view mapping.
//!
//! # Responsibility
//! - Turn resolved document ids into one page of caller-specific views.
//! - Compute the zero-indexed last page from the total filtered count.
//!
//! # Invariants
//! - Private documents survive filtering only for their owner.
//! - Candidate order is preserved; assembly never reorders.
//! - Ids unknown to the store are dropped silently (stale index hits),
//!   store failures abort the whole search.

use crate::model::document::{DocumentId, DocumentView};
use crate::query::SearchResult;
use crate::store::DocumentStore;
use std::collections::HashSet;

/// One page of search results plus the last valid page index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub items: Vec<DocumentView>,
    /// Zero-indexed last page of the filtered result set; `0` when empty.
    pub max_page: u32,
}

/// Filters, paginates and maps resolved candidates into views.
pub fn assemble<S: DocumentStore>(
    store: &S,
    document_ids: &[DocumentId],
    caller: Option<&str>,
    page: u32,
    page_size: u32,
) -> SearchResult<SearchPage> {
    let mut seen = HashSet::new();
    let mut visible = Vec::new();
    for id in document_ids {
        if !seen.insert(*id) {
            continue;
        }
        let Some(document) = store.get_document(*id)? else {
            // Index entries can outlive their documents.
            continue;
        };
        if document.visible_to(caller) {
            visible.push(document);
        }
    }

    let max_page = max_page(visible.len() as u64, page_size);
    let start = (page as usize).saturating_mul(page_size as usize);
    let mut items = Vec::with_capacity(page_size as usize);
    for document in visible.iter().skip(start).take(page_size as usize) {
        items.push(store.to_view(document, caller)?);
    }

    Ok(SearchPage { items, max_page })
}

/// Returns the zero-indexed last valid page for `total` filtered results.
///
/// Mirrors the pagination convention of the surrounding CRUD layer: an
/// exact multiple of `page_size` ends one page earlier, and an empty
/// result set still reports page `0`.
pub fn max_page(total: u64, page_size: u32) -> u32 {
    if total == 0 || page_size == 0 {
        return 0;
    }
    let page_size = u64::from(page_size);
    let last = if total % page_size == 0 {
        total / page_size - 1
    } else {
        total / page_size
    };
    u32::try_from(last).unwrap_or(u32::MAX)
}
