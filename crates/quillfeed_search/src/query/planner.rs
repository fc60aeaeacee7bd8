//! Query planning: term classification and candidate resolution.
//!
//! # Responsibility
//! - Split a raw query into classified [`SearchTerm`]s.
//! - Resolve each term against its source and intersect the results.
//!
//! # Invariants
//! - Multi-term queries use AND semantics; the first term's order is
//!   preserved through every intersection.
//! - An unknown tag or author resolves to an empty set, not an error, and
//!   empties short-circuit the whole resolution.

use crate::index::search_index::SearchIndex;
use crate::model::document::DocumentId;
use crate::query::SearchResult;
use crate::repo::tag_repo::TagRepository;
use crate::store::DocumentStore;
use std::collections::HashSet;

/// One classified unit of a raw search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// `#`-prefixed token; the value keeps the `#`.
    Tag(String),
    /// `@`-prefixed token; the value drops the `@`.
    Author(String),
    /// Everything else, matched against the inverted index.
    FreeText(String),
}

/// Splits a raw query on spaces and classifies each surviving token.
pub fn plan(raw_query: &str) -> Vec<SearchTerm> {
    raw_query
        .split(' ')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(classify)
        .collect()
}

fn classify(token: &str) -> SearchTerm {
    if token.starts_with('#') {
        SearchTerm::Tag(token.to_string())
    } else if let Some(author) = token.strip_prefix('@') {
        SearchTerm::Author(author.to_string())
    } else {
        SearchTerm::FreeText(token.to_string())
    }
}

/// Resolves classified terms to the intersection of their candidate sets.
///
/// The returned ids are deduplicated, in the first term's source order
/// (full-text relevance order when the first term is free text).
pub fn resolve_terms<S, R>(
    terms: &[SearchTerm],
    store: &S,
    tags: &R,
    index: &SearchIndex,
) -> SearchResult<Vec<DocumentId>>
where
    S: DocumentStore,
    R: TagRepository,
{
    let mut merged: Vec<DocumentId> = Vec::new();

    for (position, term) in terms.iter().enumerate() {
        let candidates = resolve_one(term, store, tags, index)?;
        if position == 0 {
            let mut seen = HashSet::new();
            merged = candidates
                .into_iter()
                .filter(|id| seen.insert(*id))
                .collect();
        } else {
            let keep: HashSet<DocumentId> = candidates.into_iter().collect();
            merged.retain(|id| keep.contains(id));
        }
        if merged.is_empty() {
            // The intersection can never grow again.
            return Ok(Vec::new());
        }
    }

    Ok(merged)
}

fn resolve_one<S, R>(
    term: &SearchTerm,
    store: &S,
    tags: &R,
    index: &SearchIndex,
) -> SearchResult<Vec<DocumentId>>
where
    S: DocumentStore,
    R: TagRepository,
{
    match term {
        SearchTerm::Tag(name) => Ok(tags.documents_with_tag(name)?),
        SearchTerm::Author(username) => Ok(store.documents_by_author(username)?),
        SearchTerm::FreeText(text) => Ok(index
            .search(text)?
            .into_iter()
            .map(|hit| hit.document_id)
            .collect()),
    }
}
