//! Hashtag extraction and set diffing.
//!
//! # Responsibility
//! - Turn free-form document content into an ordered set of tag tokens.
//! - Compute additions/removals between two tag sets.
//!
//! # Invariants
//! - Both operations are pure and never fail.
//! - Tag tokens keep their leading `#` and exact case everywhere.

pub mod diff;
pub mod extract;
