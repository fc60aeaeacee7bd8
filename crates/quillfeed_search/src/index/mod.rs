//! Inverted full-text index over document content snapshots.
//!
//! # Responsibility
//! - Expose the engine-owned index store and its query API.
//! - Keep index result shaping inside the engine.

pub mod search_index;
