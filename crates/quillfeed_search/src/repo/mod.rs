//! Repository layer for engine-owned tag persistence.
//!
//! # Responsibility
//! - Define the tag data-access contract and its SQLite implementation.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Association writes are transactional; partial diffs are never visible.
//! - Tag rows are never deleted here; orphan tags are a supported state.

pub mod tag_repo;
