//! Domain model shared by the search and tag-consistency layers.
//!
//! # Responsibility
//! - Define the document shapes the engine reads and the views it emits.
//! - Keep one stable identifier type for every document reference.
//!
//! # Invariants
//! - Every document is identified by a stable `DocumentId`.
//! - The engine never mutates document rows; it only reads them.

pub mod document;
