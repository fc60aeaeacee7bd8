//! Engine use-case services.
//!
//! # Responsibility
//! - Orchestrate extractor, differ, repositories and index into the
//!   operations the platform's HTTP handlers call.
//! - Keep handler layers decoupled from storage and index details.

pub mod search;
pub mod sync;
