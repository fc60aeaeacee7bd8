//! Tag synchronization service.
//!
//! # Responsibility
//! - Keep `document_tags` consistent with a document's current content on
//!   every write, and clean associations up on delete.
//!
//! # Invariants
//! - Application is all-or-nothing; a failed sync leaves the persisted tag
//!   state untouched and surfaces a single error.
//! - Tag rows survive the removal of their last association.
//! - Unchanged content never opens a transaction.

use crate::model::document::DocumentId;
use crate::repo::tag_repo::{RepoError, TagRepository};
use crate::tags::diff::diff_tags;
use crate::tags::extract::extract_tags;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SyncResult<T> = Result<T, SyncError>;

/// Tag synchronization failure; the transaction was fully rolled back.
#[derive(Debug)]
pub enum SyncError {
    Transaction(RepoError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transaction(err) => write!(f, "tag synchronization failed: {err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transaction(err) => Some(err),
        }
    }
}

impl From<RepoError> for SyncError {
    fn from(value: RepoError) -> Self {
        Self::Transaction(value)
    }
}

/// What one synchronization changed, for handler logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSyncOutcome {
    /// Tags newly associated with the document, sorted.
    pub added: Vec<String>,
    /// Tags whose association was removed, sorted.
    pub removed: Vec<String>,
}

impl TagSyncOutcome {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Service keeping tag associations consistent with document content.
pub struct TagSyncService<R: TagRepository> {
    repo: R,
}

impl<R: TagRepository> TagSyncService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Synchronizes tag associations after a document create or edit.
    ///
    /// Pass empty `old_content` for a newly created document. Extraction
    /// and diffing are pure; the diff is applied in one transaction.
    pub fn sync_tags(
        &mut self,
        document_id: DocumentId,
        old_content: &str,
        new_content: &str,
    ) -> SyncResult<TagSyncOutcome> {
        let old_tags = extract_tags(old_content);
        let new_tags = extract_tags(new_content);
        let diff = diff_tags(&old_tags, &new_tags);

        if diff.is_empty() {
            debug!("event=tag_sync module=service status=ok document={document_id} added=0 removed=0");
            return Ok(TagSyncOutcome::default());
        }

        if let Err(err) = self.repo.apply_tag_diff(document_id, &diff) {
            error!("event=tag_sync module=service status=error document={document_id} error={err}");
            return Err(err.into());
        }

        info!(
            "event=tag_sync module=service status=ok document={document_id} added={} removed={}",
            diff.to_add.len(),
            diff.to_remove.len()
        );
        Ok(TagSyncOutcome {
            added: diff.to_add.into_iter().collect(),
            removed: diff.to_remove.into_iter().collect(),
        })
    }

    /// Removes all of a document's associations after it is deleted.
    ///
    /// Tag rows stay in place; only the links go.
    pub fn on_document_delete(&mut self, document_id: DocumentId) -> SyncResult<()> {
        if let Err(err) = self.repo.remove_document_tags(document_id) {
            error!(
                "event=tag_cleanup module=service status=error document={document_id} error={err}"
            );
            return Err(err.into());
        }
        info!("event=tag_cleanup module=service status=ok document={document_id}");
        Ok(())
    }
}
