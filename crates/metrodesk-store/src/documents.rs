//! Conversion document repository.
//!
//! Holds the document entity family in submission order. Mutated only by the
//! conversion queue; every status change goes through [`set_status`] so the
//! monotonic state machine is enforced in exactly one place.
//!
//! [`set_status`]: DocumentRepository::set_status

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use metrodesk_core::{Document, DocumentStatus, Error, Result};

/// Repository for documents moving through the conversion queue.
#[derive(Clone, Default)]
pub struct DocumentRepository {
    inner: Arc<RwLock<Vec<Document>>>,
}

impl DocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly submitted document.
    pub async fn insert(&self, document: Document) {
        let mut docs = self.inner.write().await;
        docs.push(document);
    }

    /// Fetch a snapshot of one document.
    pub async fn get(&self, id: Uuid) -> Option<Document> {
        let docs = self.inner.read().await;
        docs.iter().find(|d| d.id == id).cloned()
    }

    /// All documents in submission order.
    pub async fn list(&self) -> Vec<Document> {
        self.inner.read().await.clone()
    }

    /// Advance a document along the conversion state machine.
    ///
    /// Returns the updated document. Fails with `DocumentNotFound` when the
    /// document was removed (completion handlers rely on this to avoid
    /// resurrecting deleted entries) and `InvalidTransition` when the move
    /// would re-enter an earlier or terminal status.
    pub async fn set_status(&self, id: Uuid, next: DocumentStatus) -> Result<Document> {
        let mut docs = self.inner.write().await;
        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(Error::DocumentNotFound(id))?;

        if !doc.status.can_transition(next) {
            return Err(Error::InvalidTransition {
                from: doc.status,
                to: next,
            });
        }

        debug!(document_id = %id, from = %doc.status, to = %next, "document status change");
        doc.status = next;
        Ok(doc.clone())
    }

    /// Delete a document regardless of status. Idempotent; returns whether
    /// anything was removed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut docs = self.inner.write().await;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        docs.len() != before
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Number of documents currently in the given status.
    pub async fn count_by_status(&self, status: DocumentStatus) -> usize {
        let docs = self.inner.read().await;
        docs.iter().filter(|d| d.status == status).count()
    }
}
