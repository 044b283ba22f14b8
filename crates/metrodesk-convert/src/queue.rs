//! Conversion queue: submission, per-document deferred completion, removal.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use metrodesk_core::{
    ConversionSettings, Document, DocumentStatus, Error, EventBus, FileUpload, SessionEvent,
};
use metrodesk_store::Store;

use crate::backend::{ConversionBackend, ConversionOutcome, ConversionRequest};

/// Drives documents through the conversion state machine.
///
/// Each submitted document gets its own spawned task, so completions are
/// scheduled independently: nothing serializes them globally and one
/// document's failure never touches another. Task handles are kept in a
/// per-id registry so [`remove`] can abort a conversion that is still in
/// flight.
///
/// [`remove`]: ConversionQueue::remove
pub struct ConversionQueue {
    store: Store,
    backend: Arc<dyn ConversionBackend>,
    bus: Arc<EventBus>,
    tasks: Arc<RwLock<HashMap<Uuid, JoinHandle<()>>>>,
}

impl ConversionQueue {
    /// Create a queue over the given store and backend. Events go to the
    /// store's bus.
    pub fn new(store: Store, backend: Arc<dyn ConversionBackend>) -> Self {
        let bus = store.bus();
        Self {
            store,
            backend,
            bus,
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Accept a batch of uploads for conversion.
    ///
    /// One document per file is created in `Queued`, immediately moved to
    /// `Processing`, and scheduled for deferred completion. Never fails from
    /// the caller's view; unreadable files surface later as a `Failed`
    /// status.
    pub async fn submit(
        &self,
        files: Vec<FileUpload>,
        settings: &ConversionSettings,
    ) -> Vec<Document> {
        let mut submitted = Vec::with_capacity(files.len());

        for file in files {
            let document = Document::from_upload(&file, settings);
            let id = document.id;
            self.store.documents.insert(document.clone()).await;
            self.bus.emit(SessionEvent::ConversionQueued {
                document_id: id,
                name: document.name.clone(),
            });

            match self
                .store
                .documents
                .set_status(id, DocumentStatus::Processing)
                .await
            {
                Ok(processing) => {
                    self.bus
                        .emit(SessionEvent::ConversionStarted { document_id: id });
                    self.spawn_conversion(&processing, file).await;
                    submitted.push(processing);
                }
                Err(e) => {
                    // Only reachable if the document vanished between insert
                    // and start; report what was created.
                    debug!(document_id = %id, error = %e, "document gone before conversion start");
                    submitted.push(document);
                }
            }
        }

        info!(count = submitted.len(), "submitted conversion batch");
        submitted
    }

    /// Delete a document regardless of status, aborting its conversion if
    /// one is still in flight. Idempotent; removing an unknown id is a no-op.
    pub async fn remove(&self, id: Uuid) -> bool {
        if let Some(handle) = self.tasks.write().await.remove(&id) {
            // A handle that already finished aborts as a no-op.
            handle.abort();
        }

        let removed = self.store.documents.remove(id).await;
        if removed {
            info!(document_id = %id, "document removed");
            self.bus
                .emit(SessionEvent::DocumentRemoved { document_id: id });
        }
        removed
    }

    /// Number of documents still converting.
    pub async fn in_flight(&self) -> usize {
        self.store
            .documents
            .count_by_status(DocumentStatus::Processing)
            .await
    }

    /// Wait for every in-flight conversion to resolve.
    ///
    /// Aborted tasks count as resolved. Mainly useful to tests and shutdown
    /// paths that need a barrier without guessing at delay windows.
    pub async fn drain(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.write().await;
            tasks.drain().map(|(_, handle)| handle).collect()
        };
        for result in futures::future::join_all(handles).await {
            // Cancelled joins come from remove(); anything else is a panic
            // inside a completion task.
            if let Err(e) = result {
                if !e.is_cancelled() {
                    error!(error = ?e, "conversion task panicked");
                }
            }
        }
    }

    /// Spawn the deferred completion task for one document.
    async fn spawn_conversion(&self, document: &Document, file: FileUpload) {
        let request = ConversionRequest {
            document_id: document.id,
            file,
            source_format: document.source_format,
            target_format: document.target_format,
            quality: document.quality,
            ocr_enabled: document.ocr_enabled,
        };

        let id = document.id;
        let store = self.store.clone();
        let bus = self.bus.clone();
        let backend = self.backend.clone();
        let tasks = self.tasks.clone();

        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let outcome = backend.convert(request).await;
            let next = match &outcome {
                ConversionOutcome::Converted => DocumentStatus::Converted,
                ConversionOutcome::Failed(_) => DocumentStatus::Failed,
            };

            // The document may have been removed while the backend worked;
            // a completion for a deleted document must not resurrect it.
            match store.documents.set_status(id, next).await {
                Ok(_) => match outcome {
                    ConversionOutcome::Converted => {
                        bus.emit(SessionEvent::ConversionCompleted {
                            document_id: id,
                            duration_ms: Some(started.elapsed().as_millis() as i64),
                        });
                    }
                    ConversionOutcome::Failed(reason) => {
                        bus.emit(SessionEvent::ConversionFailed {
                            document_id: id,
                            error: reason,
                        });
                    }
                },
                Err(Error::DocumentNotFound(_)) => {
                    debug!(document_id = %id, "completion dropped, document was removed");
                }
                Err(e) => {
                    error!(document_id = %id, error = %e, "conversion completion rejected");
                }
            }

            tasks.write().await.remove(&id);
        });

        self.tasks.write().await.insert(id, handle);
    }
}
