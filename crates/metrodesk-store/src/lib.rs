//! # metrodesk-store
//!
//! In-memory entity store for the metrodesk session.
//!
//! This crate provides:
//! - One repository per entity family (documents, notifications, drafts)
//! - The shared session [`EventBus`] components emit projection updates on
//! - Structural write-conflict freedom: each component mutates only its own
//!   family, and each family sits behind its own `RwLock`
//!
//! ## Example
//!
//! ```rust,ignore
//! use metrodesk_store::Store;
//! use metrodesk_core::NotificationFilter;
//!
//! let store = Store::new();
//! let unread = store.notifications.list(NotificationFilter::Unread).await;
//! ```

use std::sync::Arc;

use metrodesk_core::{defaults, EventBus, SessionEvent};

pub mod collab;
pub mod documents;
pub mod notifications;

pub use collab::CollabRepository;
pub use documents::DocumentRepository;
pub use notifications::NotificationRepository;

// Re-export core types
pub use metrodesk_core::*;

/// Combined session store with all entity-family repositories.
///
/// Cheap to clone; clones share state and the event bus.
#[derive(Clone)]
pub struct Store {
    bus: Arc<EventBus>,
    /// Conversion document repository, mutated by the conversion queue.
    pub documents: DocumentRepository,
    /// Notification repository and read-state tracker.
    pub notifications: NotificationRepository,
    /// Collaborative draft repository with version history.
    pub drafts: CollabRepository,
}

impl Store {
    /// Create a store with its own event bus at the default capacity.
    pub fn new() -> Self {
        Self::with_bus(Arc::new(EventBus::new(defaults::EVENT_BUS_CAPACITY)))
    }

    /// Create a store emitting onto a caller-provided bus.
    pub fn with_bus(bus: Arc<EventBus>) -> Self {
        Self {
            documents: DocumentRepository::new(),
            notifications: NotificationRepository::new(bus.clone()),
            drafts: CollabRepository::new(bus.clone()),
            bus,
        }
    }

    /// Subscribe to session events from every component.
    pub fn events(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
        self.bus.subscribe()
    }

    /// The shared event bus, for components that emit their own events.
    pub fn bus(&self) -> Arc<EventBus> {
        self.bus.clone()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
