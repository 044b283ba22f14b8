//! Notification center: read-state tracking over the notification family.
//!
//! Notifications arrive from an external event source (or session seeding)
//! and are never deleted here. The only mutation is the one-way read flip,
//! single or bulk. `mark_all_read` holds the write guard for the whole
//! operation, so a concurrent `list` never observes a half-flipped state.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use metrodesk_core::{
    EventBus, NewNotification, Notification, NotificationFilter, Priority, SessionEvent,
};

/// Repository for notifications and their read-state lifecycle.
#[derive(Clone)]
pub struct NotificationRepository {
    inner: Arc<RwLock<Vec<Notification>>>,
    bus: Arc<EventBus>,
}

impl NotificationRepository {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
            bus,
        }
    }

    /// Push a notification into the store (external source boundary).
    pub async fn insert(&self, new: NewNotification) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            title: new.title,
            message: new.message,
            timestamp: new.timestamp.unwrap_or_else(Utc::now),
            priority: new.priority,
            category: new.category,
            read: false,
        };

        let mut items = self.inner.write().await;
        items.push(notification.clone());
        notification
    }

    /// Filtered view, most recent first.
    ///
    /// Equal timestamps keep their original insertion order (stable sort over
    /// the insertion-ordered family).
    pub async fn list(&self, filter: NotificationFilter) -> Vec<Notification> {
        let items = self.inner.read().await;
        let mut view: Vec<Notification> = items
            .iter()
            .filter(|n| match filter {
                NotificationFilter::All => true,
                NotificationFilter::Unread => !n.read,
                NotificationFilter::HighPriority => n.priority == Priority::High,
            })
            .cloned()
            .collect();
        view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        view
    }

    /// Flip one notification to read. No-op when the id is absent or the
    /// notification was already read; returns whether state changed.
    pub async fn mark_read(&self, id: Uuid) -> bool {
        let mut items = self.inner.write().await;
        let Some(notification) = items.iter_mut().find(|n| n.id == id) else {
            debug!(notification_id = %id, "mark_read on unknown notification ignored");
            return false;
        };
        if notification.read {
            return false;
        }
        notification.read = true;
        drop(items);

        self.bus
            .emit(SessionEvent::NotificationRead { notification_id: id });
        true
    }

    /// Flip every unread notification in one logical operation.
    ///
    /// Returns the number of notifications that changed state.
    pub async fn mark_all_read(&self) -> usize {
        let mut items = self.inner.write().await;
        let mut flipped = 0;
        for notification in items.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            flipped += 1;
        }
        drop(items);

        if flipped > 0 {
            self.bus.emit(SessionEvent::NotificationsAllRead {
                count: flipped as i64,
            });
        }
        flipped
    }

    /// Live count of notifications with `read == false`.
    pub async fn unread_count(&self) -> usize {
        let items = self.inner.read().await;
        items.iter().filter(|n| !n.read).count()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
