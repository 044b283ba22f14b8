//! Session event types and event bus for projection updates.
//!
//! Aggregates events from every component (conversion queue, notification
//! center, draft store, search engine) into a single broadcast channel so a
//! presentation layer can subscribe once and re-render the affected
//! projection.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Unified session event type.
///
/// Serialized as JSON with a `type` tag field, e.g.:
/// `{"type":"ConversionCompleted","document_id":"..."}`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A document was accepted into the conversion queue.
    ConversionQueued { document_id: Uuid, name: String },
    /// A document's conversion started.
    ConversionStarted { document_id: Uuid },
    /// A document converted successfully.
    ConversionCompleted {
        document_id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<i64>,
    },
    /// A document's conversion failed (terminal, not an error condition).
    ConversionFailed { document_id: Uuid, error: String },
    /// A document was deleted from the queue.
    DocumentRemoved { document_id: Uuid },
    /// A single notification was marked read.
    NotificationRead { notification_id: Uuid },
    /// Every unread notification was flipped in one operation.
    NotificationsAllRead { count: i64 },
    /// A draft save recorded a new version snapshot.
    DraftSaved { draft_id: Uuid, version: i32 },
    /// A historical version was restored as a new snapshot.
    DraftRestored {
        draft_id: Uuid,
        from_version: i32,
        new_version: i32,
    },
    /// A search was initiated.
    SearchStarted { generation: u64 },
    /// A search's results became current. Superseded searches emit nothing.
    SearchCompleted { generation: u64, result_count: usize },
}

impl SessionEvent {
    /// Returns the event type name (used for subscriber-side filtering).
    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::ConversionQueued { .. } => "ConversionQueued",
            SessionEvent::ConversionStarted { .. } => "ConversionStarted",
            SessionEvent::ConversionCompleted { .. } => "ConversionCompleted",
            SessionEvent::ConversionFailed { .. } => "ConversionFailed",
            SessionEvent::DocumentRemoved { .. } => "DocumentRemoved",
            SessionEvent::NotificationRead { .. } => "NotificationRead",
            SessionEvent::NotificationsAllRead { .. } => "NotificationsAllRead",
            SessionEvent::DraftSaved { .. } => "DraftSaved",
            SessionEvent::DraftRestored { .. } => "DraftRestored",
            SessionEvent::SearchStarted { .. } => "SearchStarted",
            SessionEvent::SearchCompleted { .. } => "SearchCompleted",
        }
    }

    /// Returns the entity family this event relates to.
    pub fn entity_type(&self) -> Option<&'static str> {
        match self {
            SessionEvent::ConversionQueued { .. }
            | SessionEvent::ConversionStarted { .. }
            | SessionEvent::ConversionCompleted { .. }
            | SessionEvent::ConversionFailed { .. }
            | SessionEvent::DocumentRemoved { .. } => Some("document"),
            SessionEvent::NotificationRead { .. } | SessionEvent::NotificationsAllRead { .. } => {
                Some("notification")
            }
            SessionEvent::DraftSaved { .. } | SessionEvent::DraftRestored { .. } => Some("draft"),
            SessionEvent::SearchStarted { .. } | SessionEvent::SearchCompleted { .. } => None,
        }
    }

    /// Returns the primary entity ID this event relates to.
    pub fn entity_id(&self) -> Option<Uuid> {
        match self {
            SessionEvent::ConversionQueued { document_id, .. }
            | SessionEvent::ConversionStarted { document_id }
            | SessionEvent::ConversionCompleted { document_id, .. }
            | SessionEvent::ConversionFailed { document_id, .. }
            | SessionEvent::DocumentRemoved { document_id } => Some(*document_id),
            SessionEvent::NotificationRead { notification_id } => Some(*notification_id),
            SessionEvent::DraftSaved { draft_id, .. }
            | SessionEvent::DraftRestored { draft_id, .. } => Some(*draft_id),
            SessionEvent::NotificationsAllRead { .. }
            | SessionEvent::SearchStarted { .. }
            | SessionEvent::SearchCompleted { .. } => None,
        }
    }
}

/// Broadcast-based event bus for distributing session events.
///
/// Uses `tokio::sync::broadcast` with a configurable buffer size. Slow
/// receivers that fall behind get a `Lagged` error and miss events; for a
/// projection-refresh stream freshness matters more than completeness.
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    ///
    /// Recommended: 256 for a live session, 32 for tests.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers.
    ///
    /// If there are no active subscribers, the event is silently dropped.
    pub fn emit(&self, event: SessionEvent) {
        tracing::debug!(
            event_type = event.event_type(),
            subscriber_count = self.tx.receiver_count(),
            "event emitted"
        );
        let _ = self.tx.send(event);
    }

    /// Subscribe to events. Each subscriber gets an independent stream.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::defaults::EVENT_BUS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_emit_subscribe() {
        let bus = EventBus::new(32);
        let mut rx = bus.subscribe();

        bus.emit(SessionEvent::ConversionQueued {
            document_id: Uuid::nil(),
            name: "report.pdf".to_string(),
        });

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SessionEvent::ConversionQueued { .. }));
        assert_eq!(event.event_type(), "ConversionQueued");
        assert_eq!(event.entity_type(), Some("document"));
        assert_eq!(event.entity_id(), Some(Uuid::nil()));
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new(32);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(SessionEvent::DraftSaved {
            draft_id: Uuid::nil(),
            version: 2,
        });

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert!(matches!(e1, SessionEvent::DraftSaved { version: 2, .. }));
        assert!(matches!(e2, SessionEvent::DraftSaved { version: 2, .. }));
    }

    #[tokio::test]
    async fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::new(32);
        // Should not panic even with no subscribers
        bus.emit(SessionEvent::NotificationsAllRead { count: 0 });
    }

    #[tokio::test]
    async fn test_event_bus_subscriber_count() {
        let bus = EventBus::new(32);
        assert_eq!(bus.subscriber_count(), 0);

        let _rx1 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(_rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_event_bus_lagged_receiver() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();

        for i in 0..5 {
            bus.emit(SessionEvent::SearchStarted { generation: i });
        }

        let result = rx.recv().await;
        assert!(result.is_ok() || matches!(result, Err(broadcast::error::RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_json_serialization() {
        let event = SessionEvent::ConversionFailed {
            document_id: Uuid::nil(),
            error: "unreadable input".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"ConversionFailed"#));
        assert!(json.contains(r#""error":"unreadable input"#));
    }

    #[test]
    fn test_event_completed_duration_skipped_when_none() {
        let event = SessionEvent::ConversionCompleted {
            document_id: Uuid::nil(),
            duration_ms: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("duration_ms"));

        let event = SessionEvent::ConversionCompleted {
            document_id: Uuid::nil(),
            duration_ms: Some(2500),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""duration_ms":2500"#));
    }

    #[test]
    fn test_entity_type_and_id() {
        let id = Uuid::new_v4();
        let event = SessionEvent::NotificationRead {
            notification_id: id,
        };
        assert_eq!(event.entity_type(), Some("notification"));
        assert_eq!(event.entity_id(), Some(id));

        let event = SessionEvent::SearchCompleted {
            generation: 3,
            result_count: 12,
        };
        assert_eq!(event.entity_type(), None);
        assert_eq!(event.entity_id(), None);

        let event = SessionEvent::NotificationsAllRead { count: 4 };
        assert_eq!(event.entity_type(), Some("notification"));
        assert_eq!(event.entity_id(), None);
    }
}
