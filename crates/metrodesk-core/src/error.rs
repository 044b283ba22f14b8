//! Error types for metrodesk.

use thiserror::Error;

use crate::models::DocumentStatus;

/// Result type alias using metrodesk's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for metrodesk operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conversion document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// Collaborative draft not found
    #[error("Draft not found: {0}")]
    DraftNotFound(uuid::Uuid),

    /// A draft exists but the requested version does not
    #[error("Version {version} not found for draft {draft_id}")]
    VersionNotFound { draft_id: uuid::Uuid, version: i32 },

    /// Notification not found
    #[error("Notification not found: {0}")]
    NotificationNotFound(uuid::Uuid),

    /// Attempted a status change the conversion state machine forbids
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },

    /// Two writers raced on the same draft. Serialization is structural, so
    /// seeing this means a contract violation, not a recoverable condition.
    #[error("Concurrent conflict: {0}")]
    ConcurrentConflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the caller can recover by retrying with corrected input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::ConcurrentConflict(_) | Error::Internal(_))
    }
}
