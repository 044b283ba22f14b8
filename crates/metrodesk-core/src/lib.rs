//! # metrodesk-core
//!
//! Core types, events, and abstractions for the metrodesk workflow console.
//!
//! This crate provides the domain entities, error taxonomy, default
//! constants, and the session event bus that the other metrodesk crates
//! depend on.

pub mod defaults;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{EventBus, SessionEvent};
pub use models::*;
