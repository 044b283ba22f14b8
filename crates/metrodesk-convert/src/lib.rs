//! # metrodesk-convert
//!
//! Conversion queue manager for metrodesk.
//!
//! This crate provides:
//! - Batch submission of uploads into the per-document conversion state
//!   machine (`queued -> processing -> {converted | failed}`)
//! - Independently scheduled deferred completions, one task per document
//! - Removal that aborts an in-flight conversion and never lets its stale
//!   completion resurrect the document
//! - A backend seam with a randomized simulation, swappable for a real
//!   converter
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use metrodesk_convert::{ConversionQueue, SimulatedBackend};
//! use metrodesk_core::{ConversionSettings, FileUpload};
//! use metrodesk_store::Store;
//!
//! let store = Store::new();
//! let queue = ConversionQueue::new(store.clone(), Arc::new(SimulatedBackend::default()));
//!
//! let files = vec![FileUpload::new("report.docx", "application/msword", 120_000)];
//! let documents = queue.submit(files, &ConversionSettings::default()).await;
//! ```

pub mod backend;
pub mod queue;

// Re-export core types
pub use metrodesk_core::*;

pub use backend::{
    ConversionBackend, ConversionOutcome, ConversionRequest, InstantBackend, SimulatedBackend,
    SimulationConfig,
};
pub use queue::ConversionQueue;
