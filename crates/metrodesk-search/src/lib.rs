//! # metrodesk-search
//!
//! Search and filter engine for metrodesk.
//!
//! This crate provides:
//! - The corpus-provider seam (relevance is computed upstream)
//! - Conjunctive type/department filtering over scored candidates
//! - Deterministic ranking: relevance, then recency, then corpus order
//! - Deferred searches with an observable `Searching` state and
//!   last-writer-wins supersession of overlapping queries

pub mod corpus;
pub mod engine;
pub mod rank;

// Re-export core types
pub use metrodesk_core::*;

pub use corpus::{CorpusDocument, CorpusProvider, StaticCorpus};
pub use engine::{SearchConfig, SearchEngine, SearchState};
pub use rank::rank_results;
