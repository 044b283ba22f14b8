//! Centralized default constants for the metrodesk system.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// CONVERSION SIMULATION
// =============================================================================

/// Minimum simulated conversion delay in milliseconds.
pub const CONVERT_DELAY_MIN_MS: u64 = 2_000;

/// Maximum simulated conversion delay in milliseconds.
pub const CONVERT_DELAY_MAX_MS: u64 = 5_000;

/// Probability that a simulated conversion succeeds.
///
/// Stand-in for the real backend's observed success ratio; configurable via
/// `SimulationConfig`, never a business rule.
pub const CONVERT_SUCCESS_RATE: f64 = 0.9;

// =============================================================================
// SEARCH
// =============================================================================

/// Minimum simulated search latency in milliseconds.
pub const SEARCH_LATENCY_MIN_MS: u64 = 400;

/// Maximum simulated search latency in milliseconds.
pub const SEARCH_LATENCY_MAX_MS: u64 = 1_500;

/// Snippet/preview length in characters for search results.
pub const SNIPPET_LENGTH: usize = 200;

/// Relevance score ceiling. Scores are expressed on a 0-100 scale.
pub const RELEVANCE_MAX: f32 = 100.0;

// =============================================================================
// EVENTS
// =============================================================================

/// Default event bus broadcast channel capacity.
pub const EVENT_BUS_CAPACITY: usize = 256;

// =============================================================================
// UPLOADS
// =============================================================================

/// Maximum advertised upload size in bytes (50 MB).
///
/// The queue still accepts anything the upload surface hands over; oversized
/// or unreadable files resolve through the normal failure path.
pub const MAX_UPLOAD_SIZE_BYTES: u64 = 50 * 1024 * 1024;
