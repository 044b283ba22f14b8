//! Result ordering for search hits.

use tracing::debug;

use metrodesk_core::SearchResult;

/// Order hits by descending relevance, ties broken by most-recent
/// `last_modified`, remaining ties by corpus insertion order.
///
/// The sort is stable and every key is drawn from the input, so an identical
/// candidate list always produces an identical ordering — reruns of the same
/// query over an unchanged corpus cannot reshuffle.
pub fn rank_results(mut results: Vec<SearchResult>) -> Vec<SearchResult> {
    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.last_modified.cmp(&a.last_modified))
    });

    debug!(result_count = results.len(), "ranked search results");
    results
}
