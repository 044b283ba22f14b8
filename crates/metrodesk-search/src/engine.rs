//! Search engine: filter composition, deferred resolution, supersession.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use metrodesk_core::{defaults, EventBus, SearchRequest, SearchResult, SessionEvent};

use crate::corpus::CorpusProvider;
use crate::rank::rank_results;

/// Observable state of the engine's current search.
#[derive(Debug, Clone, Default)]
pub enum SearchState {
    /// No search has been initiated yet.
    #[default]
    Idle,
    /// A search is in flight.
    Searching { generation: u64 },
    /// The most recently initiated search resolved.
    Ready {
        generation: u64,
        results: Vec<SearchResult>,
    },
}

impl SearchState {
    pub fn is_searching(&self) -> bool {
        matches!(self, Self::Searching { .. })
    }
}

/// Simulated index/network latency window for deferred searches.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_latency_ms: defaults::SEARCH_LATENCY_MIN_MS,
            max_latency_ms: defaults::SEARCH_LATENCY_MAX_MS,
        }
    }
}

impl SearchConfig {
    /// Set the latency window.
    pub fn with_latency_window(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_latency_ms = min_ms;
        self.max_latency_ms = max_ms.max(min_ms);
        self
    }
}

/// Evaluates queries against the corpus provider and surfaces only the most
/// recently initiated search as current.
///
/// Overlapping searches never race destructively: every initiation takes a
/// fresh generation number, and a completion only publishes when its
/// generation is still the newest. Stale completions are discarded, never
/// surfaced.
pub struct SearchEngine {
    corpus: Arc<dyn CorpusProvider>,
    bus: Arc<EventBus>,
    config: SearchConfig,
    generation: Arc<AtomicU64>,
    state: Arc<RwLock<SearchState>>,
}

impl SearchEngine {
    pub fn new(corpus: Arc<dyn CorpusProvider>, bus: Arc<EventBus>) -> Self {
        Self {
            corpus,
            bus,
            config: SearchConfig::default(),
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(RwLock::new(SearchState::Idle)),
        }
    }

    /// Override the simulated latency window.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Run a query to completion: fetch candidates, apply the conjunctive
    /// filters, rank.
    ///
    /// This is the synchronous core used by [`begin`]'s deferred task; it
    /// carries no latency and no supersession bookkeeping.
    ///
    /// [`begin`]: SearchEngine::begin
    pub async fn execute(&self, request: &SearchRequest) -> Vec<SearchResult> {
        run_query(&self.corpus, request).await
    }

    /// Initiate a deferred search and return its generation number.
    ///
    /// Returns immediately; the engine goes `Searching` and later `Ready`
    /// unless a newer search supersedes this one first (last-writer-wins).
    pub async fn begin(&self, request: SearchRequest) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.write().await = SearchState::Searching { generation };

        info!(generation, query = %request.query, "search initiated");
        self.bus.emit(SessionEvent::SearchStarted { generation });

        let latency_ms = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.config.min_latency_ms..=self.config.max_latency_ms)
        };

        let corpus = self.corpus.clone();
        let bus = self.bus.clone();
        let latest = self.generation.clone();
        let state = self.state.clone();

        tokio::spawn(async move {
            sleep(Duration::from_millis(latency_ms)).await;
            let results = run_query(&corpus, &request).await;

            // Publish under the state lock so the newest-generation check
            // and the write are one step.
            let mut state = state.write().await;
            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "stale search result discarded");
                return;
            }

            let result_count = results.len();
            *state = SearchState::Ready {
                generation,
                results,
            };
            drop(state);

            info!(generation, result_count, "search completed");
            bus.emit(SessionEvent::SearchCompleted {
                generation,
                result_count,
            });
        });

        generation
    }

    /// Current observable search state.
    pub async fn state(&self) -> SearchState {
        self.state.read().await.clone()
    }

    /// Results of the current search, if one has resolved.
    pub async fn current_results(&self) -> Option<Vec<SearchResult>> {
        match &*self.state.read().await {
            SearchState::Ready { results, .. } => Some(results.clone()),
            _ => None,
        }
    }
}

/// Fetch, filter, rank.
async fn run_query(
    corpus: &Arc<dyn CorpusProvider>,
    request: &SearchRequest,
) -> Vec<SearchResult> {
    let candidates = corpus.fetch(&request.query, request.language).await;
    let filtered: Vec<SearchResult> = candidates
        .into_iter()
        .filter(|hit| {
            request.type_filter.matches(hit.kind) && request.department.matches(&hit.department)
        })
        .collect();
    rank_results(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CorpusDocument, StaticCorpus};
    use chrono::{Duration as ChronoDuration, Utc};
    use metrodesk_core::{DepartmentFilter, DocKind, LanguageScope, TypeFilter};
    use uuid::Uuid;

    fn corpus() -> Arc<StaticCorpus> {
        let now = Utc::now();
        let entry = |title: &str, body: &str, kind, department: &str, age_hours: i64| {
            CorpusDocument {
                id: Uuid::new_v4(),
                title: title.to_string(),
                body_en: body.to_string(),
                body_ml: String::new(),
                kind,
                department: department.to_string(),
                last_modified: now - ChronoDuration::hours(age_hours),
            }
        };

        Arc::new(StaticCorpus::new(vec![
            entry(
                "Safety Protocol Manual",
                "safety guidelines for metro operations",
                DocKind::Pdf,
                "Safety & Security",
                24,
            ),
            entry(
                "Track Maintenance Schedule",
                "monthly maintenance schedule with safety inspection points",
                DocKind::Excel,
                "Maintenance",
                48,
            ),
            entry(
                "Station Blueprint",
                "architectural drawings and safety specifications",
                DocKind::Scan,
                "Engineering",
                72,
            ),
        ]))
    }

    fn bus() -> Arc<EventBus> {
        Arc::new(EventBus::new(32))
    }

    #[tokio::test]
    async fn test_execute_ranks_by_relevance() {
        let engine = SearchEngine::new(corpus(), bus());
        let results = engine
            .execute(&SearchRequest::new("safety inspection"))
            .await;

        assert!(!results.is_empty());
        // Only the maintenance schedule contains both terms
        assert_eq!(results[0].title, "Track Maintenance Schedule");
        for pair in results.windows(2) {
            assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
    }

    #[tokio::test]
    async fn test_filters_are_conjunctive() {
        let engine = SearchEngine::new(corpus(), bus());

        let req = SearchRequest::new("safety")
            .with_type_filter(TypeFilter::Excel)
            .with_department(DepartmentFilter::Department("Maintenance".to_string()));
        let results = engine.execute(&req).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Track Maintenance Schedule");

        // Matching type but wrong department excludes
        let req = SearchRequest::new("safety")
            .with_type_filter(TypeFilter::Excel)
            .with_department(DepartmentFilter::Department("Engineering".to_string()));
        assert!(engine.execute(&req).await.is_empty());
    }

    #[tokio::test]
    async fn test_execute_twice_is_identical() {
        let engine = SearchEngine::new(corpus(), bus());
        let req = SearchRequest::new("safety").with_language(LanguageScope::Both);

        let first = engine.execute(&req).await;
        let second = engine.execute(&req).await;

        let ids: Vec<Uuid> = first.iter().map(|r| r.id).collect();
        let ids2: Vec<Uuid> = second.iter().map(|r| r.id).collect();
        assert_eq!(ids, ids2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_begin_surfaces_searching_then_ready() {
        let engine = SearchEngine::new(corpus(), bus())
            .with_config(SearchConfig::default().with_latency_window(500, 500));

        let generation = engine.begin(SearchRequest::new("safety")).await;
        assert!(engine.state().await.is_searching());
        assert!(engine.current_results().await.is_none());

        sleep(Duration::from_millis(600)).await;

        match engine.state().await {
            SearchState::Ready {
                generation: g,
                results,
            } => {
                assert_eq!(g, generation);
                assert!(!results.is_empty());
            }
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_generations_increase() {
        let engine = SearchEngine::new(corpus(), bus())
            .with_config(SearchConfig::default().with_latency_window(0, 0));

        let g1 = engine.begin(SearchRequest::new("safety")).await;
        let g2 = engine.begin(SearchRequest::new("maintenance")).await;
        assert!(g2 > g1);
    }
}
