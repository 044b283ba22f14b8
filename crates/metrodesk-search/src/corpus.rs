//! Corpus provider seam and the in-memory stand-in.
//!
//! The corpus and its relevance scores belong to an upstream collaborator;
//! the engine only filters and orders what it is given. [`StaticCorpus`]
//! fills that role for a session with a deterministic term-overlap score, so
//! a repeated query over an unchanged corpus always reproduces the same
//! numbers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use metrodesk_core::{defaults, DocKind, LanguageScope, SearchResult};

/// A searchable entry with bilingual content variants.
#[derive(Debug, Clone)]
pub struct CorpusDocument {
    pub id: Uuid,
    pub title: String,
    pub body_en: String,
    pub body_ml: String,
    pub kind: DocKind,
    pub department: String,
    pub last_modified: DateTime<Utc>,
}

/// Supplies scored candidates for a query.
///
/// Results come back in corpus order; ranking is the engine's job.
#[async_trait]
pub trait CorpusProvider: Send + Sync {
    async fn fetch(&self, query: &str, scope: LanguageScope) -> Vec<SearchResult>;
}

/// Fixed in-memory corpus with deterministic scoring.
#[derive(Default)]
pub struct StaticCorpus {
    docs: Vec<CorpusDocument>,
}

impl StaticCorpus {
    pub fn new(docs: Vec<CorpusDocument>) -> Self {
        Self { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Score one document within the language scope.
    ///
    /// `Both` takes the better-scoring variant, preferring English on ties.
    /// Returns the score and the body the snippet should come from.
    fn score<'a>(&self, doc: &'a CorpusDocument, terms: &[&str], scope: LanguageScope) -> (f32, &'a str) {
        let en = term_overlap(terms, &doc.title, &doc.body_en);
        let ml = term_overlap(terms, &doc.title, &doc.body_ml);
        match scope {
            LanguageScope::En => (en, &doc.body_en),
            LanguageScope::Ml => (ml, &doc.body_ml),
            LanguageScope::Both => {
                if ml > en {
                    (ml, &doc.body_ml)
                } else {
                    (en, &doc.body_en)
                }
            }
        }
    }
}

#[async_trait]
impl CorpusProvider for StaticCorpus {
    async fn fetch(&self, query: &str, scope: LanguageScope) -> Vec<SearchResult> {
        let terms: Vec<&str> = query.split_whitespace().collect();

        self.docs
            .iter()
            .filter_map(|doc| {
                let (score, body) = self.score(doc, &terms, scope);
                // An empty query browses the whole corpus at zero relevance;
                // otherwise unmatched entries drop out.
                if !terms.is_empty() && score == 0.0 {
                    return None;
                }
                Some(SearchResult {
                    id: doc.id,
                    title: doc.title.clone(),
                    snippet: snippet_of(body),
                    kind: doc.kind,
                    department: doc.department.clone(),
                    last_modified: doc.last_modified,
                    relevance_score: score,
                })
            })
            .collect()
    }
}

/// Fraction of query terms found in the title or body, on a 0-100 scale.
///
/// Case-insensitive substring containment; crude, but stable for a fixed
/// query and corpus, which is the property the engine depends on.
fn term_overlap(terms: &[&str], title: &str, body: &str) -> f32 {
    if terms.is_empty() {
        return 0.0;
    }
    let haystack = format!("{} {}", title, body).to_lowercase();
    let matched = terms
        .iter()
        .filter(|t| haystack.contains(&t.to_lowercase()))
        .count();
    defaults::RELEVANCE_MAX * matched as f32 / terms.len() as f32
}

/// Leading excerpt of a body, cut at a char boundary.
fn snippet_of(body: &str) -> String {
    if body.chars().count() <= defaults::SNIPPET_LENGTH {
        return body.to_string();
    }
    body.chars().take(defaults::SNIPPET_LENGTH).collect()
}
