//! Article stub value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A compact article record as returned by the news-search API.
///
/// Stubs are compared by value and carried on the session so refinement turns
/// can re-ground the briefing without another retrieval round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleStub {
    pub title: String,
    /// Short teaser/description; empty when the source supplies none.
    pub description: String,
    /// Publisher name (e.g. "Reuters").
    pub source: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl ArticleStub {
    /// One-line rendering used when listing stubs inside a prompt.
    pub fn headline(&self) -> String {
        if self.source.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.source)
        }
    }
}
