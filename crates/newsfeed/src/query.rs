//! Retrieval parameters for a news search.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Value object describing one retrieval: what to search for and how wide the
/// briefing window is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub keyword: String,
    /// How many days back the briefing window starts.
    pub window_days: u32,
    /// Upstream sort order (e.g. "popularity", "publishedAt").
    pub sort_by: String,
    pub page_size: u32,
}

impl NewsQuery {
    pub fn new(keyword: impl Into<String>, window_days: u32, sort_by: impl Into<String>, page_size: u32) -> Self {
        Self {
            keyword: keyword.into(),
            window_days,
            sort_by: sort_by.into(),
            page_size,
        }
    }

    /// Start of the briefing window as an ISO date (the upstream `from`
    /// parameter).
    pub fn from_date(&self, now: DateTime<Utc>) -> NaiveDate {
        (now - Duration::days(i64::from(self.window_days))).date_naive()
    }
}
