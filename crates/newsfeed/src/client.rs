//! HTTP client for the news-search API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use pressroom_core::ArticleStub;

use crate::query::NewsQuery;

/// Failures talking to the news-search API.
///
/// No transient/permanent distinction and no retries: the caller degrades to
/// an apology message either way.
#[derive(Debug, Error)]
pub enum NewsfeedError {
    #[error("news api transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("news api returned HTTP {status}")]
    Status { status: u16 },

    #[error("news api rejected the request: {0}")]
    Rejected(String),
}

/// Client for the article-search endpoint.
///
/// Wire contract: `GET {base_url}/v2/everything` with `q`, `from`, `sortBy`,
/// `pageSize` and `apiKey` query parameters, answering
/// `{"status", "articles": [...]}`.
pub struct NewsfeedClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsfeedClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, NewsfeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Run one search and map the wire articles into stubs.
    ///
    /// Articles without a title are dropped: they render as blank lines in a
    /// briefing prompt and carry no signal.
    pub async fn search(
        &self,
        query: &NewsQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<ArticleStub>, NewsfeedError> {
        let url = format!("{}/v2/everything", self.base_url);
        let from = query.from_date(now).to_string();
        let page_size = query.page_size.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query.keyword.as_str()),
                ("from", from.as_str()),
                ("sortBy", query.sort_by.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsfeedError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: SearchEnvelope = response.json().await?;
        if envelope.status != "ok" {
            return Err(NewsfeedError::Rejected(
                envelope.message.unwrap_or_else(|| envelope.status.clone()),
            ));
        }

        let stubs: Vec<ArticleStub> = envelope
            .articles
            .into_iter()
            .filter_map(WireArticle::into_stub)
            .collect();

        tracing::debug!(
            keyword = %query.keyword,
            count = stubs.len(),
            "news search completed"
        );
        Ok(stubs)
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<WireArticle>,
}

#[derive(Debug, Deserialize)]
struct WireArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "publishedAt", default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    source: Option<WireSource>,
}

#[derive(Debug, Deserialize)]
struct WireSource {
    #[serde(default)]
    name: Option<String>,
}

impl WireArticle {
    fn into_stub(self) -> Option<ArticleStub> {
        let title = self.title.unwrap_or_default();
        if title.trim().is_empty() {
            return None;
        }

        Some(ArticleStub {
            title,
            description: self.description.unwrap_or_default(),
            source: self.source.and_then(|s| s.name).unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            published_at: self.published_at,
        })
    }
}
