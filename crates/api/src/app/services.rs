//! Service wiring: outbound clients, session store, background purge.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use pressroom_agents::NewsAnalyst;
use pressroom_llm::{LlmClient, LlmError};
use pressroom_newsfeed::{NewsQuery, NewsfeedClient, NewsfeedError};
use pressroom_session::SessionStore;

use crate::config::AppConfig;

/// Everything the handlers need, shared via an axum Extension.
pub struct AppServices {
    pub store: SessionStore,
    pub newsfeed: NewsfeedClient,
    pub analyst: NewsAnalyst,
    pub webhook_token: Option<String>,
    news_window_days: u32,
    news_sort_by: String,
    news_page_size: u32,
}

impl AppServices {
    /// Retrieval parameters for one topic, per the configured briefing window.
    pub fn news_query(&self, topic: &str) -> NewsQuery {
        NewsQuery::new(
            topic,
            self.news_window_days,
            self.news_sort_by.clone(),
            self.news_page_size,
        )
    }
}

/// Failures building the outbound clients at startup.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to build news client: {0}")]
    Newsfeed(#[from] NewsfeedError),

    #[error("failed to build generation client: {0}")]
    Llm(#[from] LlmError),
}

pub fn build_services(config: &AppConfig) -> Result<AppServices, BuildError> {
    let newsfeed = NewsfeedClient::new(&config.news.base_url, &config.news.api_key)?;
    let llm = Arc::new(LlmClient::new(&config.llm.base_url, &config.llm.api_key)?);
    let analyst = NewsAnalyst::new(llm, &config.llm.model, config.llm.temperature);

    Ok(AppServices {
        store: SessionStore::new(),
        newsfeed,
        analyst,
        webhook_token: config.webhook_token.clone(),
        news_window_days: config.news.window_days,
        news_sort_by: config.news.sort_by.clone(),
        news_page_size: config.news.page_size,
    })
}

/// Periodically drop idle sessions so the process-local map stays bounded.
pub fn spawn_session_purge(
    store: SessionStore,
    max_idle: chrono::Duration,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick fires immediately; skip it so startup logs stay quiet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            store.purge_idle(max_idle, chrono::Utc::now()).await;
        }
    })
}
