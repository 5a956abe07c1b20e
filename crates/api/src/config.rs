//! Environment configuration.
//!
//! Everything comes from environment variables at startup, with logged
//! defaults for local development. Missing API keys are a warning rather than
//! a startup failure: the service boots and degrades at call time, which
//! keeps the webhook reachable for the chat server.

use chrono::Duration;

/// Typed view of the service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Shared secret the chat server sends in the webhook body. `None`
    /// disables the check (development mode).
    pub webhook_token: Option<String>,
    pub news: NewsSettings,
    pub llm: LlmSettings,
    /// Sessions idle for longer than this are purged.
    pub session_max_idle: Duration,
}

#[derive(Debug, Clone)]
pub struct NewsSettings {
    pub base_url: String,
    pub api_key: String,
    pub page_size: u32,
    pub window_days: u32,
    pub sort_by: String,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let webhook_token = optional("WEBHOOK_TOKEN");
        if webhook_token.is_none() {
            tracing::warn!("WEBHOOK_TOKEN not set; accepting unauthenticated webhooks");
        }

        Self {
            bind_addr: string_or("BIND_ADDR", "0.0.0.0:8080"),
            webhook_token,
            news: NewsSettings {
                base_url: string_or("NEWS_API_BASE_URL", "https://newsapi.org"),
                api_key: secret_or_empty("NEWS_API_KEY"),
                page_size: parse_or("NEWS_PAGE_SIZE", 10),
                window_days: parse_or("NEWS_WINDOW_DAYS", 7),
                sort_by: string_or("NEWS_SORT_BY", "popularity"),
            },
            llm: LlmSettings {
                base_url: string_or("LLM_BASE_URL", "http://localhost:9000"),
                api_key: secret_or_empty("LLM_API_KEY"),
                model: string_or("LLM_MODEL", "4o-mini"),
                temperature: parse_or("LLM_TEMPERATURE", 0.7),
            },
            session_max_idle: Duration::seconds(parse_or("SESSION_MAX_IDLE_SECS", 86_400)),
        }
    }
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn string_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn secret_or_empty(key: &str) -> String {
    optional(key).unwrap_or_else(|| {
        tracing::warn!("{key} not set; upstream calls will be rejected");
        String::new()
    })
}

fn parse_or<T: std::str::FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match optional(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("{key}={raw} is not valid; using default {default}");
            default
        }),
        None => default,
    }
}
