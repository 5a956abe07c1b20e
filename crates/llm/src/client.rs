//! HTTP client for the generation service.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::request::GenerateRequest;

/// Failures talking to the generation service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("generation api transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation api returned HTTP {status}")]
    Status { status: u16 },
}

/// Client for the text-generation endpoint.
///
/// Wire contract: `POST {base_url}` with the request JSON and the API key in
/// the `x-api-key` header, answering `{"response": "..."}`.
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, LlmError> {
        // Generation calls can sit on the model for a while; give them a much
        // longer budget than the news search.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Run one generation call and return the trimmed text.
    ///
    /// A payload without a `response` field yields the empty string; callers
    /// treat empty text as a degraded answer, not an error.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        let response = self
            .http
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
            });
        }

        let payload: GenerateResponse = response.json().await?;
        let text = payload.response.trim().to_string();
        tracing::debug!(
            session_id = %request.session_id,
            chars = text.len(),
            "generation completed"
        );
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}
