//! The news analyst: one method per agent in the pipeline.

use std::sync::Arc;

use pressroom_core::ArticleStub;
use pressroom_llm::{GenerateRequest, LlmClient, LlmError};

use crate::verdict::{Feedback, Intent};

const INTENT_SYSTEM: &str = "You are an intent router for a news-briefing assistant. \
    Classify the user's message. Answer with exactly one label: \
    'news_query' if the message asks for news, coverage, or analysis of a topic, \
    or 'smalltalk' for anything else.";

const TOPIC_SYSTEM: &str = "You extract search keywords for a news-search engine. \
    Given the user's request, reply with only the keyword or short phrase to \
    search for. No quotes, no explanation.";

const CURATOR_SYSTEM: &str = "You are an article curator for a news briefing. \
    Given a numbered list of headlines and the reader's request, reply with \
    only the numbers of the relevant headlines, comma-separated. Reply 'none' \
    if nothing is relevant.";

const SUMMARIZER_SYSTEM: &str = "You are a news analyst and summarizer. You provide \
    concise, informative summaries of news articles, explain their implications, \
    highlight contrasting viewpoints, and identify important trends. Be \
    conversational and engaging.";

const REFINER_SYSTEM: &str = "You are a news analyst and summarizer. Revise the \
    given briefing according to the reader's instruction. Keep it grounded in \
    the listed articles; do not invent coverage.";

const FEEDBACK_SYSTEM: &str = "You are a feedback router for a news-briefing \
    assistant. The reader just received a briefing and replied. Answer with \
    exactly one label: 'satisfied' if they confirm it answered their question, \
    'refine' if they want this briefing adjusted or expanded, or 'new_topic' \
    if they ask about something else.";

const SYNTHESIS_SYSTEM: &str = "You are a news analyst and summarizer. Provide a \
    detailed, refined analysis combining all previous information shared in \
    this session. Be concise and insightful.";

const SYNTHESIS_QUERY: &str = "The user has requested to refine and combine all \
    previous analyses. Provide a comprehensive summary based on the full \
    history of interactions.";

/// Formats prompts and delegates generation to the LLM service.
///
/// Routing calls (intent, feedback, topic, curation) run at temperature 0 and
/// without history so the label vocabulary stays stable; conversational calls
/// use the configured temperature and ride on the upstream session history.
pub struct NewsAnalyst {
    llm: Arc<LlmClient>,
    model: String,
    temperature: f32,
}

impl NewsAnalyst {
    pub fn new(llm: Arc<LlmClient>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature,
        }
    }

    pub async fn route_intent(&self, session_id: &str, message: &str) -> Result<Intent, LlmError> {
        let raw = self.routing_call(INTENT_SYSTEM, message, session_id).await?;
        let intent = Intent::parse(&raw);
        tracing::debug!(session_id, ?intent, raw, "intent verdict");
        Ok(intent)
    }

    pub async fn review_feedback(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<Feedback, LlmError> {
        let raw = self.routing_call(FEEDBACK_SYSTEM, message, session_id).await?;
        let feedback = Feedback::parse(&raw);
        tracing::debug!(session_id, ?feedback, raw, "feedback verdict");
        Ok(feedback)
    }

    /// Extract the search keyword for a request. Empty output is returned
    /// as-is; the caller falls back to the raw message text.
    pub async fn extract_topic(&self, session_id: &str, message: &str) -> Result<String, LlmError> {
        let raw = self.routing_call(TOPIC_SYSTEM, message, session_id).await?;
        Ok(raw.trim_matches(['"', '\'', '.', ' ']).to_string())
    }

    /// Filter stubs down to the ones relevant to the request.
    ///
    /// A curation verdict that selects nothing, or that cannot be parsed,
    /// falls back to the full list: a briefing over loosely related articles
    /// beats no briefing.
    pub async fn curate(
        &self,
        session_id: &str,
        message: &str,
        stubs: &[ArticleStub],
    ) -> Result<Vec<ArticleStub>, LlmError> {
        if stubs.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "Reader's request: {message}\n\nHeadlines:\n{}",
            render_headlines(stubs)
        );
        let raw = self.routing_call(CURATOR_SYSTEM, &query, session_id).await?;

        let picks = parse_index_list(&raw, stubs.len());
        if picks.is_empty() {
            tracing::debug!(session_id, raw, "curation verdict unusable; keeping all stubs");
            return Ok(stubs.to_vec());
        }
        Ok(picks.into_iter().map(|i| stubs[i].clone()).collect())
    }

    /// Produce the briefing text from the curated stubs.
    pub async fn summarize(
        &self,
        session_id: &str,
        topic: &str,
        stubs: &[ArticleStub],
    ) -> Result<String, LlmError> {
        let query = format!(
            "Summarize the recent coverage of \"{topic}\" into a short briefing.\n\nArticles:\n{}",
            render_stubs(stubs)
        );
        self.conversational_call(SUMMARIZER_SYSTEM, &query, session_id)
            .await
    }

    /// Rewrite the stored briefing per the user's instruction.
    pub async fn revise(
        &self,
        session_id: &str,
        instruction: &str,
        briefing: &str,
        stubs: &[ArticleStub],
    ) -> Result<String, LlmError> {
        let query = format!(
            "Reader's instruction: {instruction}\n\nCurrent briefing:\n{briefing}\n\nArticles:\n{}",
            render_stubs(stubs)
        );
        self.conversational_call(REFINER_SYSTEM, &query, session_id)
            .await
    }

    /// Whole-history synthesis (the `refine_analysis` button).
    pub async fn synthesize_history(&self, session_id: &str) -> Result<String, LlmError> {
        self.conversational_call(SYNTHESIS_SYSTEM, SYNTHESIS_QUERY, session_id)
            .await
    }

    /// Conversational reply for non-news messages.
    pub async fn smalltalk(&self, session_id: &str, message: &str) -> Result<String, LlmError> {
        let query = format!(
            "The user said: {message}\n\nReply conversationally, and mention that \
             you can look up and summarize recent news on any topic."
        );
        self.conversational_call(SUMMARIZER_SYSTEM, &query, session_id)
            .await
    }

    async fn routing_call(
        &self,
        system: &str,
        query: &str,
        session_id: &str,
    ) -> Result<String, LlmError> {
        let request = GenerateRequest::new(&self.model, system, query, 0.0, 0, session_id);
        self.llm.generate(&request).await
    }

    async fn conversational_call(
        &self,
        system: &str,
        query: &str,
        session_id: &str,
    ) -> Result<String, LlmError> {
        let request =
            GenerateRequest::new(&self.model, system, query, self.temperature, 10, session_id);
        self.llm.generate(&request).await
    }
}

fn render_headlines(stubs: &[ArticleStub]) -> String {
    stubs
        .iter()
        .enumerate()
        .map(|(i, stub)| format!("{}. {}", i + 1, stub.headline()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_stubs(stubs: &[ArticleStub]) -> String {
    stubs
        .iter()
        .enumerate()
        .map(|(i, stub)| {
            if stub.description.is_empty() {
                format!("{}. {}", i + 1, stub.headline())
            } else {
                format!("{}. {} - {}", i + 1, stub.headline(), stub.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a curation verdict ("1, 3", "2 and 4", "none") into zero-based
/// indices, deduplicated, bounded by `len`.
fn parse_index_list(raw: &str, len: usize) -> Vec<usize> {
    let mut picks = Vec::new();
    for token in raw.split(|c: char| !c.is_ascii_digit()) {
        if token.is_empty() {
            continue;
        }
        if let Ok(n) = token.parse::<usize>() {
            if n >= 1 && n <= len {
                let idx = n - 1;
                if !picks.contains(&idx) {
                    picks.push(idx);
                }
            }
        }
    }
    picks
}
