//! `pressroom-llm` — outbound client for the generative-text HTTP API.
//!
//! The generation service is an opaque collaborator: one POST per prompt,
//! no retries, no validation of the text beyond a default-empty fallback.
//! Conversation memory lives upstream, addressed by `session_id` + `lastk`.

pub mod client;
pub mod request;

pub use client::{LlmClient, LlmError};
pub use request::GenerateRequest;
