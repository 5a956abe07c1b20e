//! `pressroom-agents` — prompt construction and response parsing.
//!
//! **Responsibility:** the "agents" of the pipeline. Each agent formats a
//! prompt, delegates text generation to the LLM service, and post-processes
//! the returned text (label parsing, index parsing, trimming).
//!
//! This crate is intentionally **not** part of the dialogue state model:
//! - It must not touch the session store.
//! - It emits verdicts and text, not state transitions.

pub mod analyst;
pub mod verdict;

pub use analyst::NewsAnalyst;
pub use verdict::{Feedback, Intent};
