//! Verdict labels returned by the routing agents.
//!
//! The routing prompts ask the model to answer with exactly one label from a
//! closed vocabulary, but models decorate labels anyway ("Label: news_query.",
//! quotes, prose). Parsing is therefore tolerant: normalize, look for a known
//! label, and fall back to the safe default when nothing matches.

/// What the user wants from a fresh message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The message asks for news coverage of some topic.
    NewsQuery,
    /// Anything else: greetings, questions about the bot, chit-chat.
    Smalltalk,
}

impl Intent {
    /// Parse a model answer. Unrecognized text falls back to `Smalltalk`,
    /// which degrades to a conversational reply instead of a spurious
    /// retrieval.
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize(raw);
        if normalized.contains("news_query") || normalized.contains("news query") {
            Intent::NewsQuery
        } else {
            Intent::Smalltalk
        }
    }
}

/// How the user reacted to a delivered briefing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// The user confirmed the briefing answered their question.
    Satisfied,
    /// The user wants the current briefing adjusted (shorter, deeper, a
    /// different angle) on the same topic.
    Refine,
    /// The user moved on to a different topic entirely.
    NewTopic,
}

impl Feedback {
    /// Parse a model answer. Unrecognized text falls back to `Refine`: the
    /// worst outcome of a wrong `Refine` is a reworded briefing, while a
    /// wrong `Satisfied` silently drops the user's request.
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize(raw);
        if normalized.contains("new_topic") || normalized.contains("new topic") {
            Feedback::NewTopic
        } else if normalized.contains("satisfied") {
            Feedback::Satisfied
        } else {
            Feedback::Refine
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
