//! Session record and dialogue phase transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pressroom_core::{ArticleStub, DomainError, DomainResult, SessionKey};

/// Dialogue phase lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    /// No briefing in flight; the next message is treated as a fresh query.
    AwaitingQuery,
    /// A briefing was delivered; the next message is read as feedback on it.
    AwaitingFeedback,
}

/// Conversation-scoped dialogue state.
///
/// Transitions are invariant-checked: a revision requires stored briefing
/// context, an acknowledgement requires a delivered briefing. Every applied
/// transition bumps `version`, so log lines can show which write won when two
/// webhooks for the same session land close together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    key: SessionKey,
    phase: DialoguePhase,
    topic: Option<String>,
    articles: Vec<ArticleStub>,
    briefing: Option<String>,
    version: u64,
    last_active: DateTime<Utc>,
}

impl Session {
    /// Fresh session in `AwaitingQuery` with no stored context.
    pub fn new(key: SessionKey, now: DateTime<Utc>) -> Self {
        Self {
            key,
            phase: DialoguePhase::AwaitingQuery,
            topic: None,
            articles: Vec::new(),
            briefing: None,
            version: 0,
            last_active: now,
        }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn articles(&self) -> &[ArticleStub] {
        &self.articles
    }

    pub fn briefing(&self) -> Option<&str> {
        self.briefing.as_deref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn is_awaiting_feedback(&self) -> bool {
        matches!(self.phase, DialoguePhase::AwaitingFeedback)
    }

    /// Record message activity without a phase change (smalltalk turns,
    /// button short-circuits).
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active = now;
    }

    /// Store a freshly produced briefing and move to `AwaitingFeedback`.
    ///
    /// Allowed from either phase: a new topic simply replaces whatever
    /// context was stored before.
    pub fn begin_briefing(
        &mut self,
        topic: String,
        articles: Vec<ArticleStub>,
        briefing: String,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if topic.trim().is_empty() {
            return Err(DomainError::validation("briefing topic must not be blank"));
        }
        if briefing.trim().is_empty() {
            return Err(DomainError::validation("briefing text must not be blank"));
        }

        self.topic = Some(topic);
        self.articles = articles;
        self.briefing = Some(briefing);
        self.phase = DialoguePhase::AwaitingFeedback;
        self.bump(now);
        Ok(())
    }

    /// Replace the stored briefing after a refinement turn.
    pub fn revise_briefing(&mut self, briefing: String, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_awaiting_feedback() || self.briefing.is_none() {
            return Err(DomainError::invariant(
                "cannot revise a briefing: no briefing is stored for this session",
            ));
        }
        if briefing.trim().is_empty() {
            return Err(DomainError::validation("revised briefing must not be blank"));
        }

        self.briefing = Some(briefing);
        self.bump(now);
        Ok(())
    }

    /// The user confirmed satisfaction: clear stored context and return to
    /// `AwaitingQuery`.
    pub fn acknowledge(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_awaiting_feedback() {
            return Err(DomainError::invariant(
                "cannot acknowledge: no briefing was delivered in this session",
            ));
        }

        self.topic = None;
        self.articles.clear();
        self.briefing = None;
        self.phase = DialoguePhase::AwaitingQuery;
        self.bump(now);
        Ok(())
    }

    fn bump(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.last_active = now;
    }
}
