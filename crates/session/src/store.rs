//! In-memory session store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use pressroom_core::SessionKey;

use crate::session::Session;

/// Shared in-memory map of live sessions.
///
/// Process-local only: sessions are lost on restart and never persisted.
/// Concurrent webhooks for the same key serialize on the lock, so the last
/// write wins rather than racing.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionKey, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.key().clone(), session);
    }

    pub async fn get(&self, key: &SessionKey) -> Option<Session> {
        self.sessions.read().await.get(key).cloned()
    }

    pub async fn remove(&self, key: &SessionKey) {
        self.sessions.write().await.remove(key);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle for longer than `max_idle`. Returns how many were
    /// dropped.
    pub async fn purge_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_active() <= max_idle);
        let dropped = before - sessions.len();
        if dropped > 0 {
            tracing::debug!(dropped, remaining = sessions.len(), "purged idle sessions");
        }
        dropped
    }
}
