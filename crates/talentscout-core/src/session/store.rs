//! Session storage keyed by [`ConnectionId`].

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::SessionError;
use crate::types::{ConnectionId, Session, Turn};

// ─────────────────────────────────────────────
// SessionStore
// ─────────────────────────────────────────────

/// Shared map of active sessions.
///
/// Cloning is cheap; all clones see the same map. Each session is only ever
/// mutated by its own connection's task, so the lock only guards the key
/// space and short appends, never a provider round-trip.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<ConnectionId, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh, seeded session under a newly generated id.
    pub async fn create(&self, client_id: &str) -> Session {
        let session = Session::new(ConnectionId::new(), client_id);
        let mut map = self.sessions.write().await;
        map.insert(session.id, session.clone());
        debug!(connection = %session.id, client = client_id, "session created");
        session
    }

    /// Snapshot of a session.
    pub async fn get(&self, id: ConnectionId) -> Result<Session, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Append a turn to a session's history. Returns the new history length.
    pub async fn append(&self, id: ConnectionId, turn: Turn) -> Result<usize, SessionError> {
        if turn.text.is_empty() {
            return Err(SessionError::EmptyTurn);
        }
        let mut map = self.sessions.write().await;
        let session = map.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.history.push(turn);
        Ok(session.history.len())
    }

    /// Drop a session. Removing an unknown id is a no-op that returns `false`.
    pub async fn remove(&self, id: ConnectionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            debug!(connection = %id, "session removed");
        }
        removed
    }

    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    /// Ids of all active sessions, in no particular order.
    pub async fn ids(&self) -> Vec<ConnectionId> {
        self.sessions.read().await.keys().copied().collect()
    }

    /// Number of active sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
