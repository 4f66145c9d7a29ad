//! Connection Manager — the connect / message / disconnect lifecycle.
//!
//! Responsibilities:
//! - Create a seeded session per connection and greet the client
//! - Record each user turn, ask the turn processor for a reply, record and send it
//! - Drop the session when the connection ends, however it ends

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use talentscout_agent::TurnProcessor;
use talentscout_core::types::{ConnectionId, Turn, WELCOME_MESSAGE};
use talentscout_core::utils::truncate_string;
use talentscout_core::SessionStore;

use crate::base::ChatTransport;

/// Longest reply text written to the info log.
const LOG_PREVIEW_CHARS: usize = 200;

// ─────────────────────────────────────────────
// ConnectionManager
// ─────────────────────────────────────────────

/// Shared by every connection task; all per-connection state lives in the
/// session store.
pub struct ConnectionManager {
    store: SessionStore,
    processor: Arc<TurnProcessor>,
}

impl ConnectionManager {
    pub fn new(store: SessionStore, processor: Arc<TurnProcessor>) -> Self {
        Self { store, processor }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Register a new connection and send it the welcome message.
    ///
    /// If the welcome cannot be delivered the session is dropped again and
    /// the error returned, so the caller has nothing to clean up.
    pub async fn on_connect<T>(&self, client_id: &str, transport: &mut T) -> Result<ConnectionId>
    where
        T: ChatTransport + ?Sized,
    {
        let id = self.store.create(client_id).await.id;
        let active = self.store.len().await;
        info!(
            connection = %id,
            client = client_id,
            active = active,
            "New connection"
        );

        if let Err(e) = transport.send_text(WELCOME_MESSAGE).await {
            self.store.remove(id).await;
            return Err(e.context(format!("failed to send welcome to client {client_id}")));
        }
        Ok(id)
    }

    /// Handle one user message: record it, generate and record the reply,
    /// then send the reply.
    ///
    /// Provider trouble never surfaces here; the processor already swapped
    /// it for a fallback. Errors mean the session is gone or the transport
    /// broke, and the caller should end the connection.
    pub async fn on_message<T>(&self, id: ConnectionId, text: &str, transport: &mut T) -> Result<()>
    where
        T: ChatTransport + ?Sized,
    {
        self.store
            .append(id, Turn::user(text))
            .await
            .with_context(|| format!("failed to record user turn for {id}"))?;

        // Snapshot; the store lock is not held while the provider runs.
        let session = self.store.get(id).await?;
        let reply = self.processor.generate_reply(&session).await;

        let len = self
            .store
            .append(id, Turn::assistant(reply.clone()))
            .await
            .with_context(|| format!("failed to record reply for {id}"))?;
        debug!(connection = %id, history = len, "reply recorded");

        transport
            .send_text(&reply)
            .await
            .with_context(|| format!("failed to send reply to {id}"))?;
        info!(
            connection = %id,
            client = %session.client_id,
            reply = %truncate_string(&reply, LOG_PREVIEW_CHARS),
            "Sent bot response"
        );
        Ok(())
    }

    /// Forget a connection. Returns whether a session was actually removed;
    /// calling it twice is harmless.
    pub async fn on_disconnect(&self, id: ConnectionId) -> bool {
        let removed = self.store.remove(id).await;
        if removed {
            let active = self.store.len().await;
            info!(
                connection = %id,
                active = active,
                "Connection closed"
            );
        } else {
            warn!(connection = %id, "disconnect for unknown connection");
        }
        removed
    }

    pub async fn active_connections(&self) -> usize {
        self.store.len().await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
