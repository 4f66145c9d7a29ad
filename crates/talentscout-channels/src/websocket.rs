//! WebSocket endpoint — the public face of the gateway.
//!
//! Routes:
//! - `GET /ws/:client_id` — upgrade to a chat connection
//! - `GET /` — liveness page
//!
//! Each upgraded socket is driven by [`handle_socket`]: greet, then read
//! frames one at a time until the client leaves, says an exit keyword, or
//! something breaks. Every one of those paths ends in
//! [`ConnectionManager::on_disconnect`].

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::{Html, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use talentscout_core::types::ConnectionId;

use crate::base::ChatTransport;
use crate::manager::ConnectionManager;

/// Words that end the conversation (compared trimmed and lowercased).
pub const EXIT_KEYWORDS: [&str; 4] = ["exit", "quit", "bye", "goodbye"];

/// Last frame sent before the server closes on an exit keyword.
pub const FAREWELL_MESSAGE: &str = "Thank you for your time. Ending conversation.";

/// Body of `GET /`.
pub const LIVENESS_MESSAGE: &str =
    "<h2>TalentScout Hiring Assistant WebSocket Server is running.</h2>";

/// Whether `text` is exactly one of [`EXIT_KEYWORDS`], ignoring case and
/// surrounding whitespace.
pub fn is_exit_keyword(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    EXIT_KEYWORDS.contains(&normalized.as_str())
}

#[async_trait]
impl ChatTransport for WebSocket {
    async fn send_text(&mut self, text: &str) -> Result<()> {
        self.send(Message::Text(text.to_string()))
            .await
            .context("websocket send failed")
    }
}

// ─────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────

/// Build the HTTP router. CORS is wide open.
pub fn router(manager: Arc<ConnectionManager>) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/ws/:client_id", get(upgrade))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(manager)
}

/// Serve the router on `listener` until Ctrl+C.
pub async fn serve(listener: TcpListener, manager: Arc<ConnectionManager>) -> Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    info!(%addr, "websocket gateway listening");

    axum::serve(listener, router(manager))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("websocket gateway failed")?;

    info!("websocket gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        // Without a signal handler, keep serving.
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

async fn liveness() -> Html<&'static str> {
    Html(LIVENESS_MESSAGE)
}

async fn upgrade(
    ws: WebSocketUpgrade,
    Path(client_id): Path<String>,
    State(manager): State<Arc<ConnectionManager>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, client_id, manager))
}

// ─────────────────────────────────────────────
// Per-connection loop
// ─────────────────────────────────────────────

/// How a connection's read loop ended.
enum Ending {
    /// Client sent an exit keyword; farewell already delivered.
    Farewell,
    /// Close frame, end of stream, or a read error.
    ClientGone,
    /// Handling a message failed.
    Failed(anyhow::Error),
}

async fn handle_socket(mut socket: WebSocket, client_id: String, manager: Arc<ConnectionManager>) {
    let id = match manager.on_connect(&client_id, &mut socket).await {
        Ok(id) => id,
        Err(e) => {
            warn!(client = %client_id, error = %e, "could not greet client");
            return;
        }
    };

    match read_loop(&mut socket, id, &client_id, &manager).await {
        Ending::Farewell => info!(connection = %id, client = %client_id, "client ended the conversation"),
        Ending::ClientGone => info!(connection = %id, client = %client_id, "client disconnected"),
        Ending::Failed(e) => error!(
            connection = %id,
            client = %client_id,
            error = %e,
            detail = ?e,
            "An error occurred with client"
        ),
    }

    manager.on_disconnect(id).await;
    // The peer may already be gone.
    if let Err(e) = socket.send(Message::Close(None)).await {
        debug!(connection = %id, error = %e, "close frame not sent");
    }
}

async fn read_loop(
    socket: &mut WebSocket,
    id: ConnectionId,
    client_id: &str,
    manager: &ConnectionManager,
) -> Ending {
    while let Some(frame) = socket.recv().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => return Ending::ClientGone,
            Ok(_) => continue,
            Err(e) => {
                debug!(connection = %id, error = %e, "websocket read failed");
                return Ending::ClientGone;
            }
        };

        info!(connection = %id, client = client_id, message = %text, "Received from client");

        if is_exit_keyword(&text) {
            return match socket.send_text(FAREWELL_MESSAGE).await {
                Ok(()) => Ending::Farewell,
                Err(e) => Ending::Failed(e),
            };
        }

        if text.trim().is_empty() {
            debug!(connection = %id, "ignoring blank message");
            continue;
        }

        if let Err(e) = manager.on_message(id, &text, socket).await {
            return Ending::Failed(e);
        }
    }
    Ending::ClientGone
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
