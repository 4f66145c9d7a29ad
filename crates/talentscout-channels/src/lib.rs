//! TalentScout Channels — the conversational endpoint.
//!
//! - **base**: `ChatTransport`, the outbound half of a client connection
//! - **manager**: `ConnectionManager`, connect / message / disconnect lifecycle
//! - **websocket**: axum router, exit keywords, per-connection loop, `serve`

pub mod base;
pub mod manager;
pub mod websocket;

pub use base::ChatTransport;
pub use manager::ConnectionManager;
pub use websocket::{
    is_exit_keyword, router, serve, EXIT_KEYWORDS, FAREWELL_MESSAGE, LIVENESS_MESSAGE,
};
