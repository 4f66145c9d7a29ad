//! TalentScout Core — data model, session store, configuration, and shared helpers.
//!
//! - **types**: `Session`, `Turn`, `Role`, the required candidate fields
//! - **session**: `SessionStore`, the per-connection state map
//! - **config**: typed schema + loader (JSON file and env var overrides)
//! - **error**: error enums shared by the other crates

pub mod config;
pub mod error;
pub mod session;
pub mod types;
pub mod utils;

pub use error::{ConfigError, SessionError};
pub use session::SessionStore;
pub use types::{
    CollectedData, ConnectionId, RequiredField, Role, Session, Turn, GREETING_PLACEHOLDER,
    WELCOME_MESSAGE,
};
