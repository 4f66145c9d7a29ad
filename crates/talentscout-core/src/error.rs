//! Error types for the session store and configuration.

use thiserror::Error;

use crate::types::ConnectionId;

/// Errors raised by [`crate::session::SessionStore`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No session is registered for this connection. Callers always create
    /// before they look up, so hitting this means an invariant was broken.
    #[error("no session for connection {0}")]
    NotFound(ConnectionId),

    /// History turns must carry text.
    #[error("refusing to append an empty turn")]
    EmptyTurn,
}

/// Configuration problems detected at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("provider credential not set (export {env_var} or set provider.apiKey in {config_path})")]
    MissingCredential {
        env_var: &'static str,
        config_path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_env_var() {
        let err = ConfigError::MissingCredential {
            env_var: "GEMINI_API_KEY",
            config_path: "/tmp/config.json".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("GEMINI_API_KEY"));
        assert!(msg.contains("/tmp/config.json"));
    }

    #[test]
    fn not_found_includes_id() {
        let id = ConnectionId::new();
        let err = SessionError::NotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }
}
