use thiserror::Error;

/// Everything that can go wrong talking to a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed stream chunk: {0}")]
    Malformed(String),

    #[error("provider reported an error mid-stream: {0}")]
    Stream(String),
}
