//! Provider trait — the only seam through which the service reaches a
//! hosted text-generation model.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use talentscout_core::types::Turn;

use crate::error::ProviderError;

/// Text fragments in arrival order. Finite and not restartable; ends when
/// the provider signals completion.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// One completion call: the instruction, the replayed history, and sampling.
#[derive(Clone, Debug)]
pub struct CompletionRequest {
    /// System instruction text sent ahead of the history.
    pub instruction: String,
    /// Conversation turns in order.
    pub turns: Vec<Turn>,
    /// Sampling temperature.
    pub temperature: f64,
}

/// A streaming text-generation backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Start a streaming completion.
    ///
    /// Errors that happen before the first fragment (connection, auth,
    /// non-success status) are returned directly; later failures arrive as
    /// `Err` items on the stream.
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<TextStream, ProviderError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
