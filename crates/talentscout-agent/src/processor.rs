//! Turn processor — asks the provider for the next assistant message.
//!
//! This is the error-isolation boundary of the service: whatever goes wrong
//! while rendering the instruction or talking to the provider is logged here
//! and replaced by a fixed apology, so callers always get text to send.

use std::sync::Arc;

use futures_util::StreamExt;
use thiserror::Error;
use tracing::{debug, error, warn};

use talentscout_core::types::{Session, Turn};
use talentscout_providers::{CompletionProvider, CompletionRequest, ProviderError};

use crate::prompt::{InstructionBuilder, PromptError};

/// Sent when the provider finished without producing any text.
pub const NO_RESPONSE_FALLBACK: &str = "I'm sorry, I couldn't generate a response.";

/// Sent when the provider call failed.
pub const TECHNICAL_ISSUE_FALLBACK: &str =
    "I'm sorry, I encountered a technical issue. Could you please rephrase that?";

#[derive(Debug, Error)]
enum TurnError {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Produces assistant replies for sessions. Stateless between calls.
pub struct TurnProcessor {
    provider: Arc<dyn CompletionProvider>,
    instructions: InstructionBuilder,
    temperature: f64,
}

impl TurnProcessor {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        instructions: InstructionBuilder,
        temperature: f64,
    ) -> Self {
        Self {
            provider,
            instructions,
            temperature,
        }
    }

    /// The reply to append for the session's latest user turn.
    ///
    /// Never fails and never returns an empty string. Does not touch the
    /// session; appending the reply is the caller's job.
    pub async fn generate_reply(&self, session: &Session) -> String {
        match self.request_reply(session).await {
            Ok(reply) => {
                let reply = reply.trim();
                if reply.is_empty() {
                    warn!(connection = %session.id, "provider returned no text");
                    NO_RESPONSE_FALLBACK.to_string()
                } else {
                    reply.to_string()
                }
            }
            Err(e) => {
                error!(
                    connection = %session.id,
                    client = %session.client_id,
                    provider = self.provider.display_name(),
                    model = self.provider.model(),
                    error = %e,
                    detail = ?e,
                    "Error generating response"
                );
                TECHNICAL_ISSUE_FALLBACK.to_string()
            }
        }
    }

    async fn request_reply(&self, session: &Session) -> Result<String, TurnError> {
        let instruction = self.instructions.render(session)?;
        let turns: Vec<Turn> = session
            .history
            .iter()
            .filter(|turn| !turn.text.is_empty())
            .cloned()
            .collect();

        debug!(
            connection = %session.id,
            turns = turns.len(),
            instruction_len = instruction.len(),
            "requesting completion"
        );

        let mut stream = self
            .provider
            .stream_completion(CompletionRequest {
                instruction,
                turns,
                temperature: self.temperature,
            })
            .await?;

        let mut reply = String::new();
        while let Some(fragment) = stream.next().await {
            reply.push_str(&fragment?);
        }
        Ok(reply)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
