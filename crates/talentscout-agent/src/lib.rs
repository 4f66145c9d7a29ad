//! TalentScout Agent — produces the assistant's next message for a session.
//!
//! - **prompt**: renders the instruction template from session state
//! - **processor**: `TurnProcessor`, the single call site of the provider

pub mod processor;
pub mod prompt;

pub use processor::{TurnProcessor, NO_RESPONSE_FALLBACK, TECHNICAL_ISSUE_FALLBACK};
pub use prompt::{InstructionBuilder, PromptError};
