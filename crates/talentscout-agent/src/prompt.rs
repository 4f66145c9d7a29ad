//! Instruction builder — renders the intake template with the session's
//! field map and phase flags.
//!
//! The template text is configuration: the built-in one ships with the
//! crate and can be replaced by a file at startup.

use std::path::{Path, PathBuf};

use minijinja::{context, Environment};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use talentscout_core::types::{RequiredField, Session};

/// Built-in intake template.
pub const DEFAULT_TEMPLATE: &str = include_str!("../prompts/intake.md");

const TEMPLATE_NAME: &str = "intake";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read prompt template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt template error: {0}")]
    Template(#[from] minijinja::Error),
}

#[derive(Serialize)]
struct CollectedEntry<'a> {
    field: &'a str,
    value: &'a str,
}

/// Renders the per-turn instruction string.
pub struct InstructionBuilder {
    env: Environment<'static>,
}

impl std::fmt::Debug for InstructionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstructionBuilder").finish_non_exhaustive()
    }
}

impl InstructionBuilder {
    /// Builder using the built-in template.
    pub fn new() -> Result<Self, PromptError> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    /// Builder using template text supplied by the caller.
    pub fn from_source(source: impl Into<String>) -> Result<Self, PromptError> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source.into())?;
        Ok(Self { env })
    }

    /// Builder using a template file on disk.
    pub fn from_path(path: &Path) -> Result<Self, PromptError> {
        let source = std::fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded prompt template");
        Self::from_source(source)
    }

    /// Render the instruction for the session's current state.
    pub fn render(&self, session: &Session) -> Result<String, PromptError> {
        let required: Vec<&str> = RequiredField::ALL.iter().map(|f| f.label()).collect();
        let collected: Vec<CollectedEntry<'_>> = session
            .collected_data
            .collected()
            .into_iter()
            .map(|(field, value)| CollectedEntry {
                field: field.label(),
                value,
            })
            .collect();
        let missing: Vec<&str> = session
            .collected_data
            .missing()
            .iter()
            .map(|f| f.label())
            .collect();
        let next_missing_field = missing.first().copied().unwrap_or("details");

        let template = self.env.get_template(TEMPLATE_NAME)?;
        let rendered = template.render(context! {
            required_fields => required,
            collected => collected,
            missing => missing,
            next_missing_field => next_missing_field,
            tech_questions_asked => session.tech_questions_asked,
            tech_answers_collected => session.tech_answers_collected,
            application_completed => session.application_completed,
        })?;
        Ok(rendered)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
