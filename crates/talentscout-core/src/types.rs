//! Core types for TalentScout — sessions, turns, and the candidate field set.
//!
//! A `Session` is the whole conversational state of one connected client:
//! the role-tagged history replayed to the provider each turn, the map of
//! candidate fields, and the phase flags the instruction template reads.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─────────────────────────────────────────────
// Fixed conversation text
// ─────────────────────────────────────────────

/// Sent to every client as soon as its connection is accepted.
pub const WELCOME_MESSAGE: &str = "Welcome to the PGAGI Hiring Assistant! I'm here to help with \
the initial screening process by gathering some information about you. We can chat naturally - \
feel free to ask questions at any time. To start, could you tell me your full name?";

/// Synthetic first user turn that precedes the welcome in every history.
pub const GREETING_PLACEHOLDER: &str = "Hello";

// ─────────────────────────────────────────────
// Connection identity
// ─────────────────────────────────────────────

/// Server-generated handle for one live connection.
///
/// Kept separate from the transport object so session lifetime is not tied
/// to a socket type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        ConnectionId(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ─────────────────────────────────────────────
// Turns
// ─────────────────────────────────────────────

/// Who spoke a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One role-tagged message in a session history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Turn {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Required candidate fields
// ─────────────────────────────────────────────

/// The seven pieces of candidate data the intake conversation gathers.
///
/// Declaration order is the collection order shown to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RequiredField {
    FullName,
    EmailAddress,
    PhoneNumber,
    YearsOfExperience,
    DesiredPositions,
    CurrentLocation,
    TechStack,
}

impl RequiredField {
    pub const ALL: [RequiredField; 7] = [
        RequiredField::FullName,
        RequiredField::EmailAddress,
        RequiredField::PhoneNumber,
        RequiredField::YearsOfExperience,
        RequiredField::DesiredPositions,
        RequiredField::CurrentLocation,
        RequiredField::TechStack,
    ];

    /// Human-readable label used in the instruction text.
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::FullName => "Full Name",
            RequiredField::EmailAddress => "Email Address",
            RequiredField::PhoneNumber => "Phone Number",
            RequiredField::YearsOfExperience => "Years of Experience",
            RequiredField::DesiredPositions => "Desired Position(s)",
            RequiredField::CurrentLocation => "Current Location",
            RequiredField::TechStack => "Tech Stack",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Candidate data gathered so far, one slot per [`RequiredField`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedData(BTreeMap<RequiredField, Option<String>>);

impl CollectedData {
    /// Every field present and unset.
    pub fn empty() -> Self {
        CollectedData(RequiredField::ALL.iter().map(|f| (*f, None)).collect())
    }

    pub fn get(&self, field: RequiredField) -> Option<&str> {
        self.0.get(&field).and_then(|v| v.as_deref())
    }

    /// Fields that have a value, in collection order.
    pub fn collected(&self) -> Vec<(RequiredField, &str)> {
        self.0
            .iter()
            .filter_map(|(field, value)| value.as_deref().map(|v| (*field, v)))
            .collect()
    }

    /// Fields still unset, in collection order.
    pub fn missing(&self) -> Vec<RequiredField> {
        self.0
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| *field)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.0.values().all(Option::is_some)
    }
}

impl Default for CollectedData {
    fn default() -> Self {
        Self::empty()
    }
}

// ─────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────

/// Conversation state for one live connection.
///
/// `collected_data` and the phase flags are read by the instruction template
/// but never written by this service; phase progression is left to the model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: ConnectionId,
    /// Opaque identifier the client chose in its connection path.
    pub client_id: String,
    pub history: Vec<Turn>,
    pub collected_data: CollectedData,
    pub tech_questions_asked: bool,
    pub tech_answers_collected: bool,
    pub application_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session seeded with the greeting placeholder and the welcome.
    pub fn new(id: ConnectionId, client_id: impl Into<String>) -> Self {
        Session {
            id,
            client_id: client_id.into(),
            history: vec![
                Turn::user(GREETING_PLACEHOLDER),
                Turn::assistant(WELCOME_MESSAGE),
            ],
            collected_data: CollectedData::empty(),
            tech_questions_asked: false,
            tech_answers_collected: false,
            application_completed: false,
            created_at: Utc::now(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
