//! Conversation types for the Ally chat assistant.
//!
//! These types model a multi-turn dialogue with the upstream generation
//! model: turns, session identifiers, and the outcome of a single exchange.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Fallback text returned when the upstream response carries no usable candidate text.
pub const NO_RESPONSE_SENTINEL: &str = "No response text found.";

/// Prefix of the conversational text handed back when an exchange fails.
pub const FAILURE_PREFIX: &str = "Error connecting to Ally AI: ";

/// Who authored a turn.
///
/// Serialized exactly as the generation API expects (`"user"` / `"model"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// A single text segment of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One message unit in a conversation.
///
/// Immutable once created; a history only ever grows by appending turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub parts: Vec<Part>,
}

impl Turn {
    /// A user turn carrying a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// A model turn carrying a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            parts: vec![Part { text: text.into() }],
        }
    }

    /// All text parts concatenated in order.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Key selecting an independent conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Session shared by every caller that does not name one.
    pub const DEFAULT: &'static str = "default";

    /// Resolve an optional caller-supplied id, falling back to the shared session.
    ///
    /// Blank ids are treated as absent.
    pub fn from_optional(id: Option<&str>) -> Self {
        match id.map(str::trim) {
            Some(s) if !s.is_empty() => Self(s.to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why an otherwise successful exchange produced no model text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradedReason {
    /// `candidates` was absent or empty.
    NoCandidates,
    /// A candidate was present but had no text in its first part.
    MissingText,
    /// The body was JSON but not shaped like a generation response.
    UnexpectedShape,
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::NoCandidates => write!(f, "no_candidates"),
            DegradedReason::MissingText => write!(f, "missing_text"),
            DegradedReason::UnexpectedShape => write!(f, "unexpected_shape"),
        }
    }
}

/// Result of a single `send_message` exchange.
///
/// The chat surface always has conversational text to show, but the three
/// variants stay distinguishable so the boundary can decide how to report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// The model answered; the text was appended to history.
    Answer(String),
    /// The upstream call succeeded but carried no usable text. The sentinel
    /// was appended to history as the model turn.
    Degraded { reason: DegradedReason },
    /// The exchange failed before a model turn could be recorded.
    Failed { message: String },
}

impl ChatReply {
    /// The conversational text handed to the caller.
    pub fn text(&self) -> String {
        match self {
            ChatReply::Answer(text) => text.clone(),
            ChatReply::Degraded { .. } => NO_RESPONSE_SENTINEL.to_string(),
            ChatReply::Failed { message } => format!("{FAILURE_PREFIX}{message}"),
        }
    }

    pub fn outcome(&self) -> ReplyOutcome {
        match self {
            ChatReply::Answer(_) => ReplyOutcome::Ok,
            ChatReply::Degraded { .. } => ReplyOutcome::Degraded,
            ChatReply::Failed { .. } => ReplyOutcome::Failed,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChatReply::Failed { .. })
    }
}

/// Wire-level tag for a [`ChatReply`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOutcome {
    Ok,
    Degraded,
    Failed,
}
