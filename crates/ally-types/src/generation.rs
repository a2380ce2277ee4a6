//! Generation request/response types for the upstream model API.
//!
//! The request types serialize to the exact `generateContent` body shape.
//! The response types are deliberately lenient: every field is optional so
//! that a sparse or partial body still deserializes and the caller can decide
//! what "no usable text" means.

use serde::{Deserialize, Serialize};

use crate::chat::{DegradedReason, Part, Turn};

/// Persona and domain restriction sent as the system instruction on every request.
pub const SYSTEM_PROMPT: &str = "You are Ally, a helpful legal AI assistant for the Philippines. \
Answer strictly based on Philippine Law. \
If the user asks about non-legal topics, politely steer them back to legal matters. \
Keep your answers professional, concise, and helpful.";

/// Sampling parameters for a generation call.
///
/// The defaults are the fixed values the assistant always uses; a low
/// temperature keeps answers conservative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub top_p: f64,
    pub top_k: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 1024,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

/// System instruction block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

/// Body of a `generateContent` call. Built fresh per exchange, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub system_instruction: SystemInstruction,
    pub contents: Vec<Turn>,
    pub generation_config: GenerationConfig,
}

impl GenerationRequest {
    /// Build a request from a system instruction and a history snapshot.
    pub fn new(system_instruction: &str, history: &[Turn]) -> Self {
        Self {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            },
            contents: history.to_vec(),
            generation_config: GenerationConfig::default(),
        }
    }
}

/// Parsed `generateContent` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Token accounting reported by the upstream API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

impl GenerateContentResponse {
    /// Interpret a raw JSON body as a generation response.
    ///
    /// Bodies that are valid JSON but do not fit the response shape (e.g.
    /// `candidates` is a string) are reported as [`DegradedReason::UnexpectedShape`].
    pub fn from_value(body: serde_json::Value) -> Result<Self, DegradedReason> {
        serde_json::from_value(body).map_err(|_| DegradedReason::UnexpectedShape)
    }

    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Result<&str, DegradedReason> {
        let candidate = self
            .candidates
            .as_deref()
            .and_then(|c| c.first())
            .ok_or(DegradedReason::NoCandidates)?;

        candidate
            .content
            .as_ref()
            .and_then(|content| content.parts.as_deref())
            .and_then(|parts| parts.first())
            .and_then(|part| part.text.as_deref())
            .ok_or(DegradedReason::MissingText)
    }
}

/// Classification of a configured model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Purely numeric id: a fine-tuned deployment endpoint.
    FineTuned,
    /// Anything else: a named published base model.
    Published,
}
