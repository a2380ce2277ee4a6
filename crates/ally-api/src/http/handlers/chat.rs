//! Chat endpoint handlers for the REST API.
//!
//! Each request names a session (or shares the `"default"` one). A failed
//! exchange still carries conversational text; whether it is reported as
//! 200 or 502 is decided by `server.surface_chat_failures`.

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use ally_types::chat::{ChatReply, DegradedReason, ReplyOutcome, SessionId, Turn};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub outcome: ReplyOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<DegradedReason>,
}

/// Optional body for POST /chat/reset.
#[derive(Debug, Default, Deserialize)]
pub struct SessionSelector {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub turns: Vec<Turn>,
}

/// POST /api/v1/chat - Send one user message and return the model's reply.
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<ApiResponse<ChatResponse>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let session_id = SessionId::from_optional(req.session_id.as_deref());
    let reply = state
        .chat_service
        .send_message(&session_id, &req.message)
        .await;

    let degraded_reason = match &reply {
        ChatReply::Degraded { reason } => Some(*reason),
        _ => None,
    };
    let data = ChatResponse {
        session_id: session_id.to_string(),
        reply: reply.text(),
        outcome: reply.outcome(),
        degraded_reason,
    };

    let encoded_id: String =
        url::form_urlencoded::byte_serialize(session_id.as_str().as_bytes()).collect();
    let elapsed = start.elapsed().as_millis() as u64;
    let mut resp = ApiResponse::success(data, request_id, elapsed)
        .with_link("self", "/api/v1/chat")
        .with_link(
            "history",
            &format!("/api/v1/chat/history?session_id={encoded_id}"),
        );

    if let ChatReply::Failed { message } = &reply {
        if state.config.server.surface_chat_failures {
            resp = resp.with_error("UPSTREAM_ERROR", message);
        }
    }

    Ok(resp)
}

/// POST /api/v1/chat/reset - Clear a session's history.
///
/// The body is optional; an empty body resets the default session.
pub async fn reset_history(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let selector: SessionSelector = if body.iter().all(u8::is_ascii_whitespace) {
        SessionSelector::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("invalid reset request: {e}")))?
    };

    let session_id = SessionId::from_optional(selector.session_id.as_deref());
    state.chat_service.reset_history(&session_id).await;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({ "session_id": session_id, "reset": true }),
        request_id,
        elapsed,
    )
    .with_link("chat", "/api/v1/chat");

    Ok(Json(resp))
}

/// GET /api/v1/chat/history?session_id= - Turns recorded for a session.
pub async fn get_history(
    State(state): State<AppState>,
    Query(selector): Query<SessionSelector>,
) -> Result<Json<ApiResponse<HistoryResponse>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let session_id = SessionId::from_optional(selector.session_id.as_deref());
    let turns = state.chat_service.history(&session_id).await;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        HistoryResponse {
            session_id: session_id.to_string(),
            turns,
        },
        request_id,
        elapsed,
    )
    .with_link("self", "/api/v1/chat/history");

    Ok(Json(resp))
}
