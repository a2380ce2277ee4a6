//! Appointment reminder endpoint handler for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use ally_types::schedule::{Appointment, ReminderOutcome};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/reminders - Email both participants of one appointment.
pub async fn dispatch_reminder(
    State(state): State<AppState>,
    Json(appointment): Json<Appointment>,
) -> Result<Json<ApiResponse<ReminderOutcome>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let outcome = state.reminder_service.dispatch(&appointment).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(outcome, request_id, elapsed)
        .with_link("settings", "/api/v1/admin/settings/system");

    Ok(Json(resp))
}
