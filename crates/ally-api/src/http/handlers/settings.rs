//! System settings endpoint handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use ally_types::settings::{SettingsUpdate, SystemSettings};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/admin/settings/system - Current settings (defaults on first read).
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SystemSettings>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let settings = state.settings_service.get_settings().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(settings, request_id, elapsed)
        .with_link("self", "/api/v1/admin/settings/system");

    Ok(Json(resp))
}

/// PUT /api/v1/admin/settings/system - Replace both toggles.
///
/// Omitted toggles take their default values.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<ApiResponse<SystemSettings>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let settings = state.settings_service.update_settings(&update).await?;
    tracing::info!(
        enable_email_verification = settings.enable_email_verification,
        enable_appointment_reminders = settings.enable_appointment_reminders,
        "system settings updated"
    );

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(settings, request_id, elapsed)
        .with_link("self", "/api/v1/admin/settings/system");

    Ok(Json(resp))
}
