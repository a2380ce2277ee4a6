//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`; `/health` sits at the root.
//! Middleware: CORS, tracing.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Chat
        .route("/chat", post(handlers::chat::send_message))
        .route("/chat/reset", post(handlers::chat::reset_history))
        .route("/chat/history", get(handlers::chat::get_history))
        // Admin settings
        .route(
            "/admin/settings/system",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        // Reminders
        .route("/reminders", post(handlers::reminder::dispatch_reminder));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint. `sessions` counts conversations held in memory.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.chat_service.session_count(),
    }))
}
