//! System endpoints: health check and event type catalogue.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::EventTypeInfo;
use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Returns the catalogue of member events in emission order.
#[must_use]
pub fn event_catalogue() -> Vec<EventTypeInfo> {
    vec![
        EventTypeInfo {
            name: "boost-started",
            description: "Member started boosting the guild",
            payload: vec!["member"],
        },
        EventTypeInfo {
            name: "boost-stopped",
            description: "Member stopped boosting the guild",
            payload: vec!["member"],
        },
        EventTypeInfo {
            name: "role-added",
            description: "A role was granted; member is the pre-update snapshot",
            payload: vec!["member", "role"],
        },
        EventTypeInfo {
            name: "role-removed",
            description: "A role was revoked; member is the pre-update snapshot",
            payload: vec!["member", "role"],
        },
        EventTypeInfo {
            name: "nickname-changed",
            description: "Nickname was set, changed or cleared",
            payload: vec!["member", "old_nickname", "new_nickname"],
        },
        EventTypeInfo {
            name: "member-entered",
            description: "Membership-screening flag flipped",
            payload: vec!["member"],
        },
        EventTypeInfo {
            name: "avatar-added",
            description: "Guild avatar set where there was none",
            payload: vec!["member", "url"],
        },
        EventTypeInfo {
            name: "avatar-changed",
            description: "Guild avatar hash differs; also fires alongside added/removed",
            payload: vec!["member", "old_url", "new_url"],
        },
        EventTypeInfo {
            name: "avatar-removed",
            description: "Guild avatar cleared",
            payload: vec!["member", "old_url"],
        },
        EventTypeInfo {
            name: "unhandled-update",
            description: "Nothing specific detected, or previous snapshot incomplete",
            payload: vec!["old", "new"],
        },
    ]
}

/// `GET /config/event-types` — List the member events the gateway emits.
#[utoipa::path(
    get,
    path = "/config/event-types",
    tag = "System",
    summary = "List member event types",
    description = "Returns the stable event names, what triggers them, and their payload fields in positional order.",
    responses(
        (status = 200, description = "Event type catalogue", body = Vec<EventTypeInfo>),
    )
)]
pub async fn event_types_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(event_catalogue()))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/event-types", get(event_types_handler))
}
