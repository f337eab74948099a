//! Member update handler: feeds snapshot pairs into the change detector.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::MemberUpdateRequest;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::UpdateReport;

/// `POST /member-updates` — Split a member update into fine-grained events.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidAvatarHash`] if an avatar hash on either
/// snapshot cannot be resolved.
#[utoipa::path(
    post,
    path = "/api/v1/member-updates",
    tag = "Members",
    summary = "Process a member update",
    description = "Diffs the previous and current member snapshots, publishes one event per detected change to WebSocket subscribers, and falls back to `unhandled-update` when nothing specific changed or the previous snapshot is incomplete.",
    request_body = MemberUpdateRequest,
    responses(
        (status = 200, description = "Update processed", body = UpdateReport),
        (status = 422, description = "Avatar hash could not be resolved", body = ErrorResponse),
    )
)]
pub async fn submit_update(
    State(state): State<AppState>,
    Json(req): Json<MemberUpdateRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let report = state.member_service.handle_update(&req.old, &req.new)?;
    Ok(Json(report))
}

/// Member update routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/member-updates", post(submit_update))
}
