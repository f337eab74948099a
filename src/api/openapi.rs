//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::handlers::{member_update, system};

/// Aggregated OpenAPI document, served by Swagger UI when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "guild-member-gateway",
        description = "Splits guild member updates into fine-grained member events."
    ),
    paths(
        member_update::submit_update,
        system::health_handler,
        system::event_types_handler,
    ),
    tags(
        (name = "Members", description = "Member update ingestion"),
        (name = "System", description = "Health and catalogue endpoints"),
    )
)]
pub struct ApiDoc;
