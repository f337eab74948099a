//! Member update DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{MemberSnapshot, PreviousMember};

/// Request body for `POST /member-updates`.
///
/// Mirrors the pair delivered by the upstream client library: the cached
/// member before the update (possibly incomplete) and the member after.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberUpdateRequest {
    /// Member before the update.
    pub old: PreviousMember,
    /// Member after the update.
    pub new: MemberSnapshot,
}

/// Catalogue entry returned by `GET /config/event-types`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventTypeInfo {
    /// Stable event name.
    #[schema(value_type = String)]
    pub name: &'static str,
    /// What triggers the event.
    #[schema(value_type = String)]
    pub description: &'static str,
    /// Payload fields in positional order.
    #[schema(value_type = Vec<String>)]
    pub payload: Vec<&'static str>,
}
