//! Data Transfer Objects for REST request/response serialization.
//!
//! Snowflake identifiers are serialized as JSON strings to avoid precision
//! loss in JavaScript clients.

pub mod member_update_dto;

pub use member_update_dto::*;
