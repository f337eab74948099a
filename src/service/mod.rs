//! Service layer: business logic orchestration.
//!
//! [`MemberUpdateService`] runs the [`crate::domain::ChangeDetector`] over
//! incoming member updates and publishes the resulting events through the
//! [`crate::domain::EventBus`].

pub mod member_service;

pub use member_service::{MemberUpdateService, UpdateReport};
