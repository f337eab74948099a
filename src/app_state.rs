//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::MemberUpdateService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Member update service for all business logic.
    pub member_service: Arc<MemberUpdateService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds the state from a service, sharing its event bus.
    #[must_use]
    pub fn new(member_service: MemberUpdateService) -> Self {
        let event_bus = member_service.event_bus().clone();
        Self {
            member_service: Arc::new(member_service),
            event_bus,
        }
    }
}
