//! Member update service: runs change detection and publishes events.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ChangeDetector, EventBus, MemberEvent, MemberSnapshot, PreviousMember};
use crate::error::GatewayError;

/// Summary of one processed member update.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateReport {
    /// Correlation id assigned to this update.
    pub update_id: uuid::Uuid,
    /// Names of the emitted events, in emission order.
    #[schema(value_type = Vec<String>)]
    pub events: Vec<&'static str>,
    /// Whether only the unhandled fallback fired.
    pub fallback: bool,
    /// Total deliveries across all bus subscribers.
    pub delivered: usize,
}

/// Orchestration layer for member updates.
///
/// Stateless coordinator: owns the [`ChangeDetector`] and the [`EventBus`]
/// the detected events are published on. Prior member state is never
/// cached; every update carries both snapshots.
#[derive(Debug, Clone)]
pub struct MemberUpdateService {
    detector: ChangeDetector,
    event_bus: EventBus,
}

impl MemberUpdateService {
    /// Creates a new `MemberUpdateService`.
    #[must_use]
    pub fn new(detector: ChangeDetector, event_bus: EventBus) -> Self {
        Self {
            detector,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Diffs one member update and publishes the resulting events.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidAvatarHash`] if an avatar on either
    /// snapshot cannot be resolved. No events are published in that case.
    pub fn handle_update(
        &self,
        old: &PreviousMember,
        new: &MemberSnapshot,
    ) -> Result<UpdateReport, GatewayError> {
        let update_id = uuid::Uuid::new_v4();
        let mut events = Vec::new();
        let mut delivered = 0;

        let outcome = self.detector.detect(old, new, &mut |event: MemberEvent| {
            events.push(event.name());
            delivered += self.event_bus.publish(event);
        })?;

        tracing::info!(
            %update_id,
            guild_id = %new.guild_id,
            user_id = %new.user_id,
            emitted = outcome.emitted,
            fallback = outcome.fallback,
            delivered,
            "member update processed"
        );

        Ok(UpdateReport {
            update_id,
            events,
            fallback: outcome.fallback,
            delivered,
        })
    }
}
