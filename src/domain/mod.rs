//! Domain layer: member snapshots, events, change detection and the event
//! bus.
//!
//! This module contains the member model (identifiers, snapshots, the
//! complete/incomplete prior state), the fine-grained [`MemberEvent`]s,
//! the [`ChangeDetector`] that derives them, and the [`EventBus`] they are
//! published on.

pub mod avatar;
pub mod change_detector;
pub mod event_bus;
pub mod ids;
pub mod member;
pub mod member_event;

pub use avatar::{AvatarCdn, StaticExtension};
pub use change_detector::{ChangeDetector, DetectOutcome};
pub use event_bus::{EventBus, EventSink};
pub use ids::{GuildId, RoleId, UserId};
pub use member::{MemberSnapshot, PartialMember, PreviousMember, RoleSet};
pub use member_event::MemberEvent;
