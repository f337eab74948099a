//! Fine-grained member events.
//!
//! One generic "member updated" notification is split by the
//! [`super::ChangeDetector`] into the [`MemberEvent`]s below. The event
//! names returned by [`MemberEvent::name`] and the field order of each
//! variant are the public contract consumed by subscribers.

use serde::Serialize;
use utoipa::ToSchema;

use super::{GuildId, MemberSnapshot, PreviousMember, RoleId, UserId};

/// Event emitted for a single detected member change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum MemberEvent {
    /// The member started boosting the guild.
    BoostStarted {
        /// Member after the update.
        member: MemberSnapshot,
    },

    /// The member stopped boosting the guild.
    BoostStopped {
        /// Member after the update.
        member: MemberSnapshot,
    },

    /// A role was granted.
    RoleAdded {
        /// Member before the update.
        member: MemberSnapshot,
        /// The granted role.
        role: RoleId,
    },

    /// A role was revoked.
    RoleRemoved {
        /// Member before the update.
        member: MemberSnapshot,
        /// The revoked role.
        role: RoleId,
    },

    /// The guild nickname changed, was set, or was cleared.
    NicknameChanged {
        /// Member after the update.
        member: MemberSnapshot,
        /// Nickname before the update.
        old_nickname: Option<String>,
        /// Nickname after the update.
        new_nickname: Option<String>,
    },

    /// The membership-screening flag flipped.
    MemberEntered {
        /// Member after the update.
        member: MemberSnapshot,
    },

    /// A guild avatar was set where there was none.
    AvatarAdded {
        /// Member after the update.
        member: MemberSnapshot,
        /// URL of the new avatar.
        url: String,
    },

    /// The guild avatar hash differs between the two snapshots.
    AvatarChanged {
        /// Member after the update.
        member: MemberSnapshot,
        /// URL of the previous avatar, if there was one.
        old_url: Option<String>,
        /// URL of the current avatar, if there is one.
        new_url: Option<String>,
    },

    /// The guild avatar was cleared.
    AvatarRemoved {
        /// Member after the update.
        member: MemberSnapshot,
        /// URL of the removed avatar.
        old_url: String,
    },

    /// Nothing specific was detected.
    UnhandledUpdate {
        /// Member before the update, possibly incomplete.
        old: PreviousMember,
        /// Member after the update.
        new: MemberSnapshot,
    },
}

impl MemberEvent {
    /// Every event name, in check order. The fallback comes last.
    pub const NAMES: [&'static str; 10] = [
        "boost-started",
        "boost-stopped",
        "role-added",
        "role-removed",
        "nickname-changed",
        "member-entered",
        "avatar-added",
        "avatar-changed",
        "avatar-removed",
        "unhandled-update",
    ];

    /// Returns the stable event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BoostStarted { .. } => "boost-started",
            Self::BoostStopped { .. } => "boost-stopped",
            Self::RoleAdded { .. } => "role-added",
            Self::RoleRemoved { .. } => "role-removed",
            Self::NicknameChanged { .. } => "nickname-changed",
            Self::MemberEntered { .. } => "member-entered",
            Self::AvatarAdded { .. } => "avatar-added",
            Self::AvatarChanged { .. } => "avatar-changed",
            Self::AvatarRemoved { .. } => "avatar-removed",
            Self::UnhandledUpdate { .. } => "unhandled-update",
        }
    }

    /// Returns `true` for the catch-all fallback event.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::UnhandledUpdate { .. })
    }

    /// Returns the guild this event belongs to.
    #[must_use]
    pub const fn guild_id(&self) -> GuildId {
        match self {
            Self::BoostStarted { member }
            | Self::BoostStopped { member }
            | Self::RoleAdded { member, .. }
            | Self::RoleRemoved { member, .. }
            | Self::NicknameChanged { member, .. }
            | Self::MemberEntered { member }
            | Self::AvatarAdded { member, .. }
            | Self::AvatarChanged { member, .. }
            | Self::AvatarRemoved { member, .. } => member.guild_id,
            Self::UnhandledUpdate { new, .. } => new.guild_id,
        }
    }

    /// Returns the user this event belongs to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        match self {
            Self::BoostStarted { member }
            | Self::BoostStopped { member }
            | Self::RoleAdded { member, .. }
            | Self::RoleRemoved { member, .. }
            | Self::NicknameChanged { member, .. }
            | Self::MemberEntered { member }
            | Self::AvatarAdded { member, .. }
            | Self::AvatarChanged { member, .. }
            | Self::AvatarRemoved { member, .. } => member.user_id,
            Self::UnhandledUpdate { new, .. } => new.user_id,
        }
    }
}
