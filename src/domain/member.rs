//! Guild member snapshots.
//!
//! A [`MemberSnapshot`] is a read-only view of a member at one moment. The
//! "before" side of an update may be unreliable (the upstream cache only had
//! a partial entry), which is modelled by [`PreviousMember::Incomplete`].
//! Only the [`PreviousMember::Complete`] variant exposes fields that can be
//! compared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::avatar::AvatarCdn;
use super::{GuildId, RoleId, UserId};
use crate::error::GatewayError;

/// Insertion-ordered set of role identifiers.
///
/// Duplicates are dropped on construction, keeping the first occurrence.
/// Iteration order is stable, which keeps event emission deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "Vec<RoleId>")]
#[schema(value_type = Vec<String>)]
pub struct RoleSet(Vec<RoleId>);

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `role` if absent. Returns `true` if it was inserted.
    pub fn insert(&mut self, role: RoleId) -> bool {
        if self.contains(role) {
            return false;
        }
        self.0.push(role);
        true
    }

    /// Returns `true` if `role` is in the set.
    #[must_use]
    pub fn contains(&self, role: RoleId) -> bool {
        self.0.contains(&role)
    }

    /// Iterates roles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.0.iter().copied()
    }

    /// Roles present in `self` but not in `other`, in `self`'s order.
    pub fn difference<'a>(&'a self, other: &'a RoleSet) -> impl Iterator<Item = RoleId> + 'a {
        self.iter().filter(move |role| !other.contains(*role))
    }

    /// Number of roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set holds no roles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<RoleId>> for RoleSet {
    fn from(roles: Vec<RoleId>) -> Self {
        roles.into_iter().collect()
    }
}

impl FromIterator<RoleId> for RoleSet {
    fn from_iter<I: IntoIterator<Item = RoleId>>(iter: I) -> Self {
        let mut set = Self::new();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

/// Observable state of a guild member at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MemberSnapshot {
    /// Guild the member belongs to.
    pub guild_id: GuildId,
    /// The member's user.
    pub user_id: UserId,
    /// When the member started boosting the guild, if they are boosting.
    #[serde(default)]
    pub premium_since: Option<DateTime<Utc>>,
    /// Guild nickname, if set.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Roles held by the member.
    #[serde(default)]
    pub roles: RoleSet,
    /// Whether the member has yet to pass membership screening.
    #[serde(default)]
    pub pending: bool,
    /// Guild-specific avatar hash, if set. An empty hash means no avatar.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub avatar: Option<String>,
}

impl MemberSnapshot {
    /// Creates a snapshot with no boost, nickname, roles or avatar.
    #[must_use]
    pub fn new(guild_id: GuildId, user_id: UserId) -> Self {
        Self {
            guild_id,
            user_id,
            premium_since: None,
            nickname: None,
            roles: RoleSet::new(),
            pending: false,
            avatar: None,
        }
    }

    /// Sets the boost start timestamp.
    #[must_use]
    pub fn with_premium_since(mut self, since: Option<DateTime<Utc>>) -> Self {
        self.premium_since = since;
        self
    }

    /// Sets the nickname.
    #[must_use]
    pub fn with_nickname(mut self, nickname: Option<&str>) -> Self {
        self.nickname = nickname.map(str::to_string);
        self
    }

    /// Replaces the role set.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Sets the membership-screening flag.
    #[must_use]
    pub fn with_pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Sets the guild avatar hash.
    #[must_use]
    pub fn with_avatar(mut self, avatar: Option<&str>) -> Self {
        self.avatar = avatar.map(str::to_string);
        self
    }

    /// Returns the guild avatar hash, treating an empty hash as absent.
    #[must_use]
    pub fn avatar_hash(&self) -> Option<&str> {
        self.avatar.as_deref().filter(|hash| !hash.is_empty())
    }

    /// Resolves the guild avatar hash to a URL, if the member has one.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidAvatarHash`] if the stored hash
    /// cannot be turned into a URL.
    pub fn avatar_url(&self, cdn: &AvatarCdn) -> Result<Option<String>, GatewayError> {
        self.avatar_hash()
            .map(|hash| cdn.member_avatar_url(self.guild_id, self.user_id, hash))
            .transpose()
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let hash = Option::<String>::deserialize(deserializer)?;
    Ok(hash.filter(|h| !h.is_empty()))
}

/// Identity of a member whose cached state was not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PartialMember {
    /// Guild the member belongs to.
    pub guild_id: GuildId,
    /// The member's user.
    pub user_id: UserId,
}

/// The "before" side of a member update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PreviousMember {
    /// Full prior state; field comparisons are meaningful.
    Complete(MemberSnapshot),
    /// Prior state unknown; only identity is available.
    Incomplete(PartialMember),
}

impl PreviousMember {
    /// Guild of the member.
    #[must_use]
    pub const fn guild_id(&self) -> GuildId {
        match self {
            Self::Complete(snapshot) => snapshot.guild_id,
            Self::Incomplete(partial) => partial.guild_id,
        }
    }

    /// User of the member.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        match self {
            Self::Complete(snapshot) => snapshot.user_id,
            Self::Incomplete(partial) => partial.user_id,
        }
    }

    /// Returns the snapshot when the prior state is complete.
    #[must_use]
    pub const fn as_complete(&self) -> Option<&MemberSnapshot> {
        match self {
            Self::Complete(snapshot) => Some(snapshot),
            Self::Incomplete(_) => None,
        }
    }

    /// Returns `true` for [`PreviousMember::Incomplete`].
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete(_))
    }
}

impl From<MemberSnapshot> for PreviousMember {
    fn from(snapshot: MemberSnapshot) -> Self {
        Self::Complete(snapshot)
    }
}

impl From<PartialMember> for PreviousMember {
    fn from(partial: PartialMember) -> Self {
        Self::Incomplete(partial)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn role(n: u64) -> RoleId {
        RoleId::new(n)
    }

    #[test]
    fn role_set_drops_duplicates_keeping_first_order() {
        let set: RoleSet = vec![role(3), role(1), role(3), role(2)].into();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![role(3), role(1), role(2)]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn role_set_difference_follows_left_order() {
        let a: RoleSet = vec![role(1), role(2), role(3)].into();
        let b: RoleSet = vec![role(2)].into();
        assert_eq!(a.difference(&b).collect::<Vec<_>>(), vec![role(1), role(3)]);
        assert!(b.difference(&a).next().is_none());
    }

    #[test]
    fn snapshot_deserializes_with_defaults() {
        let json = r#"{"guild_id":"1","user_id":"2"}"#;
        let Ok(snapshot) = serde_json::from_str::<MemberSnapshot>(json) else {
            panic!("minimal snapshot should parse");
        };
        assert_eq!(snapshot, MemberSnapshot::new(GuildId::new(1), UserId::new(2)));
    }

    #[test]
    fn previous_member_is_tagged_by_state() {
        let json = r#"{"state":"incomplete","guild_id":"1","user_id":"2"}"#;
        let Ok(prev) = serde_json::from_str::<PreviousMember>(json) else {
            panic!("incomplete member should parse");
        };
        assert!(prev.is_incomplete());
        assert!(prev.as_complete().is_none());
        assert_eq!(prev.user_id(), UserId::new(2));

        let json = r#"{"state":"complete","guild_id":"1","user_id":"2","nickname":"Bob","roles":["5","5"]}"#;
        let Ok(prev) = serde_json::from_str::<PreviousMember>(json) else {
            panic!("complete member should parse");
        };
        let Some(snapshot) = prev.as_complete() else {
            panic!("expected complete variant");
        };
        assert_eq!(snapshot.nickname.as_deref(), Some("Bob"));
        assert_eq!(snapshot.roles.len(), 1);
    }

    #[test]
    fn empty_avatar_hash_is_absent() {
        let json = r#"{"guild_id":"1","user_id":"2","avatar":""}"#;
        let Ok(snapshot) = serde_json::from_str::<MemberSnapshot>(json) else {
            panic!("snapshot with empty avatar should parse");
        };
        assert_eq!(snapshot.avatar, None);

        let built = MemberSnapshot::new(GuildId::new(1), UserId::new(2)).with_avatar(Some(""));
        assert_eq!(built.avatar_hash(), None);
        assert!(matches!(built.avatar_url(&AvatarCdn::default()), Ok(None)));
    }

    #[test]
    fn avatar_url_is_none_without_hash() {
        let snapshot = MemberSnapshot::new(GuildId::new(1), UserId::new(2));
        let url = snapshot.avatar_url(&AvatarCdn::default());
        assert!(matches!(url, Ok(None)));
    }
}
