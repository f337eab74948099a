//! Member change detection.
//!
//! [`ChangeDetector`] compares the before/after snapshots of one member and
//! turns the difference into [`MemberEvent`]s. Checks run in a fixed order
//! and are independent of each other; each one may contribute zero or more
//! events. When none contributes, a single
//! [`MemberEvent::UnhandledUpdate`] is produced instead.
//!
//! A [`PreviousMember::Incomplete`] prior state skips every check and
//! goes straight to the fallback.

use super::avatar::AvatarCdn;
use super::{EventSink, MemberEvent, MemberSnapshot, PreviousMember};
use crate::error::GatewayError;

/// Result of a single [`ChangeDetector::detect`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectOutcome {
    /// Number of events handed to the sink (always at least 1).
    pub emitted: usize,
    /// Whether the emitted event was the unhandled fallback.
    pub fallback: bool,
}

/// Splits member updates into fine-grained events.
///
/// Stateless apart from the avatar resolver; the prior snapshot is always
/// supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    cdn: AvatarCdn,
}

impl ChangeDetector {
    /// Creates a detector resolving avatar URLs through `cdn`.
    #[must_use]
    pub fn new(cdn: AvatarCdn) -> Self {
        Self { cdn }
    }

    /// Computes the events for one update without emitting them.
    ///
    /// The returned list is never empty: it holds either the specific
    /// events in check order, or exactly one
    /// [`MemberEvent::UnhandledUpdate`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidAvatarHash`] if an avatar hash on
    /// either side cannot be resolved to a URL.
    pub fn diff(
        &self,
        old: &PreviousMember,
        new: &MemberSnapshot,
    ) -> Result<Vec<MemberEvent>, GatewayError> {
        let mut events = Vec::new();

        if let PreviousMember::Complete(prev) = old {
            boost_changes(prev, new, &mut events);
            role_changes(prev, new, &mut events);
            nickname_change(prev, new, &mut events);
            screening_change(prev, new, &mut events);
            self.avatar_changes(prev, new, &mut events)?;
        }

        if events.is_empty() {
            events.push(MemberEvent::UnhandledUpdate {
                old: old.clone(),
                new: new.clone(),
            });
        }

        Ok(events)
    }

    /// Computes the events for one update and hands each to `sink`, in
    /// order.
    ///
    /// Nothing is emitted if computing the events fails.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`ChangeDetector::diff`].
    pub fn detect<S: EventSink + ?Sized>(
        &self,
        old: &PreviousMember,
        new: &MemberSnapshot,
        sink: &mut S,
    ) -> Result<DetectOutcome, GatewayError> {
        let events = self.diff(old, new)?;
        let outcome = DetectOutcome {
            emitted: events.len(),
            fallback: events.first().is_some_and(MemberEvent::is_fallback),
        };

        tracing::debug!(
            guild_id = %new.guild_id,
            user_id = %new.user_id,
            incomplete = old.is_incomplete(),
            emitted = outcome.emitted,
            fallback = outcome.fallback,
            "member update diffed"
        );

        for event in events {
            sink.emit(event);
        }
        Ok(outcome)
    }

    fn avatar_changes(
        &self,
        old: &MemberSnapshot,
        new: &MemberSnapshot,
        events: &mut Vec<MemberEvent>,
    ) -> Result<(), GatewayError> {
        let (old_hash, new_hash) = (old.avatar_hash(), new.avatar_hash());

        if old_hash.is_none()
            && let Some(url) = new.avatar_url(&self.cdn)?
        {
            events.push(MemberEvent::AvatarAdded {
                member: new.clone(),
                url,
            });
        }

        // Fires together with added/removed when one side is absent.
        if old_hash != new_hash {
            events.push(MemberEvent::AvatarChanged {
                member: new.clone(),
                old_url: old.avatar_url(&self.cdn)?,
                new_url: new.avatar_url(&self.cdn)?,
            });
        }

        if new_hash.is_none()
            && let Some(url) = old.avatar_url(&self.cdn)?
        {
            events.push(MemberEvent::AvatarRemoved {
                member: new.clone(),
                old_url: url,
            });
        }

        Ok(())
    }
}

fn boost_changes(old: &MemberSnapshot, new: &MemberSnapshot, events: &mut Vec<MemberEvent>) {
    match (old.premium_since, new.premium_since) {
        (None, Some(_)) => events.push(MemberEvent::BoostStarted {
            member: new.clone(),
        }),
        (Some(_), None) => events.push(MemberEvent::BoostStopped {
            member: new.clone(),
        }),
        _ => {}
    }
}

/// Role events carry the member as it was before the update.
fn role_changes(old: &MemberSnapshot, new: &MemberSnapshot, events: &mut Vec<MemberEvent>) {
    events.extend(
        new.roles
            .difference(&old.roles)
            .map(|role| MemberEvent::RoleAdded {
                member: old.clone(),
                role,
            }),
    );
    events.extend(
        old.roles
            .difference(&new.roles)
            .map(|role| MemberEvent::RoleRemoved {
                member: old.clone(),
                role,
            }),
    );
}

fn nickname_change(old: &MemberSnapshot, new: &MemberSnapshot, events: &mut Vec<MemberEvent>) {
    if old.nickname != new.nickname {
        events.push(MemberEvent::NicknameChanged {
            member: new.clone(),
            old_nickname: old.nickname.clone(),
            new_nickname: new.nickname.clone(),
        });
    }
}

/// Any flip of the screening flag counts, in either direction.
fn screening_change(old: &MemberSnapshot, new: &MemberSnapshot, events: &mut Vec<MemberEvent>) {
    if old.pending != new.pending {
        events.push(MemberEvent::MemberEntered {
            member: new.clone(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{GuildId, PartialMember, RoleId, UserId};

    const GUILD: GuildId = GuildId::new(100);
    const USER: UserId = UserId::new(200);

    fn base() -> MemberSnapshot {
        MemberSnapshot::new(GUILD, USER)
    }

    fn names(events: &[MemberEvent]) -> Vec<&'static str> {
        events.iter().map(MemberEvent::name).collect()
    }

    fn run(old: &PreviousMember, new: &MemberSnapshot) -> Vec<MemberEvent> {
        let detector = ChangeDetector::default();
        let mut seen = Vec::new();
        let outcome = match detector.detect(old, new, &mut |event: MemberEvent| seen.push(event)) {
            Ok(outcome) => outcome,
            Err(err) => panic!("detect failed: {err}"),
        };
        assert_eq!(outcome.emitted, seen.len());
        seen
    }

    fn complete(snapshot: MemberSnapshot) -> PreviousMember {
        PreviousMember::Complete(snapshot)
    }

    #[test]
    fn identical_snapshots_fire_only_fallback() {
        let member = base()
            .with_nickname(Some("Bob"))
            .with_roles([RoleId::new(1)])
            .with_avatar(Some("abc"));
        let events = run(&complete(member.clone()), &member);
        assert_eq!(names(&events), vec!["unhandled-update"]);
        assert_eq!(
            events.first(),
            Some(&MemberEvent::UnhandledUpdate {
                old: complete(member.clone()),
                new: member,
            })
        );
    }

    #[test]
    fn incomplete_old_skips_all_checks() {
        let old = PreviousMember::Incomplete(PartialMember {
            guild_id: GUILD,
            user_id: USER,
        });
        let new = base()
            .with_nickname(Some("Alice"))
            .with_roles([RoleId::new(1), RoleId::new(2)])
            .with_pending(true)
            .with_avatar(Some("abc"));
        let detector = ChangeDetector::default();
        let mut seen = Vec::new();
        let outcome = detector.detect(&old, &new, &mut |event: MemberEvent| seen.push(event));
        assert_eq!(
            outcome.ok(),
            Some(DetectOutcome {
                emitted: 1,
                fallback: true
            })
        );
        assert_eq!(names(&seen), vec!["unhandled-update"]);
    }

    #[test]
    fn boost_start_fires_with_new_member() {
        let since = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single();
        let old = base();
        let new = base().with_premium_since(since);
        let events = run(&complete(old), &new);
        assert_eq!(events, vec![MemberEvent::BoostStarted { member: new }]);
    }

    #[test]
    fn boost_stop_fires_with_new_member() {
        let since = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single();
        let old = base().with_premium_since(since);
        let new = base();
        let events = run(&complete(old), &new);
        assert_eq!(events, vec![MemberEvent::BoostStopped { member: new }]);
    }

    #[test]
    fn changed_boost_timestamp_is_not_a_start_or_stop() {
        let a = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single();
        let b = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single();
        let events = run(
            &complete(base().with_premium_since(a)),
            &base().with_premium_since(b),
        );
        assert_eq!(names(&events), vec!["unhandled-update"]);
    }

    #[test]
    fn role_swap_fires_one_add_and_one_remove() {
        let (a, b, c) = (RoleId::new(1), RoleId::new(2), RoleId::new(3));
        let old = base().with_roles([a, b]);
        let new = base().with_roles([b, c]);
        let events = run(&complete(old.clone()), &new);
        assert_eq!(
            events,
            vec![
                MemberEvent::RoleAdded {
                    member: old.clone(),
                    role: c,
                },
                MemberEvent::RoleRemoved { member: old, role: a },
            ]
        );
    }

    #[test]
    fn role_events_follow_set_iteration_order() {
        let old = base().with_roles([RoleId::new(9), RoleId::new(5)]);
        let new = base().with_roles([RoleId::new(7), RoleId::new(3)]);
        let roles: Vec<(&str, RoleId)> = run(&complete(old), &new)
            .into_iter()
            .filter_map(|event| match event {
                MemberEvent::RoleAdded { role, .. } => Some(("added", role)),
                MemberEvent::RoleRemoved { role, .. } => Some(("removed", role)),
                _ => None,
            })
            .collect();
        assert_eq!(
            roles,
            vec![
                ("added", RoleId::new(7)),
                ("added", RoleId::new(3)),
                ("removed", RoleId::new(9)),
                ("removed", RoleId::new(5)),
            ]
        );
    }

    #[test]
    fn cleared_nickname_reports_old_and_absent_new() {
        let old = base().with_nickname(Some("Bob"));
        let new = base();
        let events = run(&complete(old), &new);
        assert_eq!(
            events,
            vec![MemberEvent::NicknameChanged {
                member: new,
                old_nickname: Some("Bob".to_string()),
                new_nickname: None,
            }]
        );
    }

    #[test]
    fn pending_flip_fires_member_entered_both_ways() {
        for (before, after) in [(false, true), (true, false)] {
            let new = base().with_pending(after);
            let events = run(&complete(base().with_pending(before)), &new);
            assert_eq!(events, vec![MemberEvent::MemberEntered { member: new }]);
        }
    }

    #[test]
    fn avatar_set_fires_added_and_changed() {
        let new = base().with_avatar(Some("abc"));
        let events = run(&complete(base()), &new);
        let url = "https://cdn.discordapp.com/guilds/100/users/200/avatars/abc.webp".to_string();
        assert_eq!(
            events,
            vec![
                MemberEvent::AvatarAdded {
                    member: new.clone(),
                    url: url.clone(),
                },
                MemberEvent::AvatarChanged {
                    member: new,
                    old_url: None,
                    new_url: Some(url),
                },
            ]
        );
    }

    #[test]
    fn avatar_cleared_fires_changed_and_removed() {
        let old = base().with_avatar(Some("x"));
        let new = base();
        let events = run(&complete(old), &new);
        let url = "https://cdn.discordapp.com/guilds/100/users/200/avatars/x.webp".to_string();
        assert_eq!(
            events,
            vec![
                MemberEvent::AvatarChanged {
                    member: new.clone(),
                    old_url: Some(url.clone()),
                    new_url: None,
                },
                MemberEvent::AvatarRemoved {
                    member: new,
                    old_url: url,
                },
            ]
        );
    }

    #[test]
    fn avatar_replaced_fires_only_changed() {
        let events = run(
            &complete(base().with_avatar(Some("aaa"))),
            &base().with_avatar(Some("a_bbb")),
        );
        assert_eq!(names(&events), vec!["avatar-changed"]);
        let Some(MemberEvent::AvatarChanged { new_url, .. }) = events.first() else {
            panic!("expected avatar-changed");
        };
        assert!(new_url.as_deref().is_some_and(|url| url.ends_with("a_bbb.gif")));
    }

    #[test]
    fn every_check_fires_in_order() {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();
        let old = base()
            .with_roles([RoleId::new(1)])
            .with_nickname(Some("old"))
            .with_pending(true);
        let new = base()
            .with_premium_since(since)
            .with_roles([RoleId::new(2)])
            .with_nickname(Some("new"))
            .with_avatar(Some("abc"));
        let events = run(&complete(old), &new);
        assert_eq!(
            names(&events),
            vec![
                "boost-started",
                "role-added",
                "role-removed",
                "nickname-changed",
                "member-entered",
                "avatar-added",
                "avatar-changed",
            ]
        );
    }

    #[test]
    fn repeated_detection_is_order_stable() {
        let old = complete(base().with_roles([RoleId::new(1), RoleId::new(2)]));
        let new = base()
            .with_roles([RoleId::new(3), RoleId::new(4)])
            .with_nickname(Some("n"));
        assert_eq!(run(&old, &new), run(&old, &new));
    }

    #[test]
    fn invalid_avatar_hash_emits_nothing() {
        let detector = ChangeDetector::default();
        let old = complete(base().with_nickname(Some("a")));
        let new = base().with_nickname(Some("b")).with_avatar(Some("not/a/hash"));
        let mut seen = Vec::new();
        let outcome = detector.detect(&old, &new, &mut |event: MemberEvent| seen.push(event));
        assert!(matches!(outcome, Err(GatewayError::InvalidAvatarHash(_))));
        assert!(seen.is_empty());
    }

    #[test]
    fn unchanged_invalid_avatar_is_not_resolved() {
        let member = base().with_avatar(Some("not/a/hash"));
        let events = run(&complete(member.clone()), &member);
        assert_eq!(names(&events), vec!["unhandled-update"]);
    }

    #[test]
    fn empty_avatar_hash_does_not_block_other_changes() {
        let old = complete(base().with_nickname(Some("a")));
        let new = base().with_nickname(Some("b")).with_avatar(Some(""));
        let events = run(&old, &new);
        assert_eq!(names(&events), vec!["nickname-changed"]);
    }

    #[test]
    fn empty_and_missing_avatar_are_equal() {
        let events = run(&complete(base().with_avatar(Some(""))), &base());
        assert_eq!(names(&events), vec!["unhandled-update"]);
    }

    #[test]
    fn diff_never_returns_empty() {
        let detector = ChangeDetector::default();
        let old = complete(base());
        let Ok(events) = detector.diff(&old, &base()) else {
            panic!("diff failed");
        };
        assert_eq!(events.len(), 1);
        assert!(events.iter().all(MemberEvent::is_fallback));
    }
}
