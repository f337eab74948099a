//! Event sinks and the broadcast bus for member events.
//!
//! The [`super::ChangeDetector`] only knows about [`EventSink`]. In the
//! running gateway the sink is the [`EventBus`], a wrapper around a
//! [`tokio::sync::broadcast`] channel that every WebSocket connection
//! subscribes to. In tests any `FnMut(MemberEvent)` closure works.

use tokio::sync::broadcast;

use super::MemberEvent;

/// Destination for emitted [`MemberEvent`]s.
pub trait EventSink {
    /// Publishes one event.
    fn emit(&mut self, event: MemberEvent);
}

impl<F> EventSink for F
where
    F: FnMut(MemberEvent),
{
    fn emit(&mut self, event: MemberEvent) {
        self(event);
    }
}

/// Broadcast bus for [`MemberEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity
/// (default 10 000). When the ring buffer is full, the oldest events are
/// dropped for lagging receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MemberEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: MemberEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    ///
    /// Each WebSocket connection should call this once on connect.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MemberEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for EventBus {
    fn emit(&mut self, event: MemberEvent) {
        let delivered = self.publish(event);
        tracing::trace!(delivered, "member event published");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{GuildId, MemberSnapshot, UserId};

    fn make_event(guild: u64) -> MemberEvent {
        MemberEvent::MemberEntered {
            member: MemberSnapshot::new(GuildId::new(guild), UserId::new(2)),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(100);
        let count = bus.publish(make_event(1));
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn subscriber_receives_event() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();

        bus.publish(make_event(7));

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected to receive event");
        };
        assert_eq!(event.guild_id(), GuildId::new(7));
    }

    #[tokio::test]
    async fn sink_impl_forwards_to_subscribers() {
        let mut bus = EventBus::new(100);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(make_event(3));

        let Ok(e1) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(e2) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(e1, e2);
        assert_eq!(e1.name(), "member-entered");
    }

    #[test]
    fn closure_is_a_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |event: MemberEvent| seen.push(event.name());
            sink.emit(make_event(1));
            sink.emit(make_event(2));
        }
        assert_eq!(seen, vec!["member-entered", "member-entered"]);
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = EventBus::new(100);
        assert_eq!(bus.receiver_count(), 0);

        let rx1 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }
}
