use montyhall_engine::stats::Statistics;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

// Bounded per subscriber; a subscriber that falls this far behind is dropped
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<StatsEvent>;
pub type EventReceiver = mpsc::Receiver<StatsEvent>;

/// Messages pushed to connected observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StatsEvent {
    StatsUpdate { stats: Statistics },
}

impl StatsEvent {
    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            StatsEvent::StatsUpdate { .. } => "stats-update",
        }
    }

    pub fn stats(&self) -> &Statistics {
        match self {
            StatsEvent::StatsUpdate { stats } => stats,
        }
    }
}

pub struct EventSubscription {
    bus: EventBus,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn id(&self) -> usize {
        self.subscriber_id
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscriber_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<Vec<(usize, EventSender)>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw();
        EventSubscription {
            bus: self.clone(),
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned")
            .push((id, tx));

        tracing::info!(subscriber_id = id, "observer subscribed to stats updates");
        (id, rx)
    }

    /// Deliver `event` to every subscriber without blocking. Subscribers whose
    /// channel is full or closed are removed.
    pub fn broadcast(&self, event: StatsEvent) {
        let subscribers = self
            .inner
            .subscribers
            .read()
            .expect("subscriber lock poisoned")
            .clone();

        tracing::debug!(
            event = event.name(),
            total_games = event.stats().total_games,
            subscriber_count = subscribers.len(),
            "broadcasting stats event"
        );

        let mut failed = Vec::new();
        for (id, sender) in subscribers {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    subscriber_id = id,
                    error = ?e,
                    "dropping observer that cannot receive stats updates"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(&failed);
        }
    }

    pub fn unsubscribe(&self, subscriber_id: usize) {
        self.remove_subscribers(&[subscriber_id]);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .expect("subscriber lock poisoned")
            .len()
    }

    fn remove_subscribers(&self, ids: &[usize]) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned");
        guard.retain(|(id, _)| !ids.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(total_games: u64) -> StatsEvent {
        StatsEvent::StatsUpdate {
            stats: Statistics {
                total_games,
                stay_total: total_games,
                ..Statistics::default()
            },
        }
    }

    #[test]
    fn subscription_drop_unsubscribes() {
        let bus = EventBus::new();
        {
            let _sub = bus.subscribe();
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn broadcast_reaches_all_subscribers() {
        let bus = EventBus::new();
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        bus.broadcast(update(1));

        assert_eq!(sub1.receiver.try_recv().unwrap(), update(1));
        assert_eq!(sub2.receiver.try_recv().unwrap(), update(1));
    }

    #[test]
    fn stale_receiver_is_pruned() {
        let bus = EventBus::new();
        let (id, rx) = bus.subscribe_raw();
        drop(rx);
        bus.broadcast(update(1));
        assert_eq!(bus.subscriber_count(), 0);
        bus.unsubscribe(id);
    }

    #[test]
    fn full_subscriber_is_pruned() {
        let bus = EventBus::new();
        let _slow = bus.subscribe();
        for n in 0..=EVENT_CHANNEL_BUFFER as u64 {
            bus.broadcast(update(n));
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_value(update(2)).unwrap();
        assert_eq!(json["type"], "stats-update");
        assert_eq!(json["stats"]["totalGames"], 2);
        assert_eq!(update(2).name(), "stats-update");
    }
}
