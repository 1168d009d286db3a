//! The shared running aggregate behind the HTTP API.
//!
//! [`LiveStats`] owns the in-memory [`Statistics`] behind a mutex. Every
//! submission is applied and broadcast while the lock is held, so concurrent
//! submissions never lose updates and observers receive snapshots in order.
//! The store is the durable copy and is read once, on startup. From then on
//! the in-memory aggregate is authoritative: it is the loaded totals plus every
//! submission, whether or not the store accepted it.

use crate::events::{EventBus, EventSubscription, StatsEvent};
use crate::store::ResultStore;
use montyhall_engine::result::GameResult;
use montyhall_engine::stats::Statistics;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
pub struct LiveStats {
    stats: Mutex<Statistics>,
    store: Arc<dyn ResultStore>,
    events: EventBus,
}

impl LiveStats {
    pub fn new(store: Arc<dyn ResultStore>, events: EventBus) -> Self {
        Self {
            stats: Mutex::new(Statistics::new()),
            store,
            events,
        }
    }

    /// Seed the in-memory aggregate from the store. An empty or unreadable
    /// store leaves the current snapshot untouched.
    pub fn load_from_store(&self) -> Statistics {
        let mut stats = self.lock();
        match self.store.statistics() {
            Ok(persisted) if !persisted.is_empty() => {
                tracing::info!(
                    total_games = persisted.total_games,
                    "loaded statistics from store"
                );
                *stats = persisted;
            }
            Ok(_) => tracing::info!("store is empty, starting from in-memory statistics"),
            Err(e) => tracing::warn!(error = %e, "failed to load statistics from store"),
        }
        *stats
    }

    /// The in-memory snapshot.
    pub fn snapshot(&self) -> Statistics {
        *self.lock()
    }

    /// The snapshot served to clients.
    pub fn current(&self) -> Statistics {
        self.snapshot()
    }

    /// Persist and apply one result, then broadcast the new snapshot.
    ///
    /// A store failure is logged; the in-memory aggregate is still updated.
    pub fn submit(&self, result: &GameResult) -> Statistics {
        if let Err(e) = self.store.save(result) {
            tracing::warn!(result_id = %result.id, error = %e, "failed to persist game result");
        }

        let mut stats = self.lock();
        stats.record(result.strategy, result.won);
        let snapshot = *stats;
        tracing::info!(
            result_id = %result.id,
            strategy = %result.strategy,
            won = result.won,
            total_games = snapshot.total_games,
            "game result recorded"
        );
        self.events
            .broadcast(StatsEvent::StatsUpdate { stats: snapshot });
        snapshot
    }

    /// Zero the aggregate, clear the store and broadcast.
    pub fn reset(&self) -> Statistics {
        let mut stats = self.lock();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear stored results");
        }
        *stats = Statistics::new();
        tracing::info!("statistics reset");
        self.events
            .broadcast(StatsEvent::StatsUpdate { stats: *stats });
        *stats
    }

    /// Subscribe to updates together with the snapshot to send first.
    ///
    /// Taken under the aggregate lock so no update falls between the snapshot
    /// and the first delivered event.
    pub fn subscribe(&self) -> (Statistics, EventSubscription) {
        let stats = self.lock();
        let subscription = self.events.subscribe();
        (*stats, subscription)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn lock(&self) -> MutexGuard<'_, Statistics> {
        self.stats.lock().expect("statistics lock poisoned")
    }
}
