//! Real-time statistics service for the Monty Hall game.
//!
//! Browsers submit finished rounds over HTTP; the server folds them into one
//! shared [`LiveStats`] aggregate, persists them through a [`ResultStore`] and
//! pushes every new snapshot to connected observers as server-sent events.

pub mod errors;
pub mod events;
pub mod handlers;
pub mod live;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod store;

pub use errors::{handle_rejection, ApiError, ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use events::{EventBus, EventSubscription, StatsEvent};
pub use live::LiveStats;
pub use logging::{init_logging, init_test_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use middleware::{log_response, with_request_logging};
pub use server::{routes, AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use store::{MemoryStore, ResultStore, SqliteStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_starts_empty_with_no_observers() {
        let ctx = AppContext::new_for_tests();
        let live = ctx.live();

        assert_eq!(live.events().subscriber_count(), 0);
        assert!(live.current().is_empty());
    }
}
