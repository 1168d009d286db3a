use crate::events::{EventSubscription, StatsEvent};
use crate::live::LiveStats;
use montyhall_engine::stats::Statistics;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use warp::http;
use warp::reply::{self, Response};
use warp::sse;
use warp::Reply;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// `GET /api/stats/events`: the current snapshot, then every update.
pub fn stream_stats(live: Arc<LiveStats>) -> Response {
    let (initial, subscription) = live.subscribe();
    let stream = event_stream(initial, subscription)
        .map(|event| Ok::<_, Infallible>(render_event(&event)));
    let keep_alive = sse::keep_alive()
        .interval(KEEP_ALIVE_INTERVAL)
        .text("keep-alive");

    let reply = sse::reply(keep_alive.stream(stream));
    reply::with_header(reply, http::header::CACHE_CONTROL, "no-cache").into_response()
}

/// Events for one observer. The subscription stays registered until the
/// stream is dropped.
pub fn event_stream(
    initial: Statistics,
    subscription: EventSubscription,
) -> impl Stream<Item = StatsEvent> + Send + 'static {
    let mut subscription = subscription;
    let (_, placeholder_rx) = mpsc::channel(1);
    let receiver = std::mem::replace(&mut subscription.receiver, placeholder_rx);

    tokio_stream::once(StatsEvent::StatsUpdate { stats: initial })
        .chain(ReceiverStream::new(receiver))
        .map(move |event| {
            let _registered = &subscription;
            event
        })
}

fn render_event(event: &StatsEvent) -> sse::Event {
    let base = sse::Event::default().event(event.name());
    match serde_json::to_string(event.stats()) {
        Ok(json) => base.data(json),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize stats event");
            base.data("{}")
        }
    }
}
