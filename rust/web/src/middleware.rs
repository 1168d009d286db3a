use std::time::Instant;
use warp::http::{Method, StatusCode};
use warp::path::FullPath;
use warp::reject::Rejection;
use warp::reply::{Reply, Response};
use warp::Filter;

#[derive(Debug, Clone)]
struct RequestInfo {
    start: Instant,
    path: String,
    method: Method,
}

/// Wrap `filter` so every reply it produces is logged with its status and
/// duration.
pub fn with_request_logging<F, T>(
    filter: F,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone
where
    F: Filter<Extract = (T,), Error = Rejection> + Clone + Send + Sync + 'static,
    T: Reply,
{
    warp::any()
        .and(warp::path::full())
        .and(warp::method())
        .map(|path: FullPath, method: Method| {
            tracing::debug!(path = %path.as_str(), method = %method, "incoming request");
            RequestInfo {
                start: Instant::now(),
                path: path.as_str().to_string(),
                method,
            }
        })
        .and(filter)
        .map(|info: RequestInfo, reply: T| {
            let response = reply.into_response();
            log_response(
                response.status(),
                &info.path,
                info.method.as_str(),
                info.start.elapsed().as_millis(),
            );
            response
        })
}

/// Log a finished request at a level chosen from its status.
pub fn log_response(status: StatusCode, path: &str, method: &str, duration_ms: u128) {
    if status.is_server_error() {
        tracing::error!(
            status = status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            status = status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "client error"
        );
    } else {
        tracing::info!(
            status = status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "response sent"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::TestLogSubscriber;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    fn capture() -> (TestLogSubscriber, tracing::subscriber::DefaultGuard) {
        let subscriber = TestLogSubscriber::new();
        let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());
        let guard = tracing::subscriber::set_default(registry);
        (subscriber, guard)
    }

    #[tokio::test]
    async fn logs_status_path_and_method() {
        let (logs, _guard) = capture();

        let route = warp::path!("api" / "stats")
            .and(warp::get())
            .map(|| warp::reply::json(&"ok"));

        let response = warp::test::request()
            .method("GET")
            .path("/api/stats")
            .reply(&with_request_logging(route))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let entry = logs
            .entries()
            .into_iter()
            .find(|e| e.message.contains("response sent"))
            .expect("completion logged");
        assert_eq!(entry.level, Level::INFO);
        assert_eq!(entry.field("status"), Some("200"));
        assert_eq!(entry.field("path"), Some("/api/stats"));
        assert_eq!(entry.field("method"), Some("GET"));
    }

    #[test]
    fn client_errors_warn() {
        let (logs, _guard) = capture();
        log_response(StatusCode::BAD_REQUEST, "/api/game-result", "POST", 3);
        assert!(logs.contains(Level::WARN, "client error"));
    }

    #[test]
    fn server_errors_are_errors() {
        let (logs, _guard) = capture();
        log_response(StatusCode::INTERNAL_SERVER_ERROR, "/api/stats", "GET", 9);
        assert!(logs.contains(Level::ERROR, "server error"));
    }
}
