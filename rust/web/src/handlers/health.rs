use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::time::Instant;
use warp::reply::Json;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UptimeBody {
    uptime_ms: u128,
    start_time: String,
}

pub fn health() -> Json {
    warp::reply::json(&HealthBody {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub fn uptime(started_at: DateTime<Utc>, started: Instant) -> Json {
    warp::reply::json(&UptimeBody {
        uptime_ms: started.elapsed().as_millis(),
        start_time: started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::Filter;

    #[tokio::test]
    async fn health_reports_ok_with_timestamp() {
        let response = warp::test::request()
            .reply(&warp::any().map(health))
            .await;
        let v: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(v["status"], "ok");
        let ts = v["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[tokio::test]
    async fn uptime_counts_from_start() {
        let started_at = Utc::now();
        let started = Instant::now();
        let route = warp::any().map(move || uptime(started_at, started));
        let response = warp::test::request().reply(&route).await;
        let v: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert!(v["uptimeMs"].as_u64().is_some());
        assert!(v["startTime"].as_str().unwrap().ends_with('Z'));
    }
}
