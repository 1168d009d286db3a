use crate::errors::{ApiError, IntoErrorResponse};
use crate::live::LiveStats;
use chrono::Utc;
use montyhall_engine::game::Strategy;
use montyhall_engine::result::{GameResult, IdGenerator, UuidIds};
use montyhall_engine::stats::Statistics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::hyper::body::Bytes;
use warp::reply::{self, Response};
use warp::{Rejection, Reply};

const DEFAULT_SESSION: &str = "anonymous";

/// Body of `POST /api/game-result`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultPayload {
    pub strategy: Strategy,
    pub won: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl GameResultPayload {
    /// Parse a request body. `strategy` must be `"stay"` or `"switch"` and
    /// `won` a JSON boolean.
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidGameResult(e.to_string()))
    }

    /// Stamp the payload into a full record. Missing or blank ids are
    /// generated.
    pub fn into_result(self, ids: &mut dyn IdGenerator) -> GameResult {
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => ids.next_id(),
        };
        let session_id = match self.session_id {
            Some(s) if !s.trim().is_empty() => s,
            _ => DEFAULT_SESSION.to_string(),
        };
        GameResult {
            id,
            strategy: self.strategy,
            won: self.won,
            timestamp: Utc::now(),
            session_id,
        }
    }
}

#[derive(Serialize)]
struct StatsChanged {
    success: bool,
    stats: Statistics,
}

pub fn get_stats(live: Arc<LiveStats>) -> Response {
    reply::json(&live.current()).into_response()
}

pub async fn submit_game_result(live: Arc<LiveStats>, body: Bytes) -> Result<Response, Rejection> {
    let payload = match GameResultPayload::parse(&body) {
        Ok(p) => p,
        Err(e) => return Ok(e.into_http_response()),
    };
    let result = payload.into_result(&mut UuidIds);
    Ok(stats_changed(on_store_thread(move || live.submit(&result)).await))
}

pub async fn reset_stats(live: Arc<LiveStats>) -> Result<Response, Rejection> {
    Ok(stats_changed(on_store_thread(move || live.reset()).await))
}

/// Store writes can block on SQLite locks, so they leave the async workers.
async fn on_store_thread<F>(op: F) -> Result<Statistics, ApiError>
where
    F: FnOnce() -> Statistics + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))
}

fn stats_changed(outcome: Result<Statistics, ApiError>) -> Response {
    match outcome {
        Ok(stats) => reply::json(&StatsChanged {
            success: true,
            stats,
        })
        .into_response(),
        Err(e) => e.into_http_response(),
    }
}
