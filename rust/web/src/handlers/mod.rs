pub mod health;
pub mod sse;
pub mod stats;

pub use health::{health, uptime};
pub use sse::stream_stats;
pub use stats::{get_stats, reset_stats, submit_game_result, GameResultPayload};
