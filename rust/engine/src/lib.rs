//! # montyhall-engine: Monty Hall game core
//!
//! Plays single rounds of the three-door puzzle, keeps per-strategy win
//! statistics and runs bulk simulations that show both strategies converging
//! on their long-run rates. Randomness is always injected, so a seeded
//! generator replays the same rounds.
//!
//! ## Core Modules
//!
//! - [`door`] - Door identifiers and per-door state
//! - [`game`] - Round state machine, phases and strategies
//! - [`result`] - Persisted round outcomes and id generation
//! - [`stats`] - Win counters and whole-number percentages
//! - [`bulk`] - Bulk simulation with convergence samples
//! - [`engine`] - Facade owning the generator and id source
//! - [`rng`] - Seeded generator construction
//! - [`logger`] - JSON Lines result log
//! - [`errors`] - Error types for round operations
//!
//! ## Quick Start
//!
//! ```rust
//! use montyhall_engine::bulk::simulate_bulk;
//! use montyhall_engine::rng::rng_from_seed;
//!
//! let mut rng = rng_from_seed(42);
//! let report = simulate_bulk(1_000, &mut rng).unwrap();
//!
//! assert_eq!(report.stats.total_games, 2_000);
//! assert!(report.stats.switch_win_percentage() > report.stats.stay_win_percentage());
//! ```

pub mod bulk;
pub mod door;
pub mod engine;
pub mod errors;
pub mod game;
pub mod logger;
pub mod result;
pub mod rng;
pub mod stats;
