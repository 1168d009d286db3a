//! Command handler modules for the montyhall CLI.
//!
//! Each command lives in its own file and exposes
//! `handle_COMMAND_command(...) -> Result<(), CliError>`, taking its output
//! streams (and stdin, for `play`) as parameters.

pub mod cfg;
pub mod play;
pub mod rng;
pub mod sim;
pub mod stats;

pub use cfg::handle_cfg_command;
pub use play::{PlayOptions, handle_play_command};
pub use rng::handle_rng_command;
pub use sim::{SimOptions, handle_sim_command};
pub use stats::handle_stats_command;
