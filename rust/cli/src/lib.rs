//! # montyhall CLI Library
//!
//! Command-line front end for the Monty Hall engine: interactive play, bulk
//! simulation, aggregation of result logs and configuration inspection.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments, dispatches to a subcommand handler and returns
//! the process exit code.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["montyhall", "sim", "--games", "10000"];
//! let code = montyhall_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play rounds interactively, optionally logging results
//! - `sim`: Simulate many rounds and compare against theory
//! - `stats`: Aggregate statistics from JSONL result logs
//! - `cfg`: Display current configuration settings
//! - `rng`: Print sample draws from the seeded generator

use clap::Parser;
use std::io::Write;
#[macro_use]
mod macros;
pub mod cli;
pub mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{Commands, MontyHallCli};
use commands::{
    PlayOptions, SimOptions, handle_cfg_command, handle_play_command, handle_rng_command,
    handle_sim_command, handle_stats_command,
};

pub use error::CliError;

const COMMANDS: &[&str] = &["play", "sim", "stats", "cfg", "rng"];

/// Main entry point for the CLI application.
///
/// Returns `0` on success and `2` on any error. Help and version output go to
/// `out` and also return `0`.
///
/// ```
/// use std::io;
/// let args = vec!["montyhall", "rng", "--seed", "42"];
/// let code = montyhall_cli::run(args, &mut io::sink(), &mut io::sink());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match MontyHallCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    write_or_exit!(err, "{}", e);
                    write_or_exit!(err, "Monty Hall CLI");
                    write_or_exit!(err, "Usage: montyhall <command> [options]\n");
                    write_or_exit!(err, "Commands:");
                    for c in COMMANDS {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: montyhall --help");
                    exit_code::ERROR
                }
            };
        }
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Rng { seed } => handle_rng_command(seed, out),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Sim {
            games,
            seed,
            convergence,
            json,
        } => config::load()
            .map_err(CliError::from)
            .and_then(|cfg| {
                let opts = SimOptions {
                    games: games.unwrap_or(cfg.games),
                    seed: seed.or(cfg.seed),
                    convergence,
                    json,
                };
                handle_sim_command(opts, out, err)
            }),
        Commands::Play {
            rounds,
            seed,
            strategy,
            output,
            session,
        } => config::load()
            .map_err(CliError::from)
            .and_then(|cfg| {
                let opts = PlayOptions {
                    rounds: rounds.unwrap_or(1),
                    seed: seed.or(cfg.seed),
                    strategy: strategy.map(Into::into),
                    output,
                    session: session.unwrap_or(cfg.session),
                };
                let stdin = std::io::stdin();
                let mut stdin_lock = stdin.lock();
                handle_play_command(opts, out, err, &mut stdin_lock)
            }),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_command_parses() {
        let commands = vec![
            vec!["montyhall", "cfg"],
            vec!["montyhall", "play", "--rounds", "2", "--strategy", "switch"],
            vec!["montyhall", "sim", "--games", "10", "--json"],
            vec!["montyhall", "stats", "--input", "results.jsonl"],
            vec!["montyhall", "rng", "--seed", "1"],
        ];
        assert_eq!(commands.len(), COMMANDS.len());
        for args in commands {
            assert!(
                MontyHallCli::try_parse_from(&args).is_ok(),
                "Failed to parse: {:?}",
                args
            );
        }
    }

    #[test]
    fn unknown_strategy_rejected_by_clap() {
        let res = MontyHallCli::try_parse_from(["montyhall", "play", "--strategy", "maybe"]);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_command_prints_usage() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(["montyhall", "deal"], &mut out, &mut err);
        assert_eq!(code, exit_code::ERROR);
        let text = String::from_utf8(err).unwrap();
        for c in COMMANDS {
            assert!(text.contains(c));
        }
    }
}
