//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use montyhall_engine::game::Strategy;

#[derive(Parser, Debug)]
#[command(
    name = "montyhall",
    version,
    about = "Monty Hall game and simulator",
    long_about = None
)]
pub struct MontyHallCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play rounds interactively
    Play {
        #[arg(long)]
        rounds: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Answer the final choice automatically
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
        /// Append results to this JSONL file
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        session: Option<String>,
    },
    /// Run a bulk simulation of both strategies
    Sim {
        #[arg(long)]
        games: Option<u64>,
        #[arg(long)]
        seed: Option<u64>,
        /// Write the convergence series to this JSON file
        #[arg(long)]
        convergence: Option<String>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Aggregate JSONL result logs
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show resolved configuration
    Cfg,
    /// Print sample door draws
    Rng {
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Final-choice policy for `play --strategy`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Stay,
    Switch,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Stay => Strategy::Stay,
            StrategyArg::Switch => Strategy::Switch,
        }
    }
}
