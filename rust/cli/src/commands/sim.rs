//! Bulk simulation command.
//!
//! Runs the engine's bulk driver and reports how close each strategy came to
//! its theoretical win rate.
//!
//! ```no_run
//! use montyhall_cli::commands::{handle_sim_command, SimOptions};
//! use std::io;
//!
//! let opts = SimOptions { games: 10_000, seed: Some(42), convergence: None, json: false };
//! handle_sim_command(opts, &mut io::stdout(), &mut io::stderr()).unwrap();
//! ```

use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::ui;
use crate::validation::validate_count;
use montyhall_engine::bulk::{BulkReport, THEORETICAL_STAY, THEORETICAL_SWITCH, raw_percentage};
use montyhall_engine::engine::Engine;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SimOptions {
    pub games: u64,
    pub seed: Option<u64>,
    /// Write the convergence series here as JSON
    pub convergence: Option<String>,
    /// Print the whole report as JSON instead of text
    pub json: bool,
}

pub fn handle_sim_command(
    opts: SimOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let games = match validate_count("games", opts.games) {
        Ok(n) => n,
        Err(msg) => {
            ui::write_error(err, &msg)?;
            return Err(CliError::InvalidInput(msg));
        }
    };

    let mut engine = Engine::new(opts.seed);
    let report = engine.simulate(games)?;

    if let Some(path) = opts.convergence.as_deref() {
        write_convergence(Path::new(path), &report)?;
    }

    if opts.json {
        let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?;
        writeln!(out, "{}", json)?;
        return Ok(());
    }

    let s = &report.stats;
    let stay = raw_percentage(s.stay_wins, s.stay_total);
    let switch = raw_percentage(s.switch_wins, s.switch_total);
    writeln!(out, "sim: games={} seed={}", games, engine.seed())?;
    writeln!(out, "Total games: {}", s.total_games)?;
    writeln!(
        out,
        "Stay:   {}/{} ({}%) theoretical {:.2}% gap {:+.2}",
        s.stay_wins,
        s.stay_total,
        s.stay_win_percentage(),
        THEORETICAL_STAY,
        stay - THEORETICAL_STAY
    )?;
    writeln!(
        out,
        "Switch: {}/{} ({}%) theoretical {:.2}% gap {:+.2}",
        s.switch_wins,
        s.switch_total,
        s.switch_win_percentage(),
        THEORETICAL_SWITCH,
        switch - THEORETICAL_SWITCH
    )?;
    writeln!(out, "Duration: {:.2} ms", report.duration_ms)?;
    if let Some(path) = opts.convergence.as_deref() {
        writeln!(
            out,
            "Convergence: {} points written to {}",
            report.convergence.len(),
            path
        )?;
    }
    Ok(())
}

fn write_convergence(path: &Path, report: &BulkReport) -> Result<(), CliError> {
    ensure_parent_dir(path).map_err(CliError::InvalidInput)?;
    let json = serde_json::to_string_pretty(&report.convergence).map_err(std::io::Error::other)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(games: u64) -> SimOptions {
        SimOptions {
            games,
            seed: Some(42),
            convergence: None,
            json: false,
        }
    }

    #[test]
    fn zero_games_rejected() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let res = handle_sim_command(opts(0), &mut out, &mut err);
        assert!(matches!(res, Err(CliError::InvalidInput(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn text_report_lists_both_strategies() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        handle_sim_command(opts(200), &mut out, &mut err).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total games: 400"));
        assert!(text.contains("theoretical 33.33%"));
        assert!(text.contains("theoretical 66.67%"));
        assert!(text.contains("Duration:"));
    }

    #[test]
    fn seeded_reports_match() {
        let run = || {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let mut o = opts(300);
            o.json = true;
            handle_sim_command(o, &mut out, &mut err).unwrap();
            let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
            v["stats"].clone()
        };
        assert_eq!(run(), run());
    }
}
