//! # Play Command
//!
//! Interactive rounds of the three-door game read from stdin.
//!
//! The player types a door number (1-3) for the first pick. After the host
//! opens a door the player answers `stay`, `switch` or a door number, unless
//! `--strategy` answers for them. `q` quits at any prompt, and EOF counts as
//! quitting.

use crate::error::CliError;
use crate::formatters::{door_label, format_doors, format_outcome, format_stats_summary};
use crate::io_utils::{ensure_parent_dir, read_stdin_line};
use crate::ui;
use crate::validation::{ParseResult, parse_choice};
use montyhall_engine::door::DoorId;
use montyhall_engine::engine::Engine;
use montyhall_engine::game::{GameState, Strategy};
use montyhall_engine::logger::ResultLogger;
use montyhall_engine::stats::Statistics;
use std::io::{BufRead, Write};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub rounds: u32,
    pub seed: Option<u64>,
    /// Answer the final prompt automatically
    pub strategy: Option<Strategy>,
    /// JSONL file to append results to
    pub output: Option<String>,
    pub session: String,
}

/// Handle the play command.
///
/// # Errors
///
/// `CliError::InvalidInput` when `rounds` is zero, `CliError::Io` on stream
/// or result log failures.
pub fn handle_play_command(
    opts: PlayOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    if opts.rounds == 0 {
        ui::write_error(err, "rounds must be >= 1")?;
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }

    let mut engine = Engine::new(opts.seed);
    writeln!(
        out,
        "play: rounds={} seed={} session={}",
        opts.rounds,
        engine.seed(),
        opts.session
    )?;

    let mut logger = match opts.output.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            ensure_parent_dir(path).map_err(CliError::InvalidInput)?;
            Some(ResultLogger::create(path)?)
        }
        None => None,
    };

    let mut stats = Statistics::new();
    let mut played = 0u32;
    let mut quit_requested = false;

    for i in 1..=opts.rounds {
        writeln!(out)?;
        writeln!(out, "Round {}/{}", i, opts.rounds)?;
        let round = engine.new_round();
        writeln!(out, "Doors: {}", format_doors(&round))?;

        let Some(first) = prompt_initial(out, err, stdin)? else {
            quit_requested = true;
            break;
        };
        let revealed = engine.choose_initial(&round, first)?;
        if let Some(host) = revealed.host_revealed_door() {
            writeln!(out, "Host opens door {}: goat", door_label(host))?;
        }
        writeln!(out, "Doors: {}", format_doors(&revealed))?;

        let last = match opts.strategy {
            Some(strategy) => Some(auto_final(&revealed, first, strategy)?),
            None => prompt_final(&revealed, first, out, err, stdin)?,
        };
        let Some(last) = last else {
            quit_requested = true;
            break;
        };

        let done = engine.choose_final(&revealed, last)?;
        writeln!(out, "Doors: {}", format_doors(&done))?;
        writeln!(out, "{}", format_outcome(&done))?;

        let result = engine.result(&done, &opts.session)?;
        if let Some(logger) = logger.as_mut() {
            logger.write(&result)?;
        }
        stats.record(result.strategy, result.won);
        played += 1;
    }

    writeln!(out)?;
    if quit_requested {
        writeln!(out, "Session ended by user")?;
    }
    writeln!(out, "Played {} of {} rounds", played, opts.rounds)?;
    for line in format_stats_summary(&stats) {
        writeln!(out, "{}", line)?;
    }
    if let Some(path) = opts.output.as_deref()
        && played > 0
    {
        writeln!(out, "Results appended to {}", path)?;
    }
    Ok(())
}

fn auto_final(
    revealed: &GameState,
    first: DoorId,
    strategy: Strategy,
) -> Result<DoorId, CliError> {
    match strategy {
        Strategy::Stay => Ok(first),
        Strategy::Switch => revealed
            .switch_target()
            .ok_or_else(|| CliError::InvalidInput("no door left to switch to".to_string())),
    }
}

/// `None` when the player quits or input ends.
fn prompt_initial(
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<Option<DoorId>, CliError> {
    loop {
        ui::prompt(out, "Pick a door (1-3, q to quit): ")?;
        let Some(line) = read_stdin_line(stdin) else {
            return Ok(None);
        };
        match parse_choice(&line) {
            ParseResult::Door(id) => return Ok(Some(id)),
            ParseResult::Quit => return Ok(None),
            ParseResult::Stay | ParseResult::Switch => {
                ui::write_error(err, "Pick a door number first")?;
            }
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }
}

fn prompt_final(
    revealed: &GameState,
    first: DoorId,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<Option<DoorId>, CliError> {
    let question = match revealed.switch_target() {
        Some(other) => format!(
            "Stay with door {} or switch to door {}? (stay/switch/1-3, q to quit): ",
            door_label(first),
            door_label(other)
        ),
        None => "Final choice (1-3, q to quit): ".to_string(),
    };
    loop {
        ui::prompt(out, &question)?;
        let Some(line) = read_stdin_line(stdin) else {
            return Ok(None);
        };
        match parse_choice(&line) {
            ParseResult::Door(id) => {
                if revealed.door(id).is_open {
                    ui::display_warning(err, "that door is already open")?;
                }
                return Ok(Some(id));
            }
            ParseResult::Stay => return Ok(Some(first)),
            ParseResult::Switch => return auto_final(revealed, first, Strategy::Switch).map(Some),
            ParseResult::Quit => return Ok(None),
            ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn opts(rounds: u32, strategy: Option<Strategy>) -> PlayOptions {
        PlayOptions {
            rounds,
            seed: Some(42),
            strategy,
            output: None,
            session: "test".into(),
        }
    }

    #[test]
    fn zero_rounds_is_an_error() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(b"".to_vec());
        let res = handle_play_command(opts(0, None), &mut out, &mut err, &mut stdin);
        assert!(matches!(res, Err(CliError::InvalidInput(_))));
        assert!(String::from_utf8(err).unwrap().contains("rounds must be >= 1"));
    }

    #[test]
    fn quit_at_first_prompt_ends_session() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(b"q\n".to_vec());
        handle_play_command(opts(3, None), &mut out, &mut err, &mut stdin).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Session ended by user"));
        assert!(text.contains("Played 0 of 3 rounds"));
    }

    #[test]
    fn invalid_input_is_reprompted() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(b"7\nstay\n2\nstay\n".to_vec());
        handle_play_command(opts(1, None), &mut out, &mut err, &mut stdin).unwrap();
        let errors = String::from_utf8(err).unwrap();
        assert!(errors.contains("Door must be 1, 2 or 3"));
        assert!(errors.contains("Pick a door number first"));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Played 1 of 1 rounds"));
        assert!(text.contains("(stay)"));
    }

    #[test]
    fn automatic_switch_needs_only_first_picks() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(b"1\n2\n3\n".to_vec());
        handle_play_command(
            opts(3, Some(Strategy::Switch)),
            &mut out,
            &mut err,
            &mut stdin,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("(switch)").count(), 3);
        assert!(text.contains("Switch: "));
        assert!(text.contains("/3 ("));
    }
}
