//! Statistics aggregation over JSONL result logs.
//!
//! Accepts a single file or a directory, which is searched recursively for
//! `.jsonl` and `.jsonl.zst` files. Lines that do not parse are reported and
//! skipped.

use crate::error::CliError;
use crate::io_utils::{collect_result_logs, read_text_auto};
use crate::ui;
use montyhall_engine::logger::read_results;
use montyhall_engine::stats::Statistics;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(&input);
    let files: Vec<PathBuf> = if path.is_dir() {
        collect_result_logs(path)
    } else if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        let msg = format!("Input not found: {}", input);
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    };

    let mut results = Vec::new();
    let mut skipped = 0usize;
    for file in &files {
        let content = match read_text_auto(file) {
            Ok(c) => c,
            Err(e) => {
                ui::write_error(err, &format!("Failed to read {}: {}", file.display(), e))?;
                continue;
            }
        };
        let log = read_results(&content);
        if log.skipped > 0 {
            ui::display_warning(
                err,
                &format!("{}: skipped {} corrupted line(s)", file.display(), log.skipped),
            )?;
        }
        skipped += log.skipped;
        results.extend(log.results);
    }
    let stats = Statistics::from_results(&results);

    let summary = serde_json::json!({
        "stats": stats,
        "stayWinPercentage": stats.stay_win_percentage(),
        "switchWinPercentage": stats.switch_win_percentage(),
        "files": files.len(),
        "skipped": skipped,
    });
    let json = serde_json::to_string_pretty(&summary).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json)?;
    Ok(())
}
