//! JSON Lines log of finished rounds.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::result::GameResult;

/// Appends one [`GameResult`] per line to a file.
pub struct ResultLogger {
    writer: BufWriter<File>,
    written: u64,
}

impl ResultLogger {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
            written: 0,
        })
    }

    pub fn write(&mut self, result: &GameResult) -> std::io::Result<()> {
        let line = serde_json::to_string(result).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Results written through this logger, not counting earlier file content.
    pub fn written(&self) -> u64 {
        self.written
    }
}

/// Parsed contents of a results log.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResultLog {
    pub results: Vec<GameResult>,
    /// Non-blank lines that did not parse as a result
    pub skipped: usize,
}

/// Parse JSONL text. Blank lines are ignored, bad lines are counted.
pub fn read_results(content: &str) -> ResultLog {
    let mut log = ResultLog::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<GameResult>(line) {
            Ok(r) => log.results.push(r),
            Err(_) => log.skipped += 1,
        }
    }
    log
}
