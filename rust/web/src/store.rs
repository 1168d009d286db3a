//! Persistence of submitted game results.
//!
//! A [`ResultStore`] keeps every result it is given and can aggregate them into
//! [`Statistics`]. [`SqliteStore`] is the durable backend; [`MemoryStore`] is
//! used when no database path is configured and in tests.

use montyhall_engine::result::GameResult;
use montyhall_engine::stats::Statistics;
use rusqlite::{params, Connection};
use std::fmt;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

const BUSY_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database is busy: {0}")]
    Busy(rusqlite::Error),
    #[error("database error: {0}")]
    Database(rusqlite::Error),
    #[error("failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if sqlite_busy(&err) {
            StoreError::Busy(err)
        } else {
            StoreError::Database(err)
        }
    }
}

fn sqlite_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(info, _)
            if matches!(
                info.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
    )
}

/// Storage backend for game results.
pub trait ResultStore: fmt::Debug + Send + Sync {
    fn save(&self, result: &GameResult) -> Result<(), StoreError>;

    /// Aggregate every stored result.
    fn statistics(&self) -> Result<Statistics, StoreError>;

    /// Remove every stored result.
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    results: Mutex<Vec<GameResult>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultStore for MemoryStore {
    fn save(&self, result: &GameResult) -> Result<(), StoreError> {
        let mut results = self.results.lock().map_err(|_| StoreError::Poisoned)?;
        results.push(result.clone());
        Ok(())
    }

    fn statistics(&self) -> Result<Statistics, StoreError> {
        let results = self.results.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(Statistics::from_results(results.iter()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.results
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .clear();
        Ok(())
    }
}

/// Results in a single SQLite table, `game_results`.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS game_results (
                id TEXT NOT NULL,
                strategy TEXT NOT NULL CHECK (strategy IN ('stay', 'switch')),
                won INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                session_id TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ResultStore for SqliteStore {
    fn save(&self, result: &GameResult) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO game_results (id, strategy, won, timestamp, session_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &result.id,
                result.strategy.as_str(),
                result.won,
                result.timestamp.to_rfc3339(),
                &result.session_id
            ],
        )?;
        Ok(())
    }

    fn statistics(&self) -> Result<Statistics, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let stats = conn.query_row(
            "SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN strategy = 'stay' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN strategy = 'stay' AND won THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN strategy = 'switch' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN strategy = 'switch' AND won THEN 1 ELSE 0 END), 0)
             FROM game_results",
            [],
            |row| {
                Ok(Statistics {
                    total_games: count(row.get(0)?),
                    stay_total: count(row.get(1)?),
                    stay_wins: count(row.get(2)?),
                    switch_total: count(row.get(3)?),
                    switch_wins: count(row.get(4)?),
                })
            },
        )?;
        Ok(stats)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute("DELETE FROM game_results", [])?;
        Ok(())
    }
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
