use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::progress::{
    decode, encode, CumulativeProgress, ProgressError, ProgressStore, SessionRecord,
};

/// Key under which the progress record is stored.
pub const PROGRESS_KEY: &str = "quizProgress";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE TABLE IF NOT EXISTS session_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        played_at TEXT NOT NULL,
        player_score INTEGER NOT NULL,
        opponent_score INTEGER NOT NULL,
        best_streak INTEGER NOT NULL,
        questions INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_session_history_score
        ON session_history(player_score);
"#;

/// SQLite-backed progress store with session history for the leaderboard
#[derive(Debug)]
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    /// Open the database under the state directory, creating tables if needed
    pub fn new() -> Result<Self, ProgressError> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("quizbattle.db"));
        Self::open(db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ProgressError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, ProgressError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, ProgressError> {
        conn.execute_batch(SCHEMA)?;
        Ok(StatsDb { conn })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, ProgressError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    pub fn session_count(&self) -> Result<i64, ProgressError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM session_history", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Clear progress and history (for testing or reset purposes)
    pub fn clear_all(&self) -> Result<(), ProgressError> {
        self.conn
            .execute_batch("DELETE FROM kv; DELETE FROM session_history;")?;
        Ok(())
    }
}

impl ProgressStore for StatsDb {
    fn load(&self) -> Result<Option<CumulativeProgress>, ProgressError> {
        Ok(self.get(PROGRESS_KEY)?.as_deref().and_then(decode))
    }

    fn save(&self, progress: &CumulativeProgress) -> Result<(), ProgressError> {
        self.set(PROGRESS_KEY, &encode(progress)?)
    }

    fn record_session(&self, record: &SessionRecord) -> Result<(), ProgressError> {
        self.conn.execute(
            r#"
            INSERT INTO session_history
            (played_at, player_score, opponent_score, best_streak, questions)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.played_at.to_rfc3339(),
                record.player_score,
                record.opponent_score,
                record.best_streak,
                record.questions,
            ],
        )?;
        Ok(())
    }

    fn top_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, ProgressError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT played_at, player_score, opponent_score, best_streak, questions
            FROM session_history
            ORDER BY player_score DESC, opponent_score ASC, played_at DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let played_at: String = row.get(0)?;
            let played_at = DateTime::parse_from_rfc3339(&played_at)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        0,
                        "played_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(SessionRecord {
                played_at,
                player_score: row.get(1)?,
                opponent_score: row.get(2)?,
                best_streak: row.get(3)?,
                questions: row.get(4)?,
            })
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }
}
