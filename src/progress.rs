use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::rewards::{RewardId, SessionOutcome, Verdict};

/// Stats that survive between sessions. Every field only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CumulativeProgress {
    pub best_streak: u32,
    pub games_played: u32,
    pub wins: u32,
    unlocked: BTreeSet<RewardId>,
}

impl CumulativeProgress {
    pub fn unlocked_rewards(&self) -> &BTreeSet<RewardId> {
        &self.unlocked
    }

    pub fn is_unlocked(&self, reward: RewardId) -> bool {
        self.unlocked.contains(&reward)
    }

    /// Returns true if the reward was newly unlocked.
    pub fn unlock(&mut self, reward: RewardId) -> bool {
        self.unlocked.insert(reward)
    }

    pub fn record_session(&mut self, outcome: &SessionOutcome) {
        self.games_played += 1;
        if outcome.won() {
            self.wins += 1;
        }
        self.best_streak = self.best_streak.max(outcome.best_streak);
    }
}

/// Persisted shape of [`CumulativeProgress`]; reward flags are positional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    pub best_streak: u32,
    pub total_games_played: u32,
    pub wins: u32,
    pub rewards: Vec<bool>,
}

impl From<&CumulativeProgress> for ProgressRecord {
    fn from(p: &CumulativeProgress) -> Self {
        Self {
            best_streak: p.best_streak,
            total_games_played: p.games_played,
            wins: p.wins,
            rewards: RewardId::ALL.iter().map(|r| p.is_unlocked(*r)).collect(),
        }
    }
}

impl From<ProgressRecord> for CumulativeProgress {
    fn from(r: ProgressRecord) -> Self {
        let unlocked = RewardId::ALL
            .into_iter()
            .filter(|id| r.rewards.get(id.index()).copied().unwrap_or(false))
            .collect();

        Self {
            best_streak: r.best_streak,
            games_played: r.total_games_played,
            wins: r.wins,
            unlocked,
        }
    }
}

pub fn encode(progress: &CumulativeProgress) -> Result<String, ProgressError> {
    Ok(serde_json::to_string(&ProgressRecord::from(progress))?)
}

/// Malformed records decode to `None`, the same as a missing one.
pub fn decode(raw: &str) -> Option<CumulativeProgress> {
    match serde_json::from_str::<ProgressRecord>(raw) {
        Ok(record) => Some(record.into()),
        Err(e) => {
            tracing::warn!("ignoring malformed progress record: {}", e);
            None
        }
    }
}

/// One completed session, kept for the leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub played_at: DateTime<Local>,
    pub player_score: u32,
    pub opponent_score: u32,
    pub best_streak: u32,
    pub questions: u32,
}

impl SessionRecord {
    pub fn new(outcome: &SessionOutcome, played_at: DateTime<Local>) -> Self {
        Self {
            played_at,
            player_score: outcome.player_score,
            opponent_score: outcome.opponent_score,
            best_streak: outcome.best_streak,
            questions: outcome.questions_played as u32,
        }
    }

    pub fn verdict(&self) -> Verdict {
        SessionOutcome {
            player_score: self.player_score,
            opponent_score: self.opponent_score,
            ..Default::default()
        }
        .verdict()
    }
}

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// Key-value persistence for progress. Implementations should report a
/// malformed record as `Ok(None)`.
pub trait ProgressStore {
    fn load(&self) -> Result<Option<CumulativeProgress>, ProgressError>;
    fn save(&self, progress: &CumulativeProgress) -> Result<(), ProgressError>;

    fn record_session(&self, _record: &SessionRecord) -> Result<(), ProgressError> {
        Ok(())
    }

    /// Best sessions first.
    fn top_sessions(&self, _limit: usize) -> Result<Vec<SessionRecord>, ProgressError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::progress_json_path()
            .unwrap_or_else(|| PathBuf::from("quizbattle_progress.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self) -> Result<Option<CumulativeProgress>, ProgressError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(decode(&raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, progress: &CumulativeProgress) -> Result<(), ProgressError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, encode(progress)?)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    raw: Option<String>,
    history: Vec<SessionRecord>,
    offline: bool,
    saves: usize,
}

/// In-memory store; clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw stored record, as another process may have left it.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.lock() {
            inner.raw = Some(raw.into());
        }
        store
    }

    /// A store whose every operation fails.
    pub fn offline() -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.lock() {
            inner.offline = true;
        }
        store
    }

    pub fn raw(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|i| i.raw.clone())
    }

    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|i| i.saves).unwrap_or_default()
    }

    fn with_inner<T>(
        &self,
        f: impl FnOnce(&mut MemoryInner) -> Result<T, ProgressError>,
    ) -> Result<T, ProgressError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ProgressError::Unavailable("memory store poisoned".to_string()))?;
        if inner.offline {
            return Err(ProgressError::Unavailable("store is offline".to_string()));
        }
        f(&mut inner)
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Result<Option<CumulativeProgress>, ProgressError> {
        self.with_inner(|i| Ok(i.raw.as_deref().and_then(decode)))
    }

    fn save(&self, progress: &CumulativeProgress) -> Result<(), ProgressError> {
        let raw = encode(progress)?;
        self.with_inner(|i| {
            i.raw = Some(raw);
            i.saves += 1;
            Ok(())
        })
    }

    fn record_session(&self, record: &SessionRecord) -> Result<(), ProgressError> {
        self.with_inner(|i| {
            i.history.push(record.clone());
            Ok(())
        })
    }

    fn top_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, ProgressError> {
        self.with_inner(|i| {
            Ok(i
                .history
                .iter()
                .sorted_by(|a, b| {
                    b.player_score
                        .cmp(&a.player_score)
                        .then(a.opponent_score.cmp(&b.opponent_score))
                        .then(b.played_at.cmp(&a.played_at))
                })
                .take(limit)
                .cloned()
                .collect())
        })
    }
}
