use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::session::{SessionConfig, QUESTIONS_PER_SESSION, REVEAL_DELAY_MS, ROUND_SECONDS};

/// Where cumulative progress is kept.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub round_secs: u32,
    pub questions_per_session: usize,
    pub reveal_delay_ms: u64,
    pub sound: bool,
    pub store: StoreKind,
    pub bank: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_secs: ROUND_SECONDS,
            questions_per_session: QUESTIONS_PER_SESSION,
            reveal_delay_ms: REVEAL_DELAY_MS,
            sound: true,
            store: StoreKind::Sqlite,
            bank: None,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            round_secs: self.round_secs,
            questions_per_session: self.questions_per_session,
            reveal_delay: Duration::from_millis(self.reveal_delay_ms),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path()
            .unwrap_or_else(|| PathBuf::from("quizbattle_config.json"));
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

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!("ignoring malformed config {}: {}", self.path.display(), e)
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            round_secs: 20,
            questions_per_session: 8,
            reveal_delay_ms: 500,
            sound: false,
            store: StoreKind::Json,
            bank: Some(PathBuf::from("/tmp/bank.json")),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"round_secs": 30, "store": "json"}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.round_secs, 30);
        assert_eq!(cfg.store, StoreKind::Json);
        assert_eq!(cfg.questions_per_session, QUESTIONS_PER_SESSION);
        assert!(cfg.sound);
    }

    #[test]
    fn malformed_config_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "round_secs = 30").unwrap();

        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn session_config_conversion() {
        let cfg = Config {
            reveal_delay_ms: 750,
            ..Config::default()
        };
        let session = cfg.session_config();
        assert_eq!(session.round_secs, ROUND_SECONDS);
        assert_eq!(session.reveal_delay, Duration::from_millis(750));
    }

    #[test]
    fn store_kind_names() {
        assert_eq!(StoreKind::Sqlite.to_string(), "sqlite");
        assert_eq!(StoreKind::Json.to_string(), "json");
    }
}
