use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/quizbattle`, or the platform data dir without `$HOME`.
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("quizbattle"),
            )
        } else {
            ProjectDirs::from("", "", "quizbattle")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("progress.db"))
    }

    pub fn progress_json_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("progress.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("quizbattle.log"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "quizbattle").map(|pd| pd.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_files_share_a_directory() {
        let (Some(db), Some(json), Some(log)) = (
            AppDirs::db_path(),
            AppDirs::progress_json_path(),
            AppDirs::log_path(),
        ) else {
            return;
        };

        assert_eq!(db.parent(), json.parent());
        assert_eq!(db.parent(), log.parent());
        assert!(db.ends_with("quizbattle/progress.db"));
    }
}
