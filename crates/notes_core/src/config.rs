//! Storage location configuration.
//!
//! # Responsibility
//! - Decide which directory holds the notes index and which holds logs.
//!
//! # Invariants
//! - Resolution never fails; the system temp directory is the last fallback.
//! - Data dir precedence: explicit path, `NOTES_MANAGER_DIR`, documents dir,
//!   home dir, temp dir.
//! - Logs default to the platform local data dir, outside the data dir.

use crate::store::INDEX_FILE_NAME;
use std::path::{Path, PathBuf};

/// Environment variable overriding the storage directory.
pub const DATA_DIR_ENV: &str = "NOTES_MANAGER_DIR";

const APP_DIR_NAME: &str = "NotesManager";
const LOG_DIR_NAME: &str = "logs";

/// Resolved on-disk layout for one notes installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl StoreConfig {
    /// Uses `data_dir` as-is, with the platform default log directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_dir: default_log_dir(),
        }
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Resolves the storage directory from `explicit`, the environment, or
    /// platform defaults.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        resolve_with(explicit, std::env::var(DATA_DIR_ENV).ok())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(INDEX_FILE_NAME)
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// `<local data dir>/NotesManager/logs`, falling back to the cache dir, then
/// the temp dir.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join(LOG_DIR_NAME)
}

fn resolve_with(explicit: Option<PathBuf>, env_value: Option<String>) -> StoreConfig {
    if let Some(path) = explicit.filter(|path| !path.as_os_str().is_empty()) {
        return StoreConfig::new(path);
    }
    if let Some(raw) = env_value {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return StoreConfig::new(trimmed);
        }
    }
    let base = dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(std::env::temp_dir);
    StoreConfig::new(base.join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::{default_log_dir, resolve_with, StoreConfig, APP_DIR_NAME};
    use std::path::PathBuf;

    #[test]
    fn explicit_path_wins_over_environment() {
        let config = resolve_with(
            Some(PathBuf::from("/data/explicit")),
            Some("/data/from-env".to_string()),
        );
        assert_eq!(config.data_dir(), PathBuf::from("/data/explicit"));
    }

    #[test]
    fn environment_is_trimmed_and_used_when_no_explicit_path() {
        let config = resolve_with(None, Some("  /data/from-env  ".to_string()));
        assert_eq!(config.data_dir(), PathBuf::from("/data/from-env"));
    }

    #[test]
    fn blank_environment_falls_back_to_platform_default() {
        let config = resolve_with(None, Some("   ".to_string()));
        assert!(config.data_dir().ends_with(APP_DIR_NAME));
    }

    #[test]
    fn index_lives_in_data_dir_and_logs_live_elsewhere() {
        let config = StoreConfig::new("/data/notes");
        assert_eq!(
            config.index_path(),
            PathBuf::from("/data/notes/notes_index.json")
        );
        assert_eq!(config.log_dir(), default_log_dir());
        assert!(!config.log_dir().starts_with(config.data_dir()));
        assert!(config
            .log_dir()
            .ends_with(PathBuf::from(APP_DIR_NAME).join("logs")));
    }

    #[test]
    fn log_dir_can_be_overridden() {
        let config = StoreConfig::new("/data/notes").with_log_dir("/var/log/notes");
        assert_eq!(config.log_dir(), PathBuf::from("/var/log/notes"));
        assert_eq!(config.data_dir(), PathBuf::from("/data/notes"));
    }
}
