//! Shell settings resolved from the environment.

use memopad_core::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "MEMOPAD_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "MEMOPAD_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "MEMOPAD_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "memo.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "memopad-logs";
pub const DEFAULT_VISIBLE_ROWS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub visible_rows: usize,
}

impl ShellConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`; blank values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        Self {
            db_path: value(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: value(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: value(LOG_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME)),
            visible_rows: DEFAULT_VISIBLE_ROWS,
        }
    }
}
