use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".savings_core";
const CONFIG_FILE: &str = "config.json";
const SNAPSHOT_FILE: &str = "snapshot.json";

/// Environment variable that relocates the application data directory.
pub const HOME_ENV: &str = "SAVINGS_CORE_HOME";

/// Returns the application-specific data directory, defaulting to `~/.savings_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Default snapshot location used when the CLI is not given an explicit path.
pub fn default_snapshot_file() -> PathBuf {
    app_data_dir().join(SNAPSHOT_FILE)
}
