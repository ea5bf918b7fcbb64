use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    core::utils::{app_data_dir, config_file_in},
    ledger::{TrailingWindow, DEFAULT_WINDOW_MONTHS, WINDOW_DAYS_PER_MONTH},
    utils::persistence::write_atomically,
    wishlist::ETA_DAYS_PER_MONTH,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables for forecasting. Defaults reproduce the documented policies:
/// a three month window of 31-day months, and 30-day months for ETAs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "ForecastConfig::default_window_months")]
    pub window_months: u32,
    #[serde(default = "ForecastConfig::default_window_days_per_month")]
    pub window_days_per_month: u32,
    #[serde(default = "ForecastConfig::default_eta_days_per_month")]
    pub eta_days_per_month: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_months: Self::default_window_months(),
            window_days_per_month: Self::default_window_days_per_month(),
            eta_days_per_month: Self::default_eta_days_per_month(),
        }
    }
}

impl ForecastConfig {
    pub fn default_window_months() -> u32 {
        DEFAULT_WINDOW_MONTHS
    }

    pub fn default_window_days_per_month() -> u32 {
        WINDOW_DAYS_PER_MONTH
    }

    pub fn default_eta_days_per_month() -> u32 {
        ETA_DAYS_PER_MONTH
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_months == 0 {
            return Err(ConfigError::Invalid("window_months must be at least 1".into()));
        }
        if self.window_days_per_month == 0 || self.eta_days_per_month == 0 {
            return Err(ConfigError::Invalid(
                "days per month must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> TrailingWindow {
        TrailingWindow {
            months: self.window_months,
            days_per_month: self.window_days_per_month,
        }
    }
}

/// Loads and persists [`ForecastConfig`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at the application data directory.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Returns defaults when no file exists yet.
    pub fn load(&self) -> Result<ForecastConfig, ConfigError> {
        let config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)?
        } else {
            ForecastConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &ForecastConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomically(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_documented_policies() {
        let config = ForecastConfig::default();
        assert_eq!(config.window_months, 3);
        assert_eq!(config.window_days_per_month, 31);
        assert_eq!(config.eta_days_per_month, 30);
    }

    #[test]
    fn load_returns_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), ForecastConfig::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = ForecastConfig {
            window_months: 6,
            ..ForecastConfig::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap().window_months, 6);
        assert!(!crate::utils::persistence::tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"window_months": 12}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.window_months, 12);
        assert_eq!(config.eta_days_per_month, 30);
    }

    #[test]
    fn files_with_retired_keys_still_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"window_months": 4, "locale": "en-US"}"#).unwrap();
        assert_eq!(manager.load().unwrap().window_months, 4);
    }

    #[test]
    fn zero_window_is_rejected() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"window_months": 0}"#).unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Invalid(_))));
    }
}
