use analytics::AverageMode;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::storage::DEFAULT_QUOTA_BYTES;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub identity: IdentityConfig,
    pub dashboard: DashboardConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file; the platform data directory when unset
    pub path: Option<PathBuf>,
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct IdentityConfig {
    pub readiness_timeout_ms: u64,
    /// Simulated start-up latency of the local provider
    pub startup_delay_ms: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            readiness_timeout_ms: 3000,
            startup_delay_ms: 0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub seed_demo_data: bool,
    pub seed_days: u32,
    pub average_daily: AverageMode,
    pub recent_limit: usize,
    pub reminder_window_days: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
            seed_days: 7,
            average_daily: AverageMode::FixedWeek,
            recent_limit: 5,
            reminder_window_days: 7,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct NotificationsConfig {
    pub toast_duration_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: 3000,
        }
    }
}

const DEFAULT_CONFIG: &str = r#"
[storage]
# path = "/home/me/.local/share/edufinance/storage.sqlite"
quota_bytes = 5242880

[identity]
# How long pages wait for the identity provider before working offline
readiness_timeout_ms = 3000

[dashboard]
seed_demo_data = true
seed_days = 7
# "fixed-week" divides totals by 7, "range-days" by the days in the range
average_daily = "fixed-week"
recent_limit = 5
reminder_window_days = 7

[notifications]
toast_duration_ms = 3000
"#;

impl AppConfig {
    /// Load from `path`, or from the default location, creating a commented
    /// default file there on first run
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => get_config_path(),
        };

        if !config_path.exists() {
            write_default(&config_path)?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()).format(FileFormat::Toml))
            .build()?;

        let config: AppConfig = builder.try_deserialize()?;
        tracing::debug!("Loaded config from {:?}", config_path);

        Ok((config, config_path))
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(self.identity.readiness_timeout_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.notifications.toast_duration_ms)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Write the commented default config, creating parent directories
pub fn write_default(config_path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::Message(format!("Failed to create config directory: {e}"))
        })?;
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .map_err(|e| ConfigError::Message(format!("Failed to write default config: {e}")))?;
    tracing::info!("Wrote default config to {:?}", config_path);
    Ok(())
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("edufinance").join("config.toml")
    } else {
        PathBuf::from("edufinance.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let (config, used) = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(used, path);
        assert!(path.exists());
        assert_eq!(config.identity.readiness_timeout_ms, 3000);
        assert_eq!(config.dashboard.average_daily, AverageMode::FixedWeek);
        assert_eq!(config.storage.quota_bytes, DEFAULT_QUOTA_BYTES);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[dashboard]\naverage_daily = \"range-days\"\nseed_demo_data = false\n",
        )
        .unwrap();

        let (config, _) = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.dashboard.average_daily, AverageMode::RangeDays);
        assert!(!config.dashboard.seed_demo_data);
        assert_eq!(config.dashboard.seed_days, 7);
        assert_eq!(config.toast_duration(), Duration::from_millis(3000));
    }

    #[test]
    fn test_rendered_toml_parses_back() {
        let rendered = AppConfig::default().to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.dashboard.recent_limit, 5);
    }
}
