//! Application configuration.
//!
//! Read once at startup from a JSON file. Every key is optional; missing
//! keys take the defaults below.

use crate::error::{SessionError, SessionResult};
use crate::locale::Locale;
use crate::monitor::MonitorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "SESSIONWATCH_CONFIG";

/// Default server port.
pub const DEFAULT_PORT: u16 = 13235;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Total idle budget before forced logout.
    pub timeout_ms: u64,
    /// Lead time before the timeout at which the warning fires.
    pub warning_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 600_000,
            warning_ms: 120_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub default_duration_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            default_duration_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionSettings,
    pub notifications: NotificationSettings,
    pub server: ServerSettings,
    pub locale: Locale,
}

impl AppConfig {
    /// Default config file location: `<config dir>/sessionwatch/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sessionwatch")
            .join("config.json")
    }

    /// Loads from `$SESSIONWATCH_CONFIG` or the default path.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load() -> SessionResult<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);

        if !path.exists() {
            tracing::info!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> SessionResult<Self> {
        tracing::info!(path = ?path, "Loading config");
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> SessionResult<Self> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SessionResult<()> {
        self.monitor_config()?;
        if self.server.port == 0 {
            return Err(SessionError::Config("server.port must not be 0".to_string()));
        }
        Ok(())
    }

    /// Validated timing for the inactivity monitor.
    pub fn monitor_config(&self) -> SessionResult<MonitorConfig> {
        MonitorConfig::from_millis(self.session.timeout_ms, self.session.warning_ms)
    }

    pub fn default_notification_duration(&self) -> Duration {
        Duration::from_millis(self.notifications.default_duration_ms)
    }
}
