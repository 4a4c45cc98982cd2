//! Application configuration loading from config.toml
//!
//! The file is optional: every section and field has a default, so a missing
//! file or a partial one yields a usable configuration.
//!
//! ```toml
//! [notifications]
//! reminder_minutes_before = 30
//! payment_reminder_days_before = 2
//!
//! [poller]
//! interval_seconds = 300
//!
//! [session]
//! ttl_minutes = 1440
//! ```

use crate::{
    core::session::DEFAULT_SESSION_TTL_MINUTES,
    errors::{Error, Result},
    models::NotificationSettings,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "SCHEDULE_BUDDY_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default notification settings for users who have not saved their own
    pub notifications: NotificationSettings,
    /// Reminder poller behavior
    pub poller: PollerConfig,
    /// Login session behavior
    pub session: SessionConfig,
}

/// `[poller]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Seconds between poll cycles
    pub interval_seconds: u64,
    /// How far ahead a cycle reports upcoming reminders
    pub horizon_hours: i64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
            horizon_hours: 24,
        }
    }
}

/// `[session]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lifetime of a login session
    pub ttl_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
        }
    }
}

impl AppConfig {
    /// Checks ranges that serde cannot express.
    ///
    /// # Errors
    /// Returns [`Error::Config`] or [`Error::InvalidLeadTime`] describing the bad value.
    pub fn validate(&self) -> Result<()> {
        self.notifications.validate()?;
        if self.poller.interval_seconds == 0 {
            return Err(Error::Config {
                message: "poller.interval_seconds must be positive".to_string(),
            });
        }
        if self.poller.horizon_hours <= 0 {
            return Err(Error::Config {
                message: "poller.horizon_hours must be positive".to_string(),
            });
        }
        if self.session.ttl_minutes <= 0 {
            return Err(Error::Config {
                message: "session.ttl_minutes must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Parses and validates configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML is invalid, or a
/// value is out of range.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `$SCHEDULE_BUDDY_CONFIG` or `./config.toml`.
///
/// A missing file is not an error: the defaults are used instead.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        load_config(&path)
    } else {
        info!(
            "No configuration file at {}, using defaults",
            path.display()
        );
        Ok(AppConfig::default())
    }
}
