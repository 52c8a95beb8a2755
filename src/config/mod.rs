use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    calendar::Calendar,
    errors::{BudgetError, Result},
    ledger::RecurrenceEngine,
    utils::paths::{config_file_in, ensure_dir, resolve_base, write_atomic},
};

/// User preferences that shape how instants are read as calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Fixed offset from UTC, in minutes, used for every calendar computation.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_first_weekday")]
    pub first_weekday: Weekday,
    pub currency: String,
    pub locale: String,
}

fn default_first_weekday() -> Weekday {
    Weekday::Sun
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            first_weekday: default_first_weekday(),
            currency: "USD".into(),
            locale: "en-US".into(),
        }
    }
}

impl Config {
    pub fn calendar(&self) -> Result<Calendar> {
        Calendar::from_offset_minutes(self.utc_offset_minutes).ok_or_else(|| {
            BudgetError::ConfigError(format!(
                "utc offset of {} minutes is outside ±24h",
                self.utc_offset_minutes
            ))
        })
    }

    pub fn engine(&self) -> Result<RecurrenceEngine> {
        Ok(RecurrenceEngine::new(self.calendar()?))
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(resolve_base(None))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Reads the stored config, falling back to defaults when none exists.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| BudgetError::ConfigError(err.to_string()))?;
        config.calendar()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.calendar()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
