use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::CoreError;
use crate::storage::json_backend::{app_data_dir, ensure_dir};

const CONFIG_FILE: &str = "config.json";

/// App-level settings kept outside the record data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Web-app endpoint of the spreadsheet backend; `None` disables sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_url: Option<String>,
    /// Suggested target when a new round opens.
    pub default_target_tons: f64,
    /// Season close, day-of-month and month (no year; applied to the current
    /// season's year).
    pub season_end_day: u32,
    pub season_end_month: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script_url: None,
            default_target_tons: 1000.0,
            season_end_day: 30,
            season_end_month: 4,
        }
    }
}

impl Config {
    /// Builds a complete value from an old/partial on-disk shape. Blank
    /// script URLs collapse to `None`; out-of-range values take defaults.
    pub fn from_partial(partial: PartialConfig) -> Self {
        let defaults = Self::default();
        Self {
            script_url: partial
                .script_url
                .filter(|url| !url.trim().is_empty()),
            default_target_tons: partial
                .default_target_tons
                .filter(|target| *target > 0.0)
                .unwrap_or(defaults.default_target_tons),
            season_end_day: partial
                .season_end_day
                .filter(|day| (1..=31).contains(day))
                .unwrap_or(defaults.season_end_day),
            season_end_month: partial
                .season_end_month
                .filter(|month| (1..=12).contains(month))
                .unwrap_or(defaults.season_end_month),
        }
    }

    /// The season close as a calendar date within `year`.
    pub fn season_end(&self, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, self.season_end_month, self.season_end_day)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 4, 30).expect("valid fallback date"))
    }
}

/// On-disk shape tolerated on load: every field optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PartialConfig {
    #[serde(default)]
    pub script_url: Option<String>,
    #[serde(default)]
    pub default_target_tons: Option<f64>,
    #[serde(default)]
    pub season_end_day: Option<u32>,
    #[serde(default)]
    pub season_end_month: Option<u32>,
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, CoreError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, CoreError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config, CoreError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let partial: PartialConfig = serde_json::from_str(&data)?;
            Ok(Config::from_partial(partial))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
