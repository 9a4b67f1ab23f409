//! `config.toml` loading and merging with command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use chrono::NaiveTime;
use meetup_engine::config::parse_timezone;
use meetup_engine::{
    AvailabilityConfig, WorkingHours, DEFAULT_DURATION_MINUTES, MAX_LOOKAHEAD_DAYS,
};
use serde::Deserialize;

/// On-disk settings. Every field is optional; absent fields keep defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub timezone: Option<String>,
    pub working_hours: Option<HoursConfig>,
    pub lookahead_days: Option<u32>,
    pub max_slots: Option<usize>,
    pub default_duration_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoursConfig {
    /// `HH:MM`, 24-hour.
    pub open: String,
    pub close: String,
}

/// `~/.config/campusmatch/config.toml` on Linux.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("campusmatch").join("config.toml"))
}

impl FileConfig {
    /// Load from `path`, or from [`default_path`] if it exists.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Build the calculator configuration, letting `timezone` override the file.
    pub fn availability(&self, timezone: Option<&str>) -> Result<AvailabilityConfig> {
        let mut config = AvailabilityConfig::default();

        if let Some(name) = timezone.or(self.timezone.as_deref()) {
            config.timezone = parse_timezone(name)?;
        }
        if let Some(hours) = &self.working_hours {
            config.working_hours =
                WorkingHours::new(parse_clock(&hours.open)?, parse_clock(&hours.close)?)?;
        }
        if let Some(days) = self.lookahead_days {
            ensure!(
                days <= MAX_LOOKAHEAD_DAYS,
                "lookahead_days must be at most {}, got {}",
                MAX_LOOKAHEAD_DAYS,
                days
            );
            config.lookahead_days = days;
        }
        if let Some(max) = self.max_slots {
            config.max_slots = Some(max);
        }
        Ok(config)
    }

    pub fn duration_minutes(&self, flag: Option<u32>) -> u32 {
        flag.or(self.default_duration_minutes)
            .unwrap_or(DEFAULT_DURATION_MINUTES)
    }
}

fn parse_clock(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .with_context(|| format!("Invalid time of day '{}', expected HH:MM", value))
}
