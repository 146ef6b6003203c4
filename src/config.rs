use std::path::PathBuf;
use std::time::Duration;

use crate::runtime::countdown::DEFAULT_TICK_INTERVAL;
use crate::runtime::FocusPreset;
use crate::weather::{Units, WeatherQuery};

pub const ENV_DATA_DIR: &str = "LIFESYNC_DATA_DIR";
pub const ENV_TICK_INTERVAL_MS: &str = "LIFESYNC_TICK_INTERVAL_MS";
pub const ENV_DEFAULT_DURATION: &str = "LIFESYNC_DEFAULT_DURATION";
pub const ENV_WEATHER_CITY: &str = "LIFESYNC_WEATHER_CITY";
pub const ENV_WEATHER_UNITS: &str = "LIFESYNC_WEATHER_UNITS";
pub const ENV_WEATHER_API_KEY: &str = "LIFESYNC_WEATHER_API_KEY";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub tick_interval: Duration,
    pub default_duration_ms: i64,
    pub weather: WeatherQuery,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            default_duration_ms: FocusPreset::default().duration_ms(),
            weather: WeatherQuery::default(),
        }
    }
}

impl AppConfig {
    /// Resolve configuration from the process environment, reading a `.env`
    /// file first if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve configuration through `lookup`. Unset or blank variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = get(ENV_TICK_INTERVAL_MS) {
            let ms: u64 = raw.parse().map_err(|e| ConfigError::Invalid {
                var: ENV_TICK_INTERVAL_MS,
                reason: format!("{raw:?}: {e}"),
            })?;
            if ms == 0 {
                return Err(ConfigError::Invalid {
                    var: ENV_TICK_INTERVAL_MS,
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.tick_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = get(ENV_DEFAULT_DURATION) {
            config.default_duration_ms = parse_duration(&raw).map_err(|reason| ConfigError::Invalid {
                var: ENV_DEFAULT_DURATION,
                reason,
            })?;
        }

        if let Some(city) = get(ENV_WEATHER_CITY) {
            config.weather.city = city;
        }
        if let Some(raw) = get(ENV_WEATHER_UNITS) {
            config.weather.units = raw.parse::<Units>().map_err(|reason| ConfigError::Invalid {
                var: ENV_WEATHER_UNITS,
                reason,
            })?;
        }
        config.weather.api_key = get(ENV_WEATHER_API_KEY);

        Ok(config)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("lifesync.db")
    }
}

/// Accept a preset name or a positive number of milliseconds.
fn parse_duration(raw: &str) -> Result<i64, String> {
    if let Ok(preset) = raw.parse::<FocusPreset>() {
        return Ok(preset.duration_ms());
    }
    match raw.parse::<i64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        Ok(ms) => Err(format!("{ms} ms is not a positive duration")),
        Err(_) => Err(format!("{raw:?} is neither a preset nor milliseconds")),
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(app_data) = std::env::var("APPDATA") {
            return PathBuf::from(app_data).join("LifeSync");
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".lifesync");
    }

    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".lifesync");
    }

    PathBuf::from(".lifesync")
}
