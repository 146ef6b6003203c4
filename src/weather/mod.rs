//! Current-temperature readout for the home screen.
//!
//! Fetching is delegated to a [`WeatherSource`]; this module owns the
//! response shape, the query parameters and how a reading is rendered.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Shown whenever no live reading is available.
pub const FALLBACK_READOUT: &str = "23.5°C";

pub const DEFAULT_CITY: &str = "Taipei";

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather source not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<serde_json::Error> for WeatherError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidResponse(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => "K",
        }
    }
}

impl Default for Units {
    fn default() -> Self {
        Self::Metric
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Self::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Self::Imperial),
            "standard" | "k" | "kelvin" => Ok(Self::Standard),
            _ => Err(format!("unsupported units: {value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub main: MainData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainData {
    pub temp: f32,
}

impl WeatherResponse {
    /// Parse the JSON body returned by the weather endpoint. Extra fields
    /// are ignored.
    pub fn from_json(body: &str) -> Result<Self, WeatherError> {
        Ok(serde_json::from_str(body)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub units: Units,
    pub api_key: Option<String>,
}

impl Default for WeatherQuery {
    fn default() -> Self {
        Self {
            city: DEFAULT_CITY.to_string(),
            units: Units::default(),
            api_key: None,
        }
    }
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherResponse, WeatherError>;
}

/// Source used when nothing is wired up; every lookup reports
/// `NotConfigured` so the readout falls back.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWeatherSource;

#[async_trait]
impl WeatherSource for NoWeatherSource {
    async fn current(&self, _query: &WeatherQuery) -> Result<WeatherResponse, WeatherError> {
        Err(WeatherError::NotConfigured)
    }
}

pub fn format_temperature(temp: f32, units: Units) -> String {
    format!("{temp:.1}{}", units.symbol())
}

/// Fetch and render the current temperature. Failures never reach the
/// caller: they are logged and the fallback readout is returned instead.
pub async fn weather_readout(source: &dyn WeatherSource, query: &WeatherQuery) -> String {
    match source.current(query).await {
        Ok(response) => format_temperature(response.main.temp, query.units),
        Err(e) => {
            tracing::warn!(city = %query.city, "weather unavailable: {e}");
            FALLBACK_READOUT.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FixedSource(&'static str);

    #[async_trait]
    impl WeatherSource for FixedSource {
        async fn current(&self, _query: &WeatherQuery) -> Result<WeatherResponse, WeatherError> {
            WeatherResponse::from_json(self.0)
        }
    }

    #[tokio::test]
    async fn renders_live_reading() {
        let source = FixedSource(r#"{"coord":{"lon":121.5},"main":{"temp":27.43,"humidity":80}}"#);
        let readout = weather_readout(&source, &WeatherQuery::default()).await;
        assert_eq!(readout, "27.4°C");
    }

    #[tokio::test]
    async fn uses_unit_symbol() {
        let source = FixedSource(r#"{"main":{"temp":80}}"#);
        let query = WeatherQuery {
            units: Units::Imperial,
            ..Default::default()
        };
        assert_eq!(weather_readout(&source, &query).await, "80.0°F");
    }

    #[tokio::test]
    async fn falls_back_on_bad_body() {
        let source = FixedSource(r#"{"cod":401,"message":"Invalid API key"}"#);
        assert_eq!(
            weather_readout(&source, &WeatherQuery::default()).await,
            FALLBACK_READOUT
        );
    }

    #[tokio::test]
    async fn falls_back_when_unconfigured() {
        assert_eq!(
            weather_readout(&NoWeatherSource, &WeatherQuery::default()).await,
            FALLBACK_READOUT
        );
    }

    #[test]
    fn parses_units() {
        assert_eq!("Celsius".parse::<Units>(), Ok(Units::Metric));
        assert_eq!("imperial".parse::<Units>(), Ok(Units::Imperial));
        assert!("rankine".parse::<Units>().is_err());
    }
}
