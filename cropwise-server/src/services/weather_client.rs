//! OpenWeather current-conditions client
//!
//! Only `main.temp` (metric units, °C) is consumed. Transport errors,
//! timeouts, non-2xx statuses and unexpected bodies all come back as a
//! [`WeatherError`]; the caller decides how to degrade.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("cropwise/", env!("CARGO_PKG_VERSION"));

/// A (latitude, longitude) pair. No range validation is performed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Network communication error (includes timeouts)
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Response body did not carry a usable temperature
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Source of the current air temperature at a coordinate
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current temperature in degrees Celsius
    async fn current_temperature(&self, coord: Coordinate) -> Result<f64, WeatherError>;
}

/// Subset of the `/weather` response we read
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub main: MainReadings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
}

/// OpenWeather API client
pub struct OpenWeatherClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn weather_url(&self) -> String {
        format!("{}/weather", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_temperature(&self, coord: Coordinate) -> Result<f64, WeatherError> {
        let mut params = vec![
            ("lat", coord.latitude.to_string()),
            ("lon", coord.longitude.to_string()),
            ("units", "metric".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("appid", key.clone()));
        }

        tracing::debug!(
            latitude = coord.latitude,
            longitude = coord.longitude,
            "Querying OpenWeather current conditions"
        );

        let response = self
            .http_client
            .get(self.weather_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        parse_temperature(&body)
    }
}

/// Pull `main.temp` out of a `/weather` response body
pub fn parse_temperature(body: &str) -> Result<f64, WeatherError> {
    let weather: CurrentWeather =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
    Ok(weather.main.temp)
}
