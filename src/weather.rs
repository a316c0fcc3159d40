//! Weather Fetcher: current conditions for a free-text location
//!
//! Talks to the OpenWeather current-conditions endpoint with metric units.
//! This fetcher never raises past its boundary: a missing API key, network
//! error, or malformed body all yield the empty snapshot, and absent fields
//! render downstream as a literal "not available".

use crate::config::WeatherSettings;
use crate::error::Result;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Default OpenWeather API base
const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Rendering for absent weather fields
pub const NOT_AVAILABLE: &str = "not available";

/// Current-conditions snapshot; every field is optional by design
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temp: Option<f64>,
    /// Feels-like temperature in Celsius
    pub feels_like: Option<f64>,
    /// Textual condition description
    pub description: Option<String>,
    /// Humidity percentage
    pub humidity: Option<f64>,
    /// Wind speed in m/s
    pub wind_speed: Option<f64>,
}

impl WeatherSnapshot {
    /// True when no field is populated
    pub fn is_empty(&self) -> bool {
        self.temp.is_none()
            && self.feels_like.is_none()
            && self.description.is_none()
            && self.humidity.is_none()
            && self.wind_speed.is_none()
    }
}

/// Render an optional numeric field with a unit suffix
pub fn render_metric(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    main: MainSection,
    #[serde(default)]
    weather: Vec<ConditionSection>,
    #[serde(default)]
    wind: WindSection,
}

#[derive(Debug, Deserialize, Default)]
struct MainSection {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConditionSection {
    description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct WindSection {
    speed: Option<f64>,
}

/// OpenWeather client
pub struct WeatherClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl WeatherClient {
    /// Create a client from weather settings
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(settings: &WeatherSettings, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent("daybrief/0.2.0")
            .build()?;
        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            api_base: settings
                .api_base
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Fetch current conditions for a location
    ///
    /// # Returns
    ///
    /// A snapshot, empty on any failure. Callers always get a value.
    pub async fn fetch(&self, location: &str) -> WeatherSnapshot {
        if self.api_key.is_empty() {
            tracing::warn!("Weather API key not configured, skipping weather");
            return WeatherSnapshot::default();
        }

        let url = format!("{}/weather", self.api_base);
        let result = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Weather request failed for '{}': {}", location, e);
                return WeatherSnapshot::default();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Weather API returned {} for '{}'",
                response.status(),
                location
            );
            return WeatherSnapshot::default();
        }

        match response.json::<WeatherResponse>().await {
            Ok(parsed) => WeatherSnapshot {
                temp: parsed.main.temp,
                feels_like: parsed.main.feels_like,
                description: parsed.weather.first().and_then(|c| c.description.clone()),
                humidity: parsed.main.humidity,
                wind_speed: parsed.wind.speed,
            },
            Err(e) => {
                tracing::warn!("Malformed weather response for '{}': {}", location, e);
                WeatherSnapshot::default()
            }
        }
    }
}
