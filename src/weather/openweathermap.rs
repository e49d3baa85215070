//! OpenWeatherMap current-conditions client

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{CurrentWeatherSource, http_client};
use crate::config::SourcesConfig;
use crate::models::{Coordinate, WeatherSnapshot};
use crate::{Result, WeatherWiseError};

/// Current weather from `/weather?units=metric`
pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherMapClient {
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            api_key: config.usable_api_key(),
            base_url: config.current_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CurrentWeatherSource for OpenWeatherMapClient {
    #[instrument(skip(self), fields(lat = coordinate.latitude(), lon = coordinate.longitude()))]
    async fn current(&self, coordinate: Coordinate) -> Result<WeatherSnapshot> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WeatherWiseError::transport("no API key configured for current weather"))?;

        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url,
            coordinate.latitude(),
            coordinate.longitude(),
            urlencoding::encode(api_key)
        );
        debug!("Requesting current weather from {}", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherWiseError::transport(format!(
                "OpenWeatherMap API error: {status}"
            )));
        }

        let body: OwmCurrentResponse = response.json().await?;
        body.into_snapshot()
    }
}

#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    weather: Vec<OwmWeather>,
    main: OwmMain,
    visibility: Option<f64>,
    wind: OwmWind,
    clouds: Option<OwmClouds>,
    sys: Option<OwmSys>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: Option<String>,
}

impl OwmCurrentResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherWiseError::malformed("current weather has no condition entry"))?;

        Ok(WeatherSnapshot {
            temperature: self.main.temp.round(),
            feels_like: self.main.feels_like.round(),
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            wind_direction: self.wind.deg.unwrap_or(0.0),
            description: weather.description,
            icon: weather.icon,
            visibility: self.visibility,
            cloudiness: self.clouds.map(|c| c.all),
            location: self.name,
            country: self.sys.and_then(|s| s.country),
            timestamp: Utc::now(),
            is_fallback: false,
        })
    }
}
