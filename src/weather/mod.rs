//! External weather sources
//!
//! The engine only sees the two traits below; the concrete HTTP clients live
//! in the submodules.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::Result;
use crate::models::{Coordinate, DailyRecord, WeatherSnapshot};

pub mod open_meteo;
pub mod openweathermap;

pub use open_meteo::OpenMeteoArchiveClient;
pub use openweathermap::OpenWeatherMapClient;

/// Multi-year daily archive for a coordinate
#[async_trait]
pub trait HistoricalDataSource: Send + Sync {
    /// Daily records for `start..=end`. Fails with `Transport` or
    /// `MalformedResponse`.
    async fn daily_records(
        &self,
        coordinate: Coordinate,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>>;
}

/// Live conditions for a coordinate
#[async_trait]
pub trait CurrentWeatherSource: Send + Sync {
    /// Snapshot with `is_fallback == false`. A missing credential is reported
    /// as a `Transport` error.
    async fn current(&self, coordinate: Coordinate) -> Result<WeatherSnapshot>;
}

pub(crate) fn http_client(timeout_seconds: u32) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds.into()))
        .user_agent(concat!("WeatherWise/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
