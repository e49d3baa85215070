//! Weather data models: archive records and current-conditions snapshots

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One day of archive observations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Daily maximum temperature in Celsius
    pub max_temp: Option<f64>,
    /// Daily minimum temperature in Celsius
    pub min_temp: Option<f64>,
    /// Precipitation sum in mm (missing values read as 0)
    pub precipitation: f64,
    /// Maximum 10 m wind speed in m/s (missing values read as 0)
    pub max_wind_speed: f64,
}

impl DailyRecord {
    /// Zero-based calendar month of this record
    #[must_use]
    pub fn month0(&self) -> u32 {
        self.date.month0()
    }
}

/// Current conditions at a coordinate, live or synthesized
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Apparent temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: f64,
    pub description: String,
    /// Icon code in the OpenWeatherMap convention, e.g. `04d`
    pub icon: String,
    /// Visibility in meters
    pub visibility: Option<f64>,
    /// Cloud cover percentage
    pub cloudiness: Option<f64>,
    /// Reporting station or place name
    pub location: Option<String>,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// True when synthesized from seasonal heuristics
    pub is_fallback: bool,
}

impl WeatherSnapshot {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.0}°C", self.temperature)
    }
}
