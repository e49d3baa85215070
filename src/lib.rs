//! `WeatherWise` - Extreme-weather probabilities for a place and calendar date
//!
//! This library classifies a coordinate into a climate zone, reduces decades
//! of daily archive data into exceedance probabilities for the requested
//! month and falls back to a seasonal climate model whenever the archive is
//! unreachable or produces implausible numbers. Current conditions are
//! resolved alongside, with their own synthesized fallback.

pub mod api;
pub mod cache;
pub mod climate;
pub mod config;
pub mod current;
pub mod error;
pub mod estimation;
pub mod geocoding;
pub mod logging;
pub mod models;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::{AppState, EstimateReport};
pub use cache::Cache;
pub use climate::{ClimateZone, Thresholds};
pub use config::WeatherWiseConfig;
pub use current::CurrentConditionsResolver;
pub use error::WeatherWiseError;
pub use estimation::{Activity, ProbabilityEngine, RandomSource, RiskLevel};
pub use geocoding::{GeocodedPlace, GeocodingClient, RateLimiter};
pub use models::{
    ConditionKey, Coordinate, DailyRecord, DataSource, ProbabilityVector, WeatherSnapshot,
};
pub use weather::{CurrentWeatherSource, HistoricalDataSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherWiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
