//! Current conditions with a synthesized fallback

use chrono::{DateTime, Datelike, Utc};
use std::f64::consts::PI;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::cache::Cache;
use crate::climate::ClimateZone;
use crate::estimation::RandomSource;
use crate::models::{Coordinate, WeatherSnapshot};
use crate::weather::CurrentWeatherSource;

const FALLBACK_STATION: &str = "Local Climate Data";
const FALLBACK_VISIBILITY_M: f64 = 10_000.0;

/// Seasonal heuristics for one zone: `mean + amplitude * sin((m - 6)π/6)`
/// degrees plus jitter ranges for the remaining fields.
struct SeasonalProfile {
    mean_temp: f64,
    amplitude: f64,
    humidity: (f64, f64),
    wind_speed: (f64, f64),
    cloudiness: (f64, f64),
    description: &'static str,
    icon: &'static str,
}

const TROPICAL: SeasonalProfile = SeasonalProfile {
    mean_temp: 28.0,
    amplitude: 3.0,
    humidity: (75.0, 90.0),
    wind_speed: (3.0, 7.0),
    cloudiness: (40.0, 80.0),
    description: "partly cloudy",
    icon: "03d",
};

const TEMPERATE: SeasonalProfile = SeasonalProfile {
    mean_temp: 15.0,
    amplitude: 12.0,
    humidity: (65.0, 90.0),
    wind_speed: (4.0, 9.0),
    cloudiness: (50.0, 90.0),
    description: "mostly cloudy",
    icon: "04d",
};

impl SeasonalProfile {
    fn for_zone(zone: ClimateZone) -> &'static Self {
        match zone {
            ClimateZone::Tropical => &TROPICAL,
            ClimateZone::Arid | ClimateZone::Temperate | ClimateZone::Continental => &TEMPERATE,
        }
    }

    fn temperature(&self, month0: u32) -> f64 {
        let phase = (f64::from(month0) - 6.0) * PI / 6.0;
        self.mean_temp + phase.sin() * self.amplitude
    }
}

/// Resolves live weather for a coordinate, synthesizing a seasonal snapshot
/// when the live source is unavailable.
pub struct CurrentConditionsResolver {
    source: Arc<dyn CurrentWeatherSource>,
    cache: Cache<WeatherSnapshot>,
    random: Arc<dyn RandomSource>,
}

impl CurrentConditionsResolver {
    pub fn new(
        source: Arc<dyn CurrentWeatherSource>,
        cache: Cache<WeatherSnapshot>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            source,
            cache,
            random,
        }
    }

    /// Snapshot for `coordinate`. Never fails: transport, payload and
    /// credential problems all yield a snapshot with `is_fallback == true`.
    #[instrument(skip(self, coordinate), fields(lat = coordinate.latitude(), lon = coordinate.longitude()))]
    pub async fn current(&self, coordinate: Coordinate) -> WeatherSnapshot {
        let key = coordinate.cache_key("current", None);
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Serving current conditions from cache");
            return cached;
        }

        let snapshot = match self.source.current(coordinate).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("Current weather unavailable, synthesizing: {}", err);
                self.synthesize(coordinate, Utc::now())
            }
        };

        self.cache.put(&key, snapshot.clone()).await;
        snapshot
    }

    /// Drops every cached snapshot.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    fn synthesize(&self, coordinate: Coordinate, now: DateTime<Utc>) -> WeatherSnapshot {
        let profile = SeasonalProfile::for_zone(ClimateZone::for_coordinate(&coordinate));
        let temperature = profile.temperature(now.month0());
        let random = &self.random;

        WeatherSnapshot {
            temperature,
            feels_like: temperature + random.uniform(-2.0, 2.0),
            humidity: random.uniform(profile.humidity.0, profile.humidity.1),
            pressure: 1013.0 + random.uniform(-10.0, 10.0),
            wind_speed: random.uniform(profile.wind_speed.0, profile.wind_speed.1),
            wind_direction: random.uniform(0.0, 360.0),
            description: profile.description.to_string(),
            icon: profile.icon.to_string(),
            visibility: Some(FALLBACK_VISIBILITY_M),
            cloudiness: Some(random.uniform(profile.cloudiness.0, profile.cloudiness.1)),
            location: Some(FALLBACK_STATION.to_string()),
            country: Some(String::new()),
            timestamp: now,
            is_fallback: true,
        }
    }
}
