//! Probability estimation orchestrator

use chrono::{Datelike, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::plausibility::is_implausible;
use super::random::RandomSource;
use super::reducer::reduce;
use crate::WeatherWiseError;
use crate::cache::Cache;
use crate::climate::{ClimateZone, Thresholds, base_probabilities};
use crate::config::EstimationConfig;
use crate::models::{Coordinate, DataSource, ProbabilityVector};
use crate::weather::HistoricalDataSource;

/// Half-width of the uniform jitter applied to climate-model probabilities
const JITTER_POINTS: f64 = 15.0;
/// `totalYears` reported for climate-model vectors
const CLIMATE_MODEL_YEARS: u32 = 25;

/// Why the archive path was abandoned in favour of the climate model
#[derive(Error, Debug)]
pub enum FallbackReason {
    #[error("archive fetch failed: {0}")]
    Fetch(#[from] WeatherWiseError),
    #[error("archive returned no daily records")]
    NoData,
    #[error("reduced vector is implausible")]
    Implausible,
}

/// Estimates extreme-weather probabilities for a coordinate and date.
///
/// Results are cached per rounded coordinate and date for the lifetime of the
/// cache instance; a second call for the same key never reaches the source.
pub struct ProbabilityEngine {
    source: Arc<dyn HistoricalDataSource>,
    cache: Cache<ProbabilityVector>,
    random: Arc<dyn RandomSource>,
    settings: EstimationConfig,
}

impl ProbabilityEngine {
    pub fn new(
        source: Arc<dyn HistoricalDataSource>,
        cache: Cache<ProbabilityVector>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self::with_settings(source, cache, random, EstimationConfig::default())
    }

    pub fn with_settings(
        source: Arc<dyn HistoricalDataSource>,
        cache: Cache<ProbabilityVector>,
        random: Arc<dyn RandomSource>,
        settings: EstimationConfig,
    ) -> Self {
        Self {
            source,
            cache,
            random,
            settings,
        }
    }

    /// Probability vector for `coordinate` on `date`. Never fails: any
    /// environmental problem resolves to a climate-model vector.
    #[instrument(skip(self, coordinate, date), fields(lat = coordinate.latitude(), lon = coordinate.longitude(), %date))]
    pub async fn estimate(&self, coordinate: Coordinate, date: NaiveDate) -> ProbabilityVector {
        let key = coordinate.cache_key("historical", Some(&date.format("%Y-%m-%d").to_string()));
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Serving probabilities from cache");
            return cached;
        }

        let zone = ClimateZone::for_coordinate(&coordinate);
        let month0 = date.month0();

        let vector = match self.from_archive(coordinate, zone, month0).await {
            Ok(vector) => {
                info!(%zone, "Estimated probabilities from {} years of archive data", vector.total_years());
                vector
            }
            Err(reason) => {
                match &reason {
                    FallbackReason::Fetch(err) => warn!("Falling back to climate model: {}", err),
                    FallbackReason::NoData | FallbackReason::Implausible => {
                        debug!("Falling back to climate model: {}", reason);
                    }
                }
                self.from_climate_model(zone, month0)
            }
        };

        self.cache.put(&key, vector.clone()).await;
        vector
    }

    /// Drops every cached estimate.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    async fn from_archive(
        &self,
        coordinate: Coordinate,
        zone: ClimateZone,
        month0: u32,
    ) -> Result<ProbabilityVector, FallbackReason> {
        let (start, end) = self.archive_window(Utc::now().year());
        let records = self.source.daily_records(coordinate, start, end).await?;
        if records.is_empty() {
            return Err(FallbackReason::NoData);
        }

        let vector = reduce(&records, month0, &Thresholds::for_zone(zone));
        if is_implausible(&vector) {
            return Err(FallbackReason::Implausible);
        }
        Ok(vector)
    }

    /// Base table value for each condition, independently jittered and clamped
    fn from_climate_model(&self, zone: ClimateZone, month0: u32) -> ProbabilityVector {
        let base = base_probabilities(zone, month0).as_array();
        let jittered =
            base.map(|value| value + self.random.uniform(-JITTER_POINTS, JITTER_POINTS));
        ProbabilityVector::new(jittered, CLIMATE_MODEL_YEARS, DataSource::EnhancedClimateModel)
    }

    /// January 1st `history_years` ago through December 31st of last year
    fn archive_window(&self, current_year: i32) -> (NaiveDate, NaiveDate) {
        let years = i32::try_from(self.settings.history_years).unwrap_or(30);
        let start = NaiveDate::from_ymd_opt(current_year - years, 1, 1).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(current_year - 1, 12, 31).unwrap_or(NaiveDate::MAX);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::SequenceRandom;
    use crate::models::{ConditionKey, DailyRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Fail,
        Records(Vec<DailyRecord>),
    }

    struct FakeArchive {
        behaviour: Behaviour,
        calls: AtomicUsize,
        windows: Mutex<Vec<(NaiveDate, NaiveDate)>>,
    }

    impl FakeArchive {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                calls: AtomicUsize::new(0),
                windows: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HistoricalDataSource for FakeArchive {
        async fn daily_records(
            &self,
            _coordinate: Coordinate,
            start: NaiveDate,
            end: NaiveDate,
        ) -> crate::Result<Vec<DailyRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.windows.lock().unwrap().push((start, end));
            match &self.behaviour {
                Behaviour::Fail => Err(WeatherWiseError::transport("connection refused")),
                Behaviour::Records(records) => Ok(records.clone()),
            }
        }
    }

    fn engine(source: Arc<FakeArchive>, unit: f64) -> ProbabilityEngine {
        ProbabilityEngine::new(
            source,
            Cache::unbounded(),
            Arc::new(SequenceRandom::constant(unit)),
        )
    }

    fn januaries(years: i32, windy_years: i32) -> Vec<DailyRecord> {
        (0..years)
            .flat_map(|y| {
                (1..=30).map(move |dom| DailyRecord {
                    date: NaiveDate::from_ymd_opt(1995 + y, 1, dom).unwrap(),
                    max_temp: Some(6.0),
                    min_temp: Some(1.0),
                    precipitation: 1.0,
                    max_wind_speed: if y < windy_years { 12.0 } else { 3.0 },
                })
            })
            .collect()
    }

    fn july(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 7, 15).unwrap()
    }

    #[tokio::test]
    async fn test_archive_path_reports_real_provenance() {
        let source = FakeArchive::new(Behaviour::Records(januaries(30, 6)));
        let engine = engine(source.clone(), 0.5);
        let coordinate = Coordinate::new(51.5074, -0.1278).unwrap();

        let vector = engine
            .estimate(coordinate, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
            .await;

        assert_eq!(vector.data_source(), DataSource::NasaOpenMeteo);
        assert_eq!(vector.get(ConditionKey::VeryWindy), 20);
        assert_eq!(vector.total_years(), 30);
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let source = FakeArchive::new(Behaviour::Fail);
        let random = Arc::new(SequenceRandom::new(vec![0.1, 0.9, 0.3, 0.7, 0.5]));
        let engine = ProbabilityEngine::new(source.clone(), Cache::unbounded(), random);
        let coordinate = Coordinate::new(40.7128, -74.006).unwrap();

        let first = engine.estimate(coordinate, july(2025)).await;
        let second = engine.estimate(coordinate, july(2025)).await;

        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let source = FakeArchive::new(Behaviour::Fail);
        let engine = engine(source.clone(), 0.5);
        let coordinate = Coordinate::new(40.7128, -74.006).unwrap();

        engine.estimate(coordinate, july(2025)).await;
        engine.clear_cache().await;
        engine.estimate(coordinate, july(2025)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_model() {
        let source = FakeArchive::new(Behaviour::Fail);
        let engine = engine(source, 0.5);
        let coordinate = Coordinate::new(51.5074, -0.1278).unwrap();

        let vector = engine
            .estimate(coordinate, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap())
            .await;

        // Continental January with zero jitter
        assert_eq!(vector.data_source(), DataSource::EnhancedClimateModel);
        assert_eq!(vector.total_years(), 25);
        assert_eq!(vector.get(ConditionKey::VeryCold), 85);
        assert_eq!(vector.get(ConditionKey::VeryWindy), 35);
        assert_eq!(vector.get(ConditionKey::VeryUncomfortable), 18);
    }

    #[rstest::rstest]
    #[case(0.0, 70, 20)]
    #[case(0.999_999, 100, 50)]
    #[tokio::test]
    async fn test_fallback_jitter_is_fixed_at_fifteen_points(
        #[case] unit: f64,
        #[case] very_cold: u8,
        #[case] very_windy: u8,
    ) {
        let engine = ProbabilityEngine::with_settings(
            FakeArchive::new(Behaviour::Fail),
            Cache::unbounded(),
            Arc::new(SequenceRandom::constant(unit)),
            EstimationConfig { history_years: 10 },
        );
        let coordinate = Coordinate::new(51.5074, -0.1278).unwrap();

        let vector = engine
            .estimate(coordinate, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap())
            .await;

        assert_eq!(vector.total_years(), 25);
        assert_eq!(vector.get(ConditionKey::VeryCold), very_cold);
        assert_eq!(vector.get(ConditionKey::VeryWindy), very_windy);
    }

    #[tokio::test]
    async fn test_empty_archive_falls_back_to_model() {
        let source = FakeArchive::new(Behaviour::Records(Vec::new()));
        let engine = engine(source, 0.5);
        let coordinate = Coordinate::new(51.5074, -0.1278).unwrap();

        let vector = engine
            .estimate(coordinate, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap())
            .await;

        assert_eq!(vector.data_source(), DataSource::EnhancedClimateModel);
        assert_eq!(vector.total_years(), 25);
    }

    #[tokio::test]
    async fn test_implausible_reduction_falls_back_to_model() {
        // Every January day is windy: 100 % triggers the gate
        let source = FakeArchive::new(Behaviour::Records(januaries(10, 10)));
        let engine = engine(source, 0.5);
        let coordinate = Coordinate::new(51.5074, -0.1278).unwrap();

        let vector = engine
            .estimate(coordinate, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap())
            .await;

        assert_eq!(vector.data_source(), DataSource::EnhancedClimateModel);
    }

    #[tokio::test]
    async fn test_dubai_july_jitter_bounds() {
        let coordinate = Coordinate::new(25.2048, 55.2708).unwrap();
        assert_eq!(ClimateZone::for_coordinate(&coordinate), ClimateZone::Arid);

        let low = engine(FakeArchive::new(Behaviour::Fail), 0.0)
            .estimate(coordinate, july(2025))
            .await;
        assert_eq!(low.get(ConditionKey::VeryHot), 83);

        let high = engine(FakeArchive::new(Behaviour::Fail), 0.999_999)
            .estimate(coordinate, july(2025))
            .await;
        assert_eq!(high.get(ConditionKey::VeryHot), 100);

        for day in 1..=31 {
            let vector = ProbabilityEngine::new(
                FakeArchive::new(Behaviour::Fail),
                Cache::unbounded(),
                Arc::new(crate::estimation::ThreadRandom),
            )
            .estimate(coordinate, NaiveDate::from_ymd_opt(2025, 7, day).unwrap())
            .await;
            assert!((83..=100).contains(&vector.get(ConditionKey::VeryHot)));
            assert!(vector.iter().all(|(_, p)| p <= 100));
        }
    }

    #[tokio::test]
    async fn test_archive_window_ends_last_year() {
        let source = FakeArchive::new(Behaviour::Fail);
        let engine = engine(source.clone(), 0.5);
        engine
            .estimate(Coordinate::new(0.0, 0.0).unwrap(), july(2025))
            .await;

        let year = Utc::now().year();
        let windows = source.windows.lock().unwrap();
        assert_eq!(
            windows[0],
            (
                NaiveDate::from_ymd_opt(year - 30, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(year - 1, 12, 31).unwrap()
            )
        );
    }
}
