//! Open-Meteo archive client

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::{HistoricalDataSource, http_client};
use crate::config::SourcesConfig;
use crate::models::{Coordinate, DailyRecord};
use crate::{Result, WeatherWiseError};

/// Fetches daily maxima/minima, precipitation and wind from the Open-Meteo archive
pub struct OpenMeteoArchiveClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoArchiveClient {
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            base_url: config.historical_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn archive_url(&self, coordinate: Coordinate, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/archive?latitude={}&longitude={}&start_date={}&end_date={}&daily=temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max&wind_speed_unit=ms&timezone=auto",
            self.base_url,
            coordinate.latitude(),
            coordinate.longitude(),
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        )
    }
}

#[async_trait]
impl HistoricalDataSource for OpenMeteoArchiveClient {
    #[instrument(skip(self), fields(lat = coordinate.latitude(), lon = coordinate.longitude()))]
    async fn daily_records(
        &self,
        coordinate: Coordinate,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>> {
        let url = self.archive_url(coordinate, start, end);
        debug!("Open-Meteo archive request URL: {}", url);
        let start_time = Instant::now();

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherWiseError::transport(format!(
                "Historical API error: {status}"
            )));
        }

        let archive: ArchiveResponse = response.json().await?;
        let records = archive.into_records()?;

        let elapsed = start_time.elapsed();
        info!(
            "Retrieved {} daily records in {:.3}s",
            records.len(),
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() > 5 {
            warn!("Slow archive response: {:.3}s", elapsed.as_secs_f64());
        }
        Ok(records)
    }
}

/// Archive response from `OpenMeteo`
#[derive(Debug, serde::Deserialize)]
struct ArchiveResponse {
    daily: Option<DailyData>,
}

/// Daily archive columns; every column is parallel to `time`
#[derive(Debug, serde::Deserialize)]
struct DailyData {
    time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min")]
    temperature_min: Vec<Option<f64>>,
    #[serde(rename = "precipitation_sum")]
    precipitation: Vec<Option<f64>>,
    #[serde(rename = "windspeed_10m_max")]
    wind_speed_max: Vec<Option<f64>>,
}

impl ArchiveResponse {
    fn into_records(self) -> Result<Vec<DailyRecord>> {
        let daily = self
            .daily
            .ok_or_else(|| WeatherWiseError::malformed("archive response has no daily block"))?;

        let len = daily.time.len();
        if [
            daily.temperature_max.len(),
            daily.temperature_min.len(),
            daily.precipitation.len(),
            daily.wind_speed_max.len(),
        ]
        .iter()
        .any(|&column| column != len)
        {
            return Err(WeatherWiseError::malformed(
                "archive daily columns have mismatched lengths",
            ));
        }

        daily
            .time
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| {
                    WeatherWiseError::malformed(format!("bad archive date '{day}': {e}"))
                })?;
                Ok(DailyRecord {
                    date,
                    max_temp: daily.temperature_max[i],
                    min_temp: daily.temperature_min[i],
                    precipitation: daily.precipitation[i].unwrap_or(0.0),
                    max_wind_speed: daily.wind_speed_max[i].unwrap_or(0.0),
                })
            })
            .collect()
    }
}
