use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cache::Cache;
use crate::climate::{ClimateZone, Thresholds};
use crate::config::WeatherWiseConfig;
use crate::current::CurrentConditionsResolver;
use crate::estimation::{
    Activity, ProbabilityEngine, ProbabilityLevel, RiskLevel, ThreadRandom, describe,
    recommendation,
};
use crate::geocoding::{GeocodedPlace, GeocodingClient};
use crate::models::{ConditionKey, Coordinate, ProbabilityVector, WeatherSnapshot, parse_date};
use crate::weather::{OpenMeteoArchiveClient, OpenWeatherMapClient};
use crate::{Result, WeatherWiseError};

/// Services shared by every request
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProbabilityEngine>,
    pub current: Arc<CurrentConditionsResolver>,
    pub geocoder: Arc<GeocodingClient>,
}

impl AppState {
    /// Wires the HTTP-backed sources and caches described by `config`.
    pub fn from_config(config: &WeatherWiseConfig) -> Result<Self> {
        let random = Arc::new(ThreadRandom);
        let engine = ProbabilityEngine::with_settings(
            Arc::new(OpenMeteoArchiveClient::new(&config.sources)?),
            Cache::unbounded(),
            random.clone(),
            config.estimation.clone(),
        );
        let current = CurrentConditionsResolver::new(
            Arc::new(OpenWeatherMapClient::new(&config.sources)?),
            Cache::with_ttl(config.cache.current_ttl()),
            random,
        );
        Ok(Self {
            engine: Arc::new(engine),
            current: Arc::new(current),
            geocoder: Arc::new(GeocodingClient::new(&config.sources)?),
        })
    }

    /// Probabilities, current conditions and their interpretation for one
    /// coordinate and date.
    pub async fn report(
        &self,
        coordinate: Coordinate,
        date: NaiveDate,
        activity: Option<Activity>,
    ) -> EstimateReport {
        let (probabilities, current) = tokio::join!(
            self.engine.estimate(coordinate, date),
            self.current.current(coordinate)
        );
        EstimateReport::new(coordinate, date, probabilities, current, activity)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionSummary {
    pub condition: ConditionKey,
    pub probability: u8,
    pub level: ProbabilityLevel,
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport {
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    pub climate_zone: ClimateZone,
    pub probabilities: ProbabilityVector,
    pub risk_level: RiskLevel,
    pub conditions: Vec<ConditionSummary>,
    pub recommendation: String,
    pub current: WeatherSnapshot,
}

impl EstimateReport {
    fn new(
        coordinate: Coordinate,
        date: NaiveDate,
        probabilities: ProbabilityVector,
        current: WeatherSnapshot,
        activity: Option<Activity>,
    ) -> Self {
        let climate_zone = ClimateZone::for_coordinate(&coordinate);
        let thresholds = Thresholds::for_zone(climate_zone);
        let conditions = probabilities
            .iter()
            .map(|(condition, probability)| ConditionSummary {
                condition,
                probability,
                level: ProbabilityLevel::from_percent(probability),
                description: describe(condition, probability, &thresholds),
            })
            .collect();

        Self {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
            date,
            climate_zone,
            risk_level: RiskLevel::from_vector(&probabilities),
            recommendation: recommendation(&probabilities, activity, Some(&current)),
            conditions,
            probabilities,
            current,
        }
    }
}

/// Error body returned to HTTP clients
pub struct ApiError(WeatherWiseError);

impl From<WeatherWiseError> for ApiError {
    fn from(err: WeatherWiseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WeatherWiseError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            err if err.is_environmental() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct ProbabilityQuery {
    pub lat: f64,
    pub lon: f64,
    pub date: String,
    pub activity: Option<String>,
}

#[derive(Deserialize)]
pub struct CoordinateQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub q: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/probabilities", get(get_probabilities))
        .route("/current", get(get_current))
        .route("/geocode", get(get_geocode))
        .route("/reverse", get(get_reverse))
        .with_state(state)
}

async fn get_probabilities(
    State(state): State<AppState>,
    Query(query): Query<ProbabilityQuery>,
) -> std::result::Result<Json<EstimateReport>, ApiError> {
    let coordinate = Coordinate::new(query.lat, query.lon)?;
    let date = parse_date(&query.date)?;
    let activity = query
        .activity
        .as_deref()
        .map(str::parse::<Activity>)
        .transpose()?;
    Ok(Json(state.report(coordinate, date, activity).await))
}

async fn get_current(
    State(state): State<AppState>,
    Query(query): Query<CoordinateQuery>,
) -> std::result::Result<Json<WeatherSnapshot>, ApiError> {
    let coordinate = Coordinate::new(query.lat, query.lon)?;
    Ok(Json(state.current.current(coordinate).await))
}

async fn get_geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> std::result::Result<Json<GeocodedPlace>, ApiError> {
    Ok(Json(state.geocoder.geocode(&query.q).await?))
}

async fn get_reverse(
    State(state): State<AppState>,
    Query(query): Query<CoordinateQuery>,
) -> std::result::Result<Json<serde_json::Value>, ApiError> {
    let coordinate = Coordinate::new(query.lat, query.lon)?;
    let name = state.geocoder.reverse(coordinate).await;
    Ok(Json(json!({ "name": name })))
}
