//! Latitude-band climate zone classification

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Coordinate;
use crate::{Result, WeatherWiseError};

/// Upper bound (exclusive) of the tropical band in absolute degrees
const TROPICAL_LIMIT: f64 = 23.5;
/// Upper bound (exclusive) of the arid band
const ARID_LIMIT: f64 = 35.0;
/// Upper bound (exclusive) of the temperate band
const TEMPERATE_LIMIT: f64 = 50.0;

/// Coarse climate zone derived from absolute latitude
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ClimateZone {
    Tropical,
    Arid,
    Temperate,
    Continental,
}

impl ClimateZone {
    /// Classify a latitude. Bands are half-open on `|latitude|`:
    /// `[0, 23.5)` tropical, `[23.5, 35)` arid, `[35, 50)` temperate,
    /// `[50, 90]` continental.
    ///
    /// Latitudes outside `[-90, 90]` (and NaN) are rejected rather than clamped.
    pub fn classify(latitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherWiseError::invalid_input(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        Ok(Self::from_abs_latitude(latitude.abs()))
    }

    /// Zone of an already validated coordinate
    #[must_use]
    pub fn for_coordinate(coordinate: &Coordinate) -> Self {
        Self::from_abs_latitude(coordinate.latitude().abs())
    }

    fn from_abs_latitude(abs_latitude: f64) -> Self {
        if abs_latitude < TROPICAL_LIMIT {
            ClimateZone::Tropical
        } else if abs_latitude < ARID_LIMIT {
            ClimateZone::Arid
        } else if abs_latitude < TEMPERATE_LIMIT {
            ClimateZone::Temperate
        } else {
            ClimateZone::Continental
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ClimateZone::Tropical => "Tropical",
            ClimateZone::Arid => "Arid",
            ClimateZone::Temperate => "Temperate",
            ClimateZone::Continental => "Continental",
        }
    }
}

impl fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
