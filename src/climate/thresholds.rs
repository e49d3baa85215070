//! Per-zone exceedance thresholds

use serde::{Deserialize, Serialize};

use super::ClimateZone;

/// Thresholds above (or below, for cold) which a day counts as extreme
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    /// Daily maximum temperature in Celsius
    pub very_hot: f64,
    /// Daily minimum temperature in Celsius
    pub very_cold: f64,
    /// Daily maximum wind speed in m/s
    pub very_windy: f64,
    /// Daily precipitation sum in mm
    pub very_wet: f64,
}

impl Thresholds {
    /// Thresholds tuned to a climate zone
    #[must_use]
    pub fn for_zone(zone: ClimateZone) -> Self {
        match zone {
            ClimateZone::Tropical => Self {
                very_hot: 35.0,
                very_cold: 18.0,
                very_windy: 8.0,
                very_wet: 20.0,
            },
            ClimateZone::Arid => Self {
                very_hot: 38.0,
                very_cold: 5.0,
                very_windy: 9.0,
                very_wet: 5.0,
            },
            ClimateZone::Temperate => Self::default(),
            ClimateZone::Continental => Self {
                very_hot: 28.0,
                very_cold: -5.0,
                very_windy: 7.0,
                very_wet: 8.0,
            },
        }
    }
}

impl Default for Thresholds {
    /// Temperate baseline
    fn default() -> Self {
        Self {
            very_hot: 32.0,
            very_cold: 0.0,
            very_windy: 7.0,
            very_wet: 10.0,
        }
    }
}
