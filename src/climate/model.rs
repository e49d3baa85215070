//! Static monthly climate model
//!
//! One row per condition, one column per month (January first). Months follow
//! the Northern-Hemisphere convention for every zone. The table is the single
//! source of truth for fallback estimation.

use serde::Serialize;

use super::ClimateZone;

struct ZoneTable {
    hot: [u8; 12],
    cold: [u8; 12],
    windy: [u8; 12],
    wet: [u8; 12],
}

const TROPICAL: ZoneTable = ZoneTable {
    hot: [65, 70, 75, 80, 85, 80, 75, 70, 65, 60, 55, 60],
    cold: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    windy: [15, 15, 20, 25, 30, 35, 40, 35, 30, 25, 20, 15],
    wet: [5, 5, 10, 15, 25, 50, 70, 65, 45, 20, 10, 5],
};

const ARID: ZoneTable = ZoneTable {
    hot: [55, 60, 70, 80, 90, 95, 98, 95, 85, 75, 65, 55],
    cold: [5, 3, 1, 0, 0, 0, 0, 0, 0, 1, 3, 5],
    windy: [40, 35, 30, 25, 20, 15, 10, 15, 25, 35, 40, 45],
    wet: [2, 2, 3, 5, 3, 1, 1, 1, 1, 2, 2, 2],
};

const TEMPERATE: ZoneTable = ZoneTable {
    hot: [0, 0, 5, 15, 25, 35, 40, 35, 25, 10, 0, 0],
    cold: [40, 35, 20, 5, 0, 0, 0, 0, 0, 5, 20, 35],
    windy: [45, 40, 35, 30, 25, 20, 15, 20, 25, 35, 40, 45],
    wet: [25, 20, 25, 30, 35, 40, 35, 30, 25, 30, 25, 30],
};

const CONTINENTAL: ZoneTable = ZoneTable {
    hot: [0, 0, 0, 5, 15, 25, 30, 25, 15, 5, 0, 0],
    cold: [85, 80, 70, 40, 15, 5, 0, 0, 5, 25, 60, 80],
    windy: [35, 30, 25, 20, 15, 10, 5, 10, 15, 25, 30, 35],
    wet: [20, 15, 20, 25, 30, 35, 40, 35, 30, 25, 20, 25],
};

/// Pre-jitter base probabilities for one zone and month
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct BaseProbabilities {
    pub hot: u8,
    pub cold: u8,
    pub windy: u8,
    pub wet: u8,
}

impl BaseProbabilities {
    /// `round((hot + wet + windy) / 3)`
    #[must_use]
    pub fn uncomfortable(&self) -> u8 {
        let sum = f64::from(self.hot) + f64::from(self.wet) + f64::from(self.windy);
        (sum / 3.0).round() as u8
    }

    /// Values in `ConditionKey::ALL` order
    #[must_use]
    pub fn as_array(&self) -> [f64; 5] {
        [
            f64::from(self.hot),
            f64::from(self.cold),
            f64::from(self.windy),
            f64::from(self.wet),
            f64::from(self.uncomfortable()),
        ]
    }
}

/// Look up the base probabilities for `zone` in zero-based `month0`.
/// Months past December wrap around.
#[must_use]
pub fn base_probabilities(zone: ClimateZone, month0: u32) -> BaseProbabilities {
    let table = match zone {
        ClimateZone::Tropical => &TROPICAL,
        ClimateZone::Arid => &ARID,
        ClimateZone::Temperate => &TEMPERATE,
        ClimateZone::Continental => &CONTINENTAL,
    };
    let m = (month0 % 12) as usize;
    BaseProbabilities {
        hot: table.hot[m],
        cold: table.cold[m],
        windy: table.windy[m],
        wet: table.wet[m],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arid_july_peaks_hot() {
        let july = base_probabilities(ClimateZone::Arid, 6);
        assert_eq!(july.hot, 98);
        assert_eq!(july.windy, 10);
        assert_eq!(july.wet, 1);
        assert_eq!(july.uncomfortable(), 36);
    }

    #[test]
    fn test_continental_january_is_cold() {
        let january = base_probabilities(ClimateZone::Continental, 0);
        assert_eq!(january.cold, 85);
        assert_eq!(january.hot, 0);
        assert_eq!(january.uncomfortable(), 18);
    }

    #[test]
    fn test_month_wraps() {
        assert_eq!(
            base_probabilities(ClimateZone::Temperate, 12),
            base_probabilities(ClimateZone::Temperate, 0)
        );
    }

    #[test]
    fn test_table_values_are_percentages() {
        for zone in [
            ClimateZone::Tropical,
            ClimateZone::Arid,
            ClimateZone::Temperate,
            ClimateZone::Continental,
        ] {
            for month in 0..12 {
                let base = base_probabilities(zone, month);
                assert!(base.as_array().iter().all(|v| (0.0..=100.0).contains(v)));
            }
        }
    }
}
