//! Probability vector and condition keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extreme-weather condition reported by the engine
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionKey {
    VeryHot,
    VeryCold,
    VeryWindy,
    VeryWet,
    /// Always derived from hot, wet and windy; never measured directly
    VeryUncomfortable,
}

impl ConditionKey {
    /// All conditions in display order
    pub const ALL: [ConditionKey; 5] = [
        ConditionKey::VeryHot,
        ConditionKey::VeryCold,
        ConditionKey::VeryWindy,
        ConditionKey::VeryWet,
        ConditionKey::VeryUncomfortable,
    ];

    /// Wire name, e.g. `very-hot`
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKey::VeryHot => "very-hot",
            ConditionKey::VeryCold => "very-cold",
            ConditionKey::VeryWindy => "very-windy",
            ConditionKey::VeryWet => "very-wet",
            ConditionKey::VeryUncomfortable => "very-uncomfortable",
        }
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a probability vector
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Reduced from the multi-year daily archive
    #[serde(rename = "NASA-OpenMeteo")]
    NasaOpenMeteo,
    /// Synthesized from the static climate model with jitter
    #[serde(rename = "Enhanced-ClimateModel")]
    EnhancedClimateModel,
}

impl DataSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::NasaOpenMeteo => "NASA-OpenMeteo",
            DataSource::EnhancedClimateModel => "Enhanced-ClimateModel",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer percentages for every condition plus provenance metadata.
///
/// Values are clamped to `0..=100` on construction and every condition is
/// always present. Serialize-only, so [`ProbabilityVector::new`] is the sole
/// way to build one.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ProbabilityVector {
    #[serde(rename = "very-hot")]
    very_hot: u8,
    #[serde(rename = "very-cold")]
    very_cold: u8,
    #[serde(rename = "very-windy")]
    very_windy: u8,
    #[serde(rename = "very-wet")]
    very_wet: u8,
    #[serde(rename = "very-uncomfortable")]
    very_uncomfortable: u8,
    #[serde(rename = "totalYears")]
    total_years: u32,
    #[serde(rename = "dataSource")]
    data_source: DataSource,
}

/// Clamp an arbitrary (possibly negative or fractional) percentage into `0..=100`
#[must_use]
pub fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

impl ProbabilityVector {
    /// Build a vector from raw percentages; each value is rounded and clamped
    #[must_use]
    pub fn new(
        values: [f64; 5],
        total_years: u32,
        data_source: DataSource,
    ) -> Self {
        let [hot, cold, windy, wet, uncomfortable] = values.map(clamp_percent);
        Self {
            very_hot: hot,
            very_cold: cold,
            very_windy: windy,
            very_wet: wet,
            very_uncomfortable: uncomfortable,
            total_years,
            data_source,
        }
    }

    /// Probability for one condition
    #[must_use]
    pub fn get(&self, key: ConditionKey) -> u8 {
        match key {
            ConditionKey::VeryHot => self.very_hot,
            ConditionKey::VeryCold => self.very_cold,
            ConditionKey::VeryWindy => self.very_windy,
            ConditionKey::VeryWet => self.very_wet,
            ConditionKey::VeryUncomfortable => self.very_uncomfortable,
        }
    }

    /// Iterate conditions and their probabilities in display order
    pub fn iter(&self) -> impl Iterator<Item = (ConditionKey, u8)> + '_ {
        ConditionKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    #[must_use]
    pub fn total_years(&self) -> u32 {
        self.total_years
    }

    #[must_use]
    pub fn data_source(&self) -> DataSource {
        self.data_source
    }

    /// Highest probability across all conditions
    #[must_use]
    pub fn max_probability(&self) -> u8 {
        self.iter().map(|(_, p)| p).max().unwrap_or(0)
    }
}
