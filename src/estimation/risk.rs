//! Risk levels, condition descriptions and activity recommendations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::WeatherWiseError;
use crate::climate::Thresholds;
use crate::models::{ConditionKey, ProbabilityVector, WeatherSnapshot};

/// Overall risk, driven by the most likely extreme condition
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    #[must_use]
    pub fn from_vector(vector: &ProbabilityVector) -> Self {
        match vector.max_probability() {
            p if p < 30 => RiskLevel::Low,
            p if p < 60 => RiskLevel::Moderate,
            _ => RiskLevel::High,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Verbal band for a single probability
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProbabilityLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ProbabilityLevel {
    #[must_use]
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0..=19 => ProbabilityLevel::VeryLow,
            20..=39 => ProbabilityLevel::Low,
            40..=59 => ProbabilityLevel::Moderate,
            60..=79 => ProbabilityLevel::High,
            _ => ProbabilityLevel::VeryHigh,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbabilityLevel::VeryLow => "very low",
            ProbabilityLevel::Low => "low",
            ProbabilityLevel::Moderate => "moderate",
            ProbabilityLevel::High => "high",
            ProbabilityLevel::VeryHigh => "very high",
        }
    }
}

/// What an exceedance of `key` means under `thresholds`, e.g. "days above 32°C"
#[must_use]
pub fn condition_meaning(key: ConditionKey, thresholds: &Thresholds) -> String {
    match key {
        ConditionKey::VeryHot => format!("days above {}°C", thresholds.very_hot),
        ConditionKey::VeryCold => format!("days below {}°C", thresholds.very_cold),
        ConditionKey::VeryWindy => format!("days above {} m/s wind", thresholds.very_windy),
        ConditionKey::VeryWet => format!("days above {} mm rain", thresholds.very_wet),
        ConditionKey::VeryUncomfortable => "uncomfortable weather days".to_string(),
    }
}

/// Sentence such as "low probability of days above 32°C"
#[must_use]
pub fn describe(key: ConditionKey, percent: u8, thresholds: &Thresholds) -> String {
    format!(
        "{} probability of {}",
        ProbabilityLevel::from_percent(percent).as_str(),
        condition_meaning(key, thresholds)
    )
}

/// Outdoor activity the caller is planning
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Hiking,
    Beach,
    Fishing,
    Picnic,
    Sightseeing,
    Camping,
    Sports,
}

impl Activity {
    fn advice(&self) -> &'static str {
        match self {
            Activity::Hiking => {
                "For hiking, pay special attention to precipitation and wind conditions which can make trails dangerous."
            }
            Activity::Beach => {
                "For a beach day, temperature and precipitation are the most important factors for enjoyment."
            }
            Activity::Fishing => {
                "For fishing, wind conditions significantly impact water conditions and fish behavior."
            }
            Activity::Picnic => {
                "For a picnic, precipitation is your primary concern for comfort and food safety."
            }
            Activity::Sightseeing => {
                "For sightseeing, all weather factors can impact visibility, comfort, and photo opportunities."
            }
            Activity::Camping => {
                "For camping, consider all factors as you'll be exposed to elements for an extended period."
            }
            Activity::Sports => {
                "For outdoor sports, wind and precipitation are particularly important for performance and safety."
            }
        }
    }
}

impl FromStr for Activity {
    type Err = WeatherWiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hiking" => Ok(Activity::Hiking),
            "beach" => Ok(Activity::Beach),
            "fishing" => Ok(Activity::Fishing),
            "picnic" => Ok(Activity::Picnic),
            "sightseeing" => Ok(Activity::Sightseeing),
            "camping" => Ok(Activity::Camping),
            "sports" => Ok(Activity::Sports),
            other => Err(WeatherWiseError::invalid_input(format!(
                "unknown activity '{other}'"
            ))),
        }
    }
}

/// Plain-language recommendation from the average condition probability,
/// optional activity advice and, when live, the current conditions.
#[must_use]
pub fn recommendation(
    vector: &ProbabilityVector,
    activity: Option<Activity>,
    current: Option<&WeatherSnapshot>,
) -> String {
    let average = vector.iter().map(|(_, p)| f64::from(p)).sum::<f64>()
        / ConditionKey::ALL.len() as f64;

    let mut text = String::from("Based on historical weather patterns, ");
    if average < 25.0 {
        text.push_str("conditions are typically excellent for outdoor activities.");
    } else if average < 50.0 {
        text.push_str(
            "conditions are usually favorable, but be prepared for potential weather changes.",
        );
    } else {
        text.push_str(
            "there's a significant chance of adverse conditions. Consider having a backup plan.",
        );
    }

    if let Some(activity) = activity {
        text.push(' ');
        text.push_str(activity.advice());
    }

    if let Some(snapshot) = current.filter(|s| !s.is_fallback) {
        text.push_str(&format!(
            " Current conditions: {}, {}.",
            snapshot.description.to_lowercase(),
            snapshot.format_temperature()
        ));
    }

    text
}
