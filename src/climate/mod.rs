//! Climate knowledge used by the estimation engine
//!
//! - Zone: latitude-band classification
//! - Thresholds: per-zone exceedance thresholds
//! - Model: static monthly base probabilities per zone

pub mod model;
pub mod thresholds;
pub mod zone;

pub use model::{BaseProbabilities, base_probabilities};
pub use thresholds::Thresholds;
pub use zone::ClimateZone;
