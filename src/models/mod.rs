//! Data models for the WeatherWise engine
//!
//! This module contains the core domain models organized by concern:
//! - Location: validated geographic coordinates and cache keys
//! - Probability: condition keys, provenance and probability vectors
//! - Weather: daily historical records and current-conditions snapshots

pub mod location;
pub mod probability;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinate, parse_date};
pub use probability::{ConditionKey, DataSource, ProbabilityVector};
pub use weather::{DailyRecord, WeatherSnapshot};
