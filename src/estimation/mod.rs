//! Probability estimation
//!
//! This module turns coordinates and dates into extreme-weather probabilities:
//! - Reducer: multi-year daily records to calendar-month exceedance rates
//! - Plausibility: rejects degenerate reductions
//! - Engine: orchestration, fallback to the climate model, jitter and caching
//! - Random: injectable randomness for the jitter
//! - Risk: overall risk level and activity recommendations

pub mod engine;
pub mod plausibility;
pub mod random;
pub mod reducer;
pub mod risk;

pub use engine::{FallbackReason, ProbabilityEngine};
pub use plausibility::is_implausible;
pub use random::{RandomSource, SequenceRandom, ThreadRandom};
pub use reducer::reduce;
pub use risk::{Activity, ProbabilityLevel, RiskLevel, describe, recommendation};
