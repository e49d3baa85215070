//! Plausibility gate for reduced probability vectors

use crate::models::ProbabilityVector;

/// Any condition above this percentage is treated as degenerate
pub const MAX_PLAUSIBLE_PERCENT: u8 = 90;
/// More years than this cannot come from a real archive request
pub const MAX_PLAUSIBLE_YEARS: u32 = 100;

/// True when `vector` looks like the product of a malformed or degenerate
/// archive response and should be replaced by the climate model.
#[must_use]
pub fn is_implausible(vector: &ProbabilityVector) -> bool {
    vector.max_probability() > MAX_PLAUSIBLE_PERCENT || vector.total_years() > MAX_PLAUSIBLE_YEARS
}
