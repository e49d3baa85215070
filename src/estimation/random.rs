//! Injectable randomness

use rand::RngExt;
use std::sync::Mutex;

/// Source of uniform samples used for jitter and synthesized weather
pub trait RandomSource: Send + Sync {
    /// A sample in `[0, 1)`
    fn next_unit(&self) -> f64;

    /// A sample in `[low, high)`
    fn uniform(&self, low: f64, high: f64) -> f64 {
        low + self.next_unit() * (high - low)
    }
}

/// Thread-local generator from `rand`
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Replays a fixed list of unit samples, cycling when exhausted
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    position: Mutex<usize>,
}

impl SequenceRandom {
    /// Every value is clamped into `[0, 1)`. An empty list behaves like `[0.5]`.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() {
            vec![0.5]
        } else {
            values
                .into_iter()
                .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
                .collect()
        };
        Self {
            values,
            position: Mutex::new(0),
        }
    }

    /// Always returns `value`
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        let mut position = self
            .position
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let value = self.values[*position % self.values.len()];
        *position += 1;
        value
    }
}
