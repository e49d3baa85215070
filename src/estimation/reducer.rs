//! Reduction of a multi-year daily series into calendar-month probabilities

use tracing::debug;

use crate::climate::Thresholds;
use crate::models::{DailyRecord, DataSource, ProbabilityVector};

/// Approximate number of days per matched month, used to estimate `totalYears`
const DAYS_PER_MONTH: usize = 30;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ExceedanceCounts {
    days: usize,
    hot: usize,
    cold: usize,
    windy: usize,
    wet: usize,
}

impl ExceedanceCounts {
    fn tally(records: &[DailyRecord], month0: u32, thresholds: &Thresholds) -> Self {
        records
            .iter()
            .filter(|record| record.month0() == month0)
            .fold(Self::default(), |mut counts, record| {
                counts.days += 1;
                if record.max_temp.is_some_and(|t| t > thresholds.very_hot) {
                    counts.hot += 1;
                }
                if record.min_temp.is_some_and(|t| t < thresholds.very_cold) {
                    counts.cold += 1;
                }
                if record.max_wind_speed > thresholds.very_windy {
                    counts.windy += 1;
                }
                if record.precipitation > thresholds.very_wet {
                    counts.wet += 1;
                }
                counts
            })
    }

    fn percent(&self, count: usize) -> f64 {
        if self.days == 0 {
            return 0.0;
        }
        (100.0 * count as f64 / self.days as f64).round()
    }

    /// Days that were hot, or half the wet-plus-windy days, whichever is larger
    fn uncomfortable(&self) -> usize {
        self.hot.max((self.wet + self.windy) / 2)
    }
}

/// Exceedance probabilities for zero-based `month0` over every year in `records`.
///
/// Only records whose calendar month equals `month0` are considered. With no
/// matching days every probability is `0` and `totalYears` is `1`.
#[must_use]
pub fn reduce(records: &[DailyRecord], month0: u32, thresholds: &Thresholds) -> ProbabilityVector {
    let counts = ExceedanceCounts::tally(records, month0, thresholds);
    debug!(?counts, "Reduced {} records for month {}", records.len(), month0);

    let total_years = u32::try_from((counts.days / DAYS_PER_MONTH).max(1)).unwrap_or(u32::MAX);

    ProbabilityVector::new(
        [
            counts.percent(counts.hot),
            counts.percent(counts.cold),
            counts.percent(counts.windy),
            counts.percent(counts.wet),
            counts.percent(counts.uncomfortable()),
        ],
        total_years,
        DataSource::NasaOpenMeteo,
    )
}
