//! Derived change over the visible period.
//!
//! Distinct from the server-reported single-day change in the header: this
//! measures from the first traded point of the currently displayed series to
//! the live price, so it diverges from the day change whenever the selected
//! range spans more than one session. Both figures are kept and displayed
//! separately so neither is ever mislabeled as the other.

use crate::domain::SeriesPoint;

/// Change/percent pair derived from a series, or passed through as fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodChange {
    pub change: f64,
    pub percent: f64,
}

impl PeriodChange {
    pub const fn new(change: f64, percent: f64) -> Self {
        Self { change, percent }
    }
}

/// Starts below this are treated as no usable start at all: dividing by them
/// would only manufacture infinities.
const MIN_START_VALUE: f64 = 1e-9;

/// Compute the change from the first present point of `series` to
/// `current_price`.
///
/// Returns `fallback` unchanged when there is nothing to derive from: an
/// empty or all-gap series, an absent current price, or a zero/near-zero
/// start. No number is ever fabricated and no NaN/infinity propagated.
pub fn period_change(
    series: &[SeriesPoint],
    current_price: Option<f64>,
    fallback: PeriodChange,
) -> PeriodChange {
    let Some(current) = current_price.filter(|p| p.is_finite()) else {
        return fallback;
    };
    let Some(start) = series
        .iter()
        .find_map(|point| point.value)
        .filter(|v| v.is_finite())
    else {
        return fallback;
    };
    if start.abs() < MIN_START_VALUE {
        return fallback;
    }

    let change = current - start;
    PeriodChange::new(change, change / start * 100.0)
}
