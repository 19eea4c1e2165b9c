//! Simple Moving Average (SMA).
//!
//! Rolling mean over a trailing window of `period` values.
//! Lookback: period - 1 (first defined value at index period-1).

use super::{Column, Indicator};
use crate::domain::Bar;

/// Which bar field the SMA averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmaSource {
    Close,
    Volume,
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    source: SmaSource,
    name: String,
}

impl Sma {
    /// SMA of closing prices.
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            source: SmaSource::Close,
            name: format!("sma_{period}"),
        }
    }

    /// SMA of volume.
    pub fn volume(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            source: SmaSource::Volume,
            name: format!("volume_sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Column {
        let values: Vec<f64> = match self.source {
            SmaSource::Close => bars.iter().map(|b| b.close).collect(),
            SmaSource::Volume => bars.iter().map(|b| b.volume).collect(),
        };
        sma_of_series(&values, self.period)
    }
}

/// Rolling mean of `values` over `period` positions.
///
/// The window sum is rolled forward and re-summed every `period` steps so
/// that rounding error from add/subtract cannot accumulate over long series.
pub fn sma_of_series(values: &[f64], period: usize) -> Column {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period {
        return result;
    }

    let width = period as f64;
    let mut sum: f64 = values[..period].iter().sum();
    result[period - 1] = Some(sum / width);

    for i in period..n {
        if (i + 1) % period == 0 {
            sum = values[(i + 1 - period)..=i].iter().sum();
        } else {
            sum += values[i] - values[i - period];
        }
        result[i] = Some(sum / width);
    }

    result
}
