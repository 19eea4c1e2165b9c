//! Indicator implementations.
//!
//! Every indicator is a pure function from a value slice to a column of the
//! same length. Positions inside the warm-up prefix are `None`; everything
//! after it is `Some(finite)`. The pipeline in `engine` calls the slice
//! functions directly; the [`Indicator`] trait wraps them over `&[Bar]` so
//! that each output column can be tested on its own.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate named
//! instances per output line, keeping the single-column trait unchanged.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger_bands, Bollinger, BollingerBand, BollingerColumns};
pub use ema::{ema_of_series, Ema};
pub use macd::{macd_of_series, Macd, MacdColumns, MacdLine};
pub use rsi::{rsi_of_series, Rsi};
pub use sma::{sma_of_series, Sma, SmaSource};

use crate::domain::Bar;

/// One derived column, optionally undefined at the start.
pub type Column = Vec<Option<f64>>;

/// Trait for single-column indicators.
///
/// # Look-ahead contamination guard
/// No value at position t may depend on bars after t. Every indicator must
/// pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Length of the undefined warm-up prefix.
    fn lookback(&self) -> usize;

    /// Compute the column for the whole bar sequence.
    ///
    /// Returns exactly `bars.len()` values; the first `min(lookback, len)` are
    /// `None`.
    fn compute(&self, bars: &[Bar]) -> Column;
}

/// Create synthetic bars from close prices for testing.
///
/// Open = previous close (or close for the first bar), high/low one unit
/// outside the open/close range, volume = 1000, one bar per day.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.0),
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Unwrap a defined value, failing the test with its position otherwise.
#[cfg(test)]
pub fn defined(column: &[Option<f64>], i: usize) -> f64 {
    column[i].unwrap_or_else(|| panic!("expected a defined value at index {i}"))
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
