//! Moving Average Convergence Divergence (MACD).
//!
//! - Fast EMA: EMA(close, fast)
//! - Slow EMA: EMA(close, slow)
//! - MACD line: fast - slow
//! - Signal line: EMA(MACD line, signal)
//!
//! Every EMA is seeded at the first value, so all four lines are defined from
//! the first bar. Lookback: 0.

use super::ema::ema_of_series;
use super::{Column, Indicator};
use crate::domain::Bar;

/// All four MACD output lines, aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdColumns {
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Compute MACD lines. Each step depends on the previous one, in the order
/// fast EMA, slow EMA, MACD, signal.
pub fn macd_of_series(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdColumns {
    let ema_fast = ema_of_series(closes, fast);
    let ema_slow = ema_of_series(closes, slow);
    let macd: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema_of_series(&macd, signal);
    MacdColumns {
        ema_fast,
        ema_slow,
        macd,
        signal,
    }
}

/// Which MACD output an [`Macd`] instance exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdLine::Macd)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdLine::Signal)
    }

    fn build(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(
            fast >= 1 && slow >= 1 && signal >= 1,
            "MACD spans must be >= 1"
        );
        let prefix = match line {
            MacdLine::Macd => "macd",
            MacdLine::Signal => "macd_signal",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("{prefix}_{fast}_{slow}_{signal}"),
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Column {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let columns = macd_of_series(&closes, self.fast, self.slow, self.signal);
        let line = match self.line {
            MacdLine::Macd => columns.macd,
            MacdLine::Signal => columns.signal,
        };
        line.into_iter().map(Some).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn macd_is_difference_of_emas() {
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.3).cos() * 4.0).collect();
        let cols = macd_of_series(&closes, 12, 26, 9);
        for i in 0..closes.len() {
            assert_approx(cols.macd[i], cols.ema_fast[i] - cols.ema_slow[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn macd_starts_at_zero() {
        let cols = macd_of_series(&[10.0, 12.0, 11.0], 12, 26, 9);
        assert_eq!(cols.macd[0], 0.0);
        assert_eq!(cols.signal[0], 0.0);
    }

    #[test]
    fn signal_is_ema_of_macd() {
        let closes = [10.0, 11.0, 13.0, 12.0, 15.0];
        let cols = macd_of_series(&closes, 2, 4, 3);
        let expected = ema_of_series(&cols.macd, 3);
        assert_eq!(cols.signal, expected);
    }

    #[test]
    fn macd_flat_prices_is_zero() {
        let cols = macd_of_series(&[25.0; 40], 12, 26, 9);
        assert!(cols.macd.iter().all(|v| v.abs() < DEFAULT_EPSILON));
        assert!(cols.signal.iter().all(|v| v.abs() < DEFAULT_EPSILON));
    }

    #[test]
    fn macd_indicator_lines() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let line = Macd::line(12, 26, 9).compute(&bars);
        let signal = Macd::signal(12, 26, 9).compute(&bars);
        assert_eq!(line.len(), 4);
        assert!(line.iter().all(|v| v.is_some()));
        assert!(signal.iter().all(|v| v.is_some()));
        assert!(line[3].unwrap() > 0.0);
    }

    #[test]
    fn macd_empty_input() {
        let cols = macd_of_series(&[], 12, 26, 9);
        assert!(cols.macd.is_empty());
        assert!(cols.signal.is_empty());
    }

    #[test]
    fn macd_names() {
        assert_eq!(Macd::line(12, 26, 9).name(), "macd_12_26_9");
        assert_eq!(Macd::signal(12, 26, 9).name(), "macd_signal_12_26_9");
    }
}
