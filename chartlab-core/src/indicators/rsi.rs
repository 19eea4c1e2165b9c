//! Relative Strength Index (RSI).
//!
//! Average gain and average loss are smoothed with the same EMA recurrence as
//! MACD (alpha = 2 / (period + 1)), seeded at the first price change. This is
//! not Wilder's seed (mean of the first `period` changes); values differ from
//! the textbook RSI during the first few dozen bars.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: 1 (the first bar has no prior close).
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; both 0 → 50.

use super::ema::ema_from;
use super::{Column, Indicator};
use crate::domain::Bar;

/// RSI reported when there has been no price movement at all.
pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Column {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        rsi_of_series(&closes, self.period)
    }
}

/// RSI of a close series. Index 0 is always undefined.
pub fn rsi_of_series(closes: &[f64], period: usize) -> Column {
    let n = closes.len();
    if n < 2 {
        return vec![None; n];
    }

    // Index 0 stays 0.0 and is never read: ema_from seeds at index 1.
    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];
    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        gains[i] = delta.max(0.0);
        losses[i] = (-delta).max(0.0);
    }

    let avg_gain = ema_from(&gains, 1, period);
    let avg_loss = ema_from(&losses, 1, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(g, l)| Some(rsi_value(g?, l?)))
        .collect()
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        NEUTRAL_RSI
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        let rsi = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        rsi.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, defined, make_bars};

    #[test]
    fn rsi_first_bar_undefined() {
        let result = rsi_of_series(&[100.0, 101.0, 100.5], 14);
        assert_eq!(result[0], None);
        assert!(result[1].is_some());
        assert!(result[2].is_some());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&bars);
        for i in 1..6 {
            assert_eq!(result[i], Some(100.0));
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let result = rsi_of_series(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0], 3);
        for i in 1..6 {
            assert_eq!(result[i], Some(0.0));
        }
    }

    #[test]
    fn rsi_flat_is_neutral() {
        let result = rsi_of_series(&[10.0; 30], 14);
        assert_eq!(result[0], None);
        for i in 1..30 {
            assert_eq!(result[i], Some(NEUTRAL_RSI));
        }
    }

    #[test]
    fn rsi_seeds_at_first_change() {
        // period=3 → alpha=0.5
        // Changes: +1, -2, +0.5
        // gains:  1, 0, 0.5   → avg_gain: 1, 0.5, 0.5
        // losses: 0, 2, 0     → avg_loss: 0, 1, 0.5
        // RSI[1]: loss 0 → 100
        // RSI[2]: RS = 0.5       → 100 - 100/1.5 = 33.333...
        // RSI[3]: RS = 1         → 50
        let result = rsi_of_series(&[10.0, 11.0, 9.0, 9.5], 3);
        assert_eq!(result[1], Some(100.0));
        assert_approx(defined(&result, 2), 100.0 / 3.0, 1e-9);
        assert_approx(defined(&result, 3), 50.0, 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let result = rsi_of_series(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0], 3);
        for (i, v) in result.iter().enumerate().skip(1) {
            let v = v.unwrap();
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds at bar {i}: {v}");
        }
    }

    #[test]
    fn rsi_short_inputs() {
        assert!(rsi_of_series(&[], 14).is_empty());
        assert_eq!(rsi_of_series(&[10.0], 14), vec![None]);
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 1);
        assert_eq!(Rsi::new(14).name(), "rsi_14");
    }
}
