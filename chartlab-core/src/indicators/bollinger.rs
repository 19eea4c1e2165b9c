//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1), so a window needs at least two
//! values. `bollinger_bands` leaves the outer bands undefined for a window of
//! one; the `Bollinger` constructors reject it.
//! Lookback: period - 1.

use super::{Column, Indicator};
use crate::domain::Bar;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

/// Middle, upper and lower bands plus the rolling stddev they were built from.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerColumns {
    pub middle: Column,
    pub upper: Column,
    pub lower: Column,
    pub stddev: Column,
}

pub fn bollinger_bands(closes: &[f64], period: usize, multiplier: f64) -> BollingerColumns {
    let n = closes.len();
    let mut cols = BollingerColumns {
        middle: vec![None; n],
        upper: vec![None; n],
        lower: vec![None; n],
        stddev: vec![None; n],
    };

    if period == 0 || n < period {
        return cols;
    }

    for i in (period - 1)..n {
        let window = &closes[(i + 1 - period)..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        cols.middle[i] = Some(mean);

        if period < 2 {
            continue;
        }
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (period - 1) as f64;
        let stddev = variance.sqrt();

        cols.stddev[i] = Some(stddev);
        cols.upper[i] = Some(mean + multiplier * stddev);
        cols.lower[i] = Some(mean - multiplier * stddev);
    }

    cols
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Lower)
    }

    fn build(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2 (sample stddev)");
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Column {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let cols = bollinger_bands(&closes, self.period, self.multiplier);
        match self.band {
            BollingerBand::Upper => cols.upper,
            BollingerBand::Middle => cols.middle,
            BollingerBand::Lower => cols.lower,
        }
    }
}
