//! Indicator columns before trimming, and dense rows after.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::Column;

/// Every indicator column for one series, aligned with its bars.
///
/// All eleven fields are always present; `None` marks a warm-up position.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorColumns {
    pub sma_short: Column,
    pub sma_long: Column,
    pub rsi: Column,
    pub ema_fast: Column,
    pub ema_slow: Column,
    pub macd: Column,
    pub signal_line: Column,
    pub middle_band: Column,
    pub upper_band: Column,
    pub lower_band: Column,
    pub volume_sma: Column,
}

impl IndicatorColumns {
    /// Columns in label order (see `IndicatorConfig::column_labels`).
    pub fn as_array(&self) -> [&Column; 11] {
        [
            &self.sma_short,
            &self.sma_long,
            &self.rsi,
            &self.ema_fast,
            &self.ema_slow,
            &self.macd,
            &self.signal_line,
            &self.middle_band,
            &self.upper_band,
            &self.lower_band,
            &self.volume_sma,
        ]
    }

    /// Number of positions (equal to the bar count of the source series).
    pub fn len(&self) -> usize {
        self.sma_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The dense row at `index`, or `None` if any column is undefined there.
    pub fn row(&self, index: usize) -> Option<IndicatorSet> {
        Some(IndicatorSet {
            sma_short: self.sma_short.get(index).copied()??,
            sma_long: self.sma_long.get(index).copied()??,
            rsi: self.rsi.get(index).copied()??,
            ema_fast: self.ema_fast.get(index).copied()??,
            ema_slow: self.ema_slow.get(index).copied()??,
            macd: self.macd.get(index).copied()??,
            signal_line: self.signal_line.get(index).copied()??,
            middle_band: self.middle_band.get(index).copied()??,
            upper_band: self.upper_band.get(index).copied()??,
            lower_band: self.lower_band.get(index).copied()??,
            volume_sma: self.volume_sma.get(index).copied()??,
        })
    }
}

/// Fully defined indicator values for one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma_short: f64,
    pub sma_long: f64,
    pub rsi: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub signal_line: f64,
    pub middle_band: f64,
    pub upper_band: f64,
    pub lower_band: f64,
    pub volume_sma: f64,
}

impl IndicatorSet {
    /// Values in label order (see `IndicatorConfig::column_labels`).
    pub fn values(&self) -> [f64; 11] {
        [
            self.sma_short,
            self.sma_long,
            self.rsi,
            self.ema_fast,
            self.ema_slow,
            self.macd,
            self.signal_line,
            self.middle_band,
            self.upper_band,
            self.lower_band,
            self.volume_sma,
        ]
    }
}

/// A bar together with its indicator values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBar {
    #[serde(flatten)]
    pub bar: Bar,
    pub indicators: IndicatorSet,
}

/// Output of the pipeline: the rows of a series for which every indicator is
/// defined. Always a contiguous suffix of the input; may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSeries {
    pub symbol: String,
    pub rows: Vec<EnrichedBar>,
}

impl EnrichedSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&EnrichedBar> {
        self.rows.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns_with(len: usize, fill: Option<f64>) -> IndicatorColumns {
        let col = vec![fill; len];
        IndicatorColumns {
            sma_short: col.clone(),
            sma_long: col.clone(),
            rsi: col.clone(),
            ema_fast: col.clone(),
            ema_slow: col.clone(),
            macd: col.clone(),
            signal_line: col.clone(),
            middle_band: col.clone(),
            upper_band: col.clone(),
            lower_band: col.clone(),
            volume_sma: col,
        }
    }

    #[test]
    fn row_defined_when_all_columns_defined() {
        let cols = columns_with(2, Some(1.5));
        let row = cols.row(1).unwrap();
        assert!(row.values().iter().all(|&v| v == 1.5));
    }

    #[test]
    fn row_undefined_when_one_column_missing() {
        let mut cols = columns_with(2, Some(1.5));
        cols.volume_sma[1] = None;
        assert!(cols.row(1).is_none());
        assert!(cols.row(0).is_some());
    }

    #[test]
    fn row_out_of_range() {
        let cols = columns_with(2, Some(1.0));
        assert!(cols.row(2).is_none());
    }

    #[test]
    fn as_array_matches_values_order() {
        let mut cols = columns_with(1, Some(0.0));
        cols.rsi[0] = Some(3.0);
        cols.lower_band[0] = Some(9.0);
        let row = cols.row(0).unwrap();
        let arr = cols.as_array();
        for (i, v) in row.values().iter().enumerate() {
            assert_eq!(arr[i][0], Some(*v));
        }
    }
}
