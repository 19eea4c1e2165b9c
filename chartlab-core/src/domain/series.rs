//! Series: a validated, ordered bar sequence for one security.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use super::bar::Bar;

/// Input-contract violations detected by [`Series::new`].
///
/// The engine never computes over a series that fails these checks, so NaN
/// and infinity cannot leak into indicator columns.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index}: timestamp {timestamp} is not after previous timestamp {previous}")]
    NonIncreasingTimestamp {
        index: usize,
        previous: NaiveDateTime,
        timestamp: NaiveDateTime,
    },

    #[error("bar {index}: {field} is not finite ({value})")]
    NonFinite {
        index: usize,
        field: &'static str,
        value: f64,
    },

    #[error("bar {index}: {field} is negative ({value})")]
    Negative {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// Ordered OHLCV history for one symbol.
///
/// Fields are private: the only way to obtain a `Series` is through
/// [`Series::new`], which enforces strictly increasing timestamps and finite,
/// non-negative values. An empty series is valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        validate_bars(&bars)?;
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Keep only bars at or after `start`. The result is still valid since a
    /// suffix of a valid series is valid.
    pub fn since(&self, start: NaiveDateTime) -> Self {
        let first = self.bars.partition_point(|b| b.timestamp < start);
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars[first..].to_vec(),
        }
    }

    /// Keep only bars strictly after `cutoff`.
    pub fn after(&self, cutoff: NaiveDateTime) -> Self {
        let first = self.bars.partition_point(|b| b.timestamp <= cutoff);
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars[first..].to_vec(),
        }
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.last().map(|b| b.timestamp)
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

fn validate_bars(bars: &[Bar]) -> Result<(), SeriesError> {
    for (index, bar) in bars.iter().enumerate() {
        for (field, value) in bar.fields() {
            if !value.is_finite() {
                return Err(SeriesError::NonFinite {
                    index,
                    field,
                    value,
                });
            }
            if value < 0.0 {
                return Err(SeriesError::Negative {
                    index,
                    field,
                    value,
                });
            }
        }

        if index > 0 {
            let previous = bars[index - 1].timestamp;
            if bar.timestamp <= previous {
                return Err(SeriesError::NonIncreasingTimestamp {
                    index,
                    previous,
                    timestamp: bar.timestamp,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn accepts_valid_bars() {
        let series = Series::new("SPY", make_bars(&[10.0, 11.0, 12.0])).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.symbol(), "SPY");
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn accepts_empty() {
        let series = Series::new("SPY", Vec::new()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn rejects_duplicate_timestamp() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[2].timestamp = bars[1].timestamp;
        let err = Series::new("SPY", bars).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::NonIncreasingTimestamp { index: 2, .. }
        ));
    }

    #[test]
    fn rejects_decreasing_timestamp() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars.swap(0, 1);
        let err = Series::new("SPY", bars).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::NonIncreasingTimestamp { index: 1, .. }
        ));
    }

    #[test]
    fn rejects_nan_close() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[1].close = f64::NAN;
        let err = Series::new("SPY", bars).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::NonFinite {
                index: 1,
                field: "close",
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_volume() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0]);
        bars[0].volume = -5.0;
        let err = Series::new("SPY", bars).unwrap_err();
        assert_eq!(
            err,
            SeriesError::Negative {
                index: 0,
                field: "volume",
                value: -5.0
            }
        );
    }

    #[test]
    fn error_message_names_bar_and_field() {
        let mut bars = make_bars(&[10.0, 11.0]);
        bars[1].open = f64::INFINITY;
        let err = Series::new("SPY", bars).unwrap_err();
        assert_eq!(err.to_string(), "bar 1: open is not finite (inf)");
    }

    #[test]
    fn since_keeps_suffix() {
        let series = Series::new("SPY", make_bars(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        let cutoff = series.bars()[2].timestamp;
        let tail = series.since(cutoff);
        assert_eq!(tail.closes(), vec![3.0, 4.0]);
        assert_eq!(tail.symbol(), "SPY");
    }

    #[test]
    fn after_excludes_cutoff() {
        let series = Series::new("SPY", make_bars(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        let cutoff = series.bars()[2].timestamp;
        assert_eq!(series.after(cutoff).closes(), vec![4.0]);
        assert_eq!(series.last_timestamp(), Some(series.bars()[3].timestamp));
    }
}
