//! Bar: the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLCV bar for one sampling period.
///
/// Volume is a share count in practice but is carried as `f64` so that it can
/// be averaged alongside prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Field names and values in column order, for validation and export.
    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
    }

    /// Returns true if any OHLCV field is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.fields().iter().any(|(_, v)| !v.is_finite())
    }

    /// Basic OHLC consistency: high is the top of the range, low the bottom.
    ///
    /// Not enforced by `Series::new`; providers occasionally emit bars that
    /// violate it and the indicators only read close and volume.
    pub fn is_consistent(&self) -> bool {
        !self.has_non_finite()
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}
