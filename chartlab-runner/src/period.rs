//! Lookback periods: trailing calendar windows ending at the last bar.

use chartlab_core::Series;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much history to keep, measured back from the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LookbackPeriod {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    #[default]
    Max,
}

impl LookbackPeriod {
    pub const ALL: [LookbackPeriod; 11] = [
        Self::OneDay,
        Self::FiveDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::TenYears,
        Self::YearToDate,
        Self::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }

    /// Bars at or before the returned instant fall outside the period.
    ///
    /// `None` for `Max`. Year-to-date keeps everything from January 1st of the
    /// last bar's year.
    fn cutoff(&self, last: NaiveDateTime) -> Option<NaiveDateTime> {
        let months = |n: u32| last.checked_sub_months(Months::new(n));
        match self {
            Self::OneDay => Some(last - Duration::days(1)),
            Self::FiveDays => Some(last - Duration::days(5)),
            Self::OneMonth => months(1),
            Self::ThreeMonths => months(3),
            Self::SixMonths => months(6),
            Self::OneYear => months(12),
            Self::TwoYears => months(24),
            Self::FiveYears => months(60),
            Self::TenYears => months(120),
            Self::YearToDate => NaiveDate::from_ymd_opt(last.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|start| start - Duration::nanoseconds(1)),
            Self::Max => None,
        }
    }

    /// Restrict a series to this period.
    pub fn apply(&self, series: &Series) -> Series {
        match series.last_timestamp().and_then(|last| self.cutoff(last)) {
            Some(cutoff) => series.after(cutoff),
            None => series.clone(),
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookbackPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                let choices: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                format!("unknown period '{s}' (expected one of: {})", choices.join(", "))
            })
    }
}
