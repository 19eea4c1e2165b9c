//! Bar loading for the runner.
//!
//! Bars come from one of two sources:
//! 1. A CSV file with `Date`/`Timestamp`, `Open`, `High`, `Low`, `Close`,
//!    `Volume` columns (headers are matched case-insensitively, extra columns
//!    are ignored)
//! 2. A deterministic synthetic random walk, seeded from the symbol name
//!
//! Synthetic data is a developer-only demo mode. Reports built on it are
//! tagged with `DataSource::Synthetic`.
//!
//! Rows are returned in file order. Ordering and value checks are left to
//! `Series::new`, which rejects the whole file with the offending row index.

use chartlab_core::Bar;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse {column} value '{value}'")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("invalid fundamentals file {path}: {source}")]
    Fundamentals {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where a symbol's bars came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Csv,
    Synthetic,
}

/// How to obtain bars for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum BarSource {
    Csv(PathBuf),
    Synthetic { start: NaiveDate, end: NaiveDate },
}

impl BarSource {
    pub fn kind(&self) -> DataSource {
        match self {
            BarSource::Csv(_) => DataSource::Csv,
            BarSource::Synthetic { .. } => DataSource::Synthetic,
        }
    }

    pub fn load(&self, symbol: &str) -> Result<Vec<Bar>, LoadError> {
        match self {
            BarSource::Csv(path) => load_csv(path),
            BarSource::Synthetic { start, end } => {
                Ok(generate_synthetic_bars(symbol, *start, *end))
            }
        }
    }
}

const TIMESTAMP_HEADERS: [&str; 3] = ["date", "timestamp", "datetime"];

/// Load bars from a CSV file on disk.
pub fn load_csv(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_bars_csv(file)
}

/// Parse bars from any CSV reader.
pub fn read_bars_csv<R: Read>(reader: R) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let find = |names: &[&'static str]| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
            .ok_or(LoadError::MissingColumn(names[0]))
    };
    let ts_idx = find(&TIMESTAMP_HEADERS)?;
    let columns = [
        ("open", find(&["open"])?),
        ("high", find(&["high"])?),
        ("low", find(&["low"])?),
        ("close", find(&["close"])?),
        ("volume", find(&["volume"])?),
    ];

    let mut bars = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let raw_ts = field(ts_idx);
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| LoadError::Parse {
            row,
            column: "timestamp",
            value: raw_ts.to_string(),
        })?;

        let mut values = [0.0; 5];
        for (slot, (column, idx)) in values.iter_mut().zip(columns) {
            let raw = field(idx);
            *slot = raw.parse::<f64>().map_err(|_| LoadError::Parse {
                row,
                column,
                value: raw.to_string(),
            })?;
        }
        let [open, high, low, close, volume] = values;

        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    Ok(bars)
}

/// Accepts plain dates, naive datetimes, and offset datetimes as exported by
/// common market-data tools (`2024-01-02 00:00:00-05:00`). Offsets are
/// dropped: the local wall-clock time is kept.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%dT%H:%M:%S%:z"];

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|f| DateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.naive_local())
        })
}

/// Generate synthetic weekday bars between `start` and `end` (inclusive).
///
/// Produces a simple random walk from a starting price of 100.0, seeded from
/// the symbol so the same symbol always yields the same bars.
pub fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        if let Some(timestamp) = current.and_hms_opt(0, 0, 0) {
            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        price = close;
        current += Duration::days(1);
    }

    bars
}
