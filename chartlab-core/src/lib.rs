//! ChartLab Core: indicator engine for OHLCV price histories.
//!
//! This crate contains:
//! - Domain types (bars, validated series)
//! - Indicators (SMA, EMA, RSI, MACD, Bollinger Bands), each a pure function
//!   from a value slice to an optionally-undefined column
//! - The engine pipeline: compute all columns, then trim to the rows where
//!   every column is defined
//!
//! The crate performs no I/O. Loading bars and writing results belong to
//! `chartlab-runner`.

pub mod domain;
pub mod engine;
pub mod indicators;

pub use domain::{Bar, Series, SeriesError};
pub use engine::{
    compute_columns, enrich, enrich_bars, trim, ConfigError, EngineError, EnrichedBar,
    EnrichedSeries, IndicatorColumns, IndicatorConfig, IndicatorSet,
};
