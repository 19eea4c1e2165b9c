//! ChartLab Runner: batch analysis over many securities.
//!
//! This crate builds on `chartlab-core` to provide:
//! - Bar loading from CSV files or a deterministic synthetic walk
//! - Lookback-period selection (`1d` .. `10y`, `ytd`, `max`)
//! - Fundamentals pass-through from provider JSON
//! - Sequential or rayon-parallel batches with per-symbol failures
//! - Run fingerprints and JSON/CSV export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod fingerprint;
pub mod fundamentals;
pub mod period;
pub mod runner;

pub use config::{AnalysisConfig, ConfigFileError, OutputConfig, OutputFormat};
pub use data_loader::{
    generate_synthetic_bars, load_csv, read_bars_csv, BarSource, DataSource, LoadError,
};
pub use export::{export_csv, export_json, report_file_name, write_report, ExportError};
pub use fingerprint::{dataset_hash, run_fingerprint};
pub use fundamentals::{Basis, Fundamentals};
pub use period::LookbackPeriod;
pub use runner::{
    analyze_batch, analyze_series, analyze_symbol, AnalysisError, BatchOutcome, SymbolFailure,
    SymbolInput, SymbolReport,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn batch_types_are_send_sync() {
        assert_send::<SymbolInput>();
        assert_sync::<SymbolInput>();
        assert_send::<SymbolReport>();
        assert_sync::<SymbolReport>();
        assert_send::<AnalysisError>();
        assert_sync::<AnalysisConfig>();
    }
}
