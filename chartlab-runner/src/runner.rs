//! Per-symbol analysis and multi-symbol batches.
//!
//! Each symbol goes through the same steps:
//!
//! ```text
//! BarSource -> Vec<Bar> -> Series -> LookbackPeriod -> enrich -> SymbolReport
//! ```
//!
//! A batch never aborts on a single symbol: failures are collected next to the
//! successful reports, in input order.

use std::path::PathBuf;

use chartlab_core::{enrich, EngineError, EnrichedSeries, Series};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::data_loader::{BarSource, DataSource, LoadError};
use crate::fingerprint::{dataset_hash, run_fingerprint};
use crate::fundamentals::Fundamentals;
use crate::period::LookbackPeriod;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{symbol}: {source}")]
    Load {
        symbol: String,
        #[source]
        source: LoadError,
    },

    #[error("{symbol}: {source}")]
    Engine {
        symbol: String,
        #[source]
        source: EngineError,
    },
}

impl AnalysisError {
    pub fn symbol(&self) -> &str {
        match self {
            AnalysisError::Load { symbol, .. } | AnalysisError::Engine { symbol, .. } => symbol,
        }
    }
}

/// One security to analyze.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInput {
    pub symbol: String,
    pub source: BarSource,
    /// Optional JSON file of point-in-time fundamentals.
    pub fundamentals: Option<PathBuf>,
}

impl SymbolInput {
    pub fn new(symbol: impl Into<String>, source: BarSource) -> Self {
        Self {
            symbol: symbol.into(),
            source,
            fundamentals: None,
        }
    }

    pub fn with_fundamentals(mut self, path: impl Into<PathBuf>) -> Self {
        self.fundamentals = Some(path.into());
        self
    }
}

/// Result of analyzing one security.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub source: DataSource,
    pub period: LookbackPeriod,
    /// Bars read from the source, before the lookback period is applied.
    pub loaded_bars: usize,
    /// Bars inside the lookback period, fed to the engine.
    pub input_bars: usize,
    /// Rows with every indicator defined.
    pub kept_rows: usize,
    /// Indicator labels in `IndicatorSet::values` order. In JSON rows the
    /// same values appear under field names: `sma_short`, `sma_long`, `rsi`,
    /// `ema_fast`, `ema_slow`, `macd`, `signal_line`, `middle_band`,
    /// `upper_band`, `lower_band`, `volume_sma`.
    pub columns: Vec<String>,
    /// Hash of the loaded bars, independent of period and parameters.
    pub dataset_hash: String,
    /// Hash of the parameters, period and in-period bars.
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fundamentals: Option<Fundamentals>,
    pub series: EnrichedSeries,
}

/// A failed symbol inside a batch.
#[derive(Debug)]
pub struct SymbolFailure {
    pub symbol: String,
    pub error: AnalysisError,
}

/// Reports and failures from one batch, each in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub reports: Vec<SymbolReport>,
    pub failures: Vec<SymbolFailure>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Load, restrict, and enrich a single security.
pub fn analyze_symbol(
    input: &SymbolInput,
    config: &AnalysisConfig,
) -> Result<SymbolReport, AnalysisError> {
    let symbol = input.symbol.as_str();
    let load_err = |source| AnalysisError::Load {
        symbol: symbol.to_string(),
        source,
    };

    let source = input.source.kind();
    if source == DataSource::Synthetic {
        warn!(symbol, "using synthetic bars, not market data");
    }

    let bars = input.source.load(symbol).map_err(load_err)?;
    let fundamentals = input
        .fundamentals
        .as_deref()
        .map(Fundamentals::from_file)
        .transpose()
        .map_err(load_err)?;

    let series = Series::new(symbol, bars).map_err(|e| AnalysisError::Engine {
        symbol: symbol.to_string(),
        source: EngineError::from(e),
    })?;

    analyze_series(&series, source, fundamentals, config)
}

/// Restrict and enrich an already-loaded series.
pub fn analyze_series(
    series: &Series,
    source: DataSource,
    fundamentals: Option<Fundamentals>,
    config: &AnalysisConfig,
) -> Result<SymbolReport, AnalysisError> {
    let symbol = series.symbol().to_string();
    let windowed = config.period.apply(series);

    let enriched = enrich(&windowed, &config.indicators).map_err(|source| {
        AnalysisError::Engine {
            symbol: symbol.clone(),
            source,
        }
    })?;

    if enriched.is_empty() {
        warn!(
            symbol = %symbol,
            bars = windowed.len(),
            warmup = config.indicators.warmup(),
            "not enough history for a complete indicator row"
        );
    }
    info!(
        symbol = %symbol,
        period = %config.period,
        bars = windowed.len(),
        rows = enriched.len(),
        "analyzed"
    );

    Ok(SymbolReport {
        source,
        period: config.period,
        loaded_bars: series.len(),
        input_bars: windowed.len(),
        kept_rows: enriched.len(),
        columns: config.indicators.column_labels().to_vec(),
        dataset_hash: dataset_hash(series.bars()),
        fingerprint: run_fingerprint(&config.indicators, config.period, windowed.bars()),
        fundamentals,
        series: enriched,
        symbol,
    })
}

/// Analyze every input, on the rayon pool when `config.parallel` is set.
pub fn analyze_batch(inputs: &[SymbolInput], config: &AnalysisConfig) -> BatchOutcome {
    let results: Vec<Result<SymbolReport, AnalysisError>> = if config.parallel {
        inputs
            .par_iter()
            .map(|input| analyze_symbol(input, config))
            .collect()
    } else {
        inputs
            .iter()
            .map(|input| analyze_symbol(input, config))
            .collect()
    };

    let mut outcome = BatchOutcome::default();
    for result in results {
        match result {
            Ok(report) => outcome.reports.push(report),
            Err(error) => {
                warn!(error = %error, "symbol failed");
                outcome.failures.push(SymbolFailure {
                    symbol: error.symbol().to_string(),
                    error,
                });
            }
        }
    }
    info!(
        ok = outcome.reports.len(),
        failed = outcome.failures.len(),
        "batch finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn synthetic(symbol: &str) -> SymbolInput {
        SymbolInput::new(
            symbol,
            BarSource::Synthetic {
                start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            },
        )
    }

    #[test]
    fn synthetic_symbol_report() {
        let config = AnalysisConfig::default();
        let report = analyze_symbol(&synthetic("SPY"), &config).unwrap();

        assert_eq!(report.symbol, "SPY");
        assert_eq!(report.source, DataSource::Synthetic);
        assert_eq!(report.loaded_bars, 260);
        assert_eq!(report.input_bars, 260);
        assert_eq!(report.kept_rows, 260 - config.indicators.warmup());
        assert_eq!(report.series.len(), report.kept_rows);
        assert_eq!(report.columns[0], "SMA_20");
        assert!(report.fundamentals.is_none());
    }

    #[test]
    fn period_restricts_input() {
        let config = AnalysisConfig {
            period: LookbackPeriod::ThreeMonths,
            ..Default::default()
        };
        let report = analyze_symbol(&synthetic("SPY"), &config).unwrap();
        assert_eq!(report.loaded_bars, 260);
        assert!(report.input_bars < 70);
        assert!(report.kept_rows < report.input_bars);
    }

    #[test]
    fn short_history_is_empty_not_error() {
        let input = SymbolInput::new(
            "NEW",
            BarSource::Synthetic {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            },
        );
        let report = analyze_symbol(&input, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.input_bars, 23);
        assert_eq!(report.kept_rows, 0);
        assert!(report.series.is_empty());
    }

    #[test]
    fn invalid_config_fails_symbol() {
        let mut config = AnalysisConfig::default();
        config.indicators.bollinger_multiplier = -1.0;
        let err = analyze_symbol(&synthetic("SPY"), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::Engine { .. }));
        assert_eq!(err.symbol(), "SPY");
    }

    #[test]
    fn batch_keeps_order_and_collects_failures() {
        let inputs = vec![
            synthetic("AAA"),
            SymbolInput::new("MISSING", BarSource::Csv(PathBuf::from("/nonexistent/x.csv"))),
            synthetic("BBB"),
        ];
        for parallel in [true, false] {
            let config = AnalysisConfig {
                parallel,
                ..Default::default()
            };
            let outcome = analyze_batch(&inputs, &config);
            let symbols: Vec<&str> = outcome.reports.iter().map(|r| r.symbol.as_str()).collect();
            assert_eq!(symbols, vec!["AAA", "BBB"]);
            assert_eq!(outcome.failures.len(), 1);
            assert_eq!(outcome.failures[0].symbol, "MISSING");
            assert!(matches!(
                outcome.failures[0].error,
                AnalysisError::Load { .. }
            ));
            assert!(!outcome.is_complete());
        }
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let inputs: Vec<SymbolInput> = ["A", "B", "C", "D"].into_iter().map(synthetic).collect();
        let par = analyze_batch(&inputs, &AnalysisConfig::default());
        let seq = analyze_batch(
            &inputs,
            &AnalysisConfig {
                parallel: false,
                ..Default::default()
            },
        );
        assert_eq!(par.reports, seq.reports);
    }

    #[test]
    fn dataset_hash_ignores_period_fingerprint_does_not() {
        let full = analyze_symbol(&synthetic("SPY"), &AnalysisConfig::default()).unwrap();
        let recent = analyze_symbol(
            &synthetic("SPY"),
            &AnalysisConfig {
                period: LookbackPeriod::SixMonths,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(full.dataset_hash, recent.dataset_hash);
        assert_ne!(full.fingerprint, recent.fingerprint);
        assert_ne!(
            full.dataset_hash,
            analyze_symbol(&synthetic("QQQ"), &AnalysisConfig::default())
                .unwrap()
                .dataset_hash
        );
    }

    #[test]
    fn column_labels_follow_value_order() {
        let report = analyze_symbol(&synthetic("SPY"), &AnalysisConfig::default()).unwrap();
        let row = report.series.last().unwrap();
        let values = row.indicators.values();
        assert_eq!(report.columns.len(), values.len());
        assert_eq!(report.columns[2], "RSI_14");
        assert_eq!(values[2], row.indicators.rsi);
        assert_eq!(report.columns[10], "Volume_SMA_20");
        assert_eq!(values[10], row.indicators.volume_sma);
    }
}
