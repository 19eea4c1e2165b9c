//! Indicator engine: compute every column, then drop incomplete rows.
//!
//! ```text
//! Series -> compute_columns -> IndicatorColumns -> trim -> EnrichedSeries
//! ```
//!
//! The engine is pure: no state survives a call, and running it twice on the
//! same input produces identical output.

pub mod columns;
pub mod config;
pub mod precompute;
pub mod trim;

pub use columns::{EnrichedBar, EnrichedSeries, IndicatorColumns, IndicatorSet};
pub use config::{ConfigError, IndicatorConfig};
pub use precompute::compute_columns;
pub use trim::trim;

use thiserror::Error;

use crate::domain::{Bar, Series, SeriesError};

/// Errors surfaced by the engine entry points.
///
/// Insufficient history is not an error: it shows up as undefined values or
/// an empty `EnrichedSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid input series: {0}")]
    InvalidInput(#[from] SeriesError),

    #[error("invalid indicator config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Run the full pipeline over a validated series.
pub fn enrich(series: &Series, config: &IndicatorConfig) -> Result<EnrichedSeries, EngineError> {
    config.validate()?;
    let columns = compute_columns(series, config);
    Ok(trim(series, &columns))
}

/// Validate raw bars and run the full pipeline.
pub fn enrich_bars(
    symbol: &str,
    bars: Vec<Bar>,
    config: &IndicatorConfig,
) -> Result<EnrichedSeries, EngineError> {
    let series = Series::new(symbol, bars)?;
    enrich(&series, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn enrich_rejects_invalid_config() {
        let series = Series::new("TEST", make_bars(&[1.0, 2.0])).unwrap();
        let config = IndicatorConfig {
            sma_long: 0,
            ..Default::default()
        };
        assert!(matches!(
            enrich(&series, &config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn enrich_bars_rejects_invalid_input() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0]);
        bars[1].close = f64::NAN;
        let err = enrich_bars("TEST", bars, &IndicatorConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(err.to_string().contains("close is not finite"));
    }

    #[test]
    fn enrich_is_idempotent() {
        let closes: Vec<f64> = (0..90).map(|i| 20.0 + (i as f64 * 0.4).sin()).collect();
        let series = Series::new("TEST", make_bars(&closes)).unwrap();
        let config = IndicatorConfig::default();
        let first = enrich(&series, &config).unwrap();
        let second = enrich(&series, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 41);
    }
}
