//! Indicator column computation.
//!
//! Every column is computed in full from the close/volume values of the
//! series. Nothing here mutates its input; the result is a new
//! `IndicatorColumns` value.

use tracing::debug;

use super::columns::IndicatorColumns;
use super::config::IndicatorConfig;
use crate::domain::Series;
use crate::indicators::{bollinger_bands, macd_of_series, rsi_of_series, sma_of_series};

/// Compute all indicator columns for one series.
///
/// `config` is assumed valid (see `IndicatorConfig::validate`); the engine
/// entry points check it before calling this.
pub fn compute_columns(series: &Series, config: &IndicatorConfig) -> IndicatorColumns {
    let closes = series.closes();
    let volumes = series.volumes();

    let sma_short = sma_of_series(&closes, config.sma_short);
    let sma_long = sma_of_series(&closes, config.sma_long);
    let rsi = rsi_of_series(&closes, config.rsi_period);
    let macd = macd_of_series(
        &closes,
        config.macd_fast,
        config.macd_slow,
        config.macd_signal,
    );
    let bands = bollinger_bands(
        &closes,
        config.bollinger_window,
        config.bollinger_multiplier,
    );
    let volume_sma = sma_of_series(&volumes, config.volume_sma_window);

    let columns = IndicatorColumns {
        sma_short,
        sma_long,
        rsi,
        ema_fast: macd.ema_fast.into_iter().map(Some).collect(),
        ema_slow: macd.ema_slow.into_iter().map(Some).collect(),
        macd: macd.macd.into_iter().map(Some).collect(),
        signal_line: macd.signal.into_iter().map(Some).collect(),
        middle_band: bands.middle,
        upper_band: bands.upper,
        lower_band: bands.lower,
        volume_sma,
    };

    for column in columns.as_array() {
        debug_assert_eq!(
            column.len(),
            series.len(),
            "indicator column length mismatch (symbol={})",
            series.symbol()
        );
    }
    debug!(
        symbol = series.symbol(),
        bars = series.len(),
        "computed indicator columns"
    );

    columns
}
