//! Deterministic fingerprints for reports.
//!
//! Two reports with the same fingerprint were computed from identical bars
//! with identical indicator parameters and lookback period, so their indicator
//! values are identical too.

use chartlab_core::{Bar, IndicatorConfig};

use crate::period::LookbackPeriod;

/// BLAKE3 hash over every bar's timestamp and OHLCV values, in order.
pub fn dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    hash_bars(&mut hasher, bars);
    hasher.finalize().to_hex().to_string()
}

/// BLAKE3 hash over the indicator parameters, lookback period, and bars.
pub fn run_fingerprint(config: &IndicatorConfig, period: LookbackPeriod, bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for value in [
        config.sma_short,
        config.sma_long,
        config.rsi_period,
        config.macd_fast,
        config.macd_slow,
        config.macd_signal,
        config.bollinger_window,
        config.volume_sma_window,
    ] {
        hasher.update(&(value as u64).to_le_bytes());
    }
    hasher.update(&config.bollinger_multiplier.to_le_bytes());
    hasher.update(period.as_str().as_bytes());
    hash_bars(&mut hasher, bars);
    hasher.finalize().to_hex().to_string()
}

fn hash_bars(hasher: &mut blake3::Hasher, bars: &[Bar]) {
    for bar in bars {
        hasher.update(&bar.timestamp.and_utc().timestamp_micros().to_le_bytes());
        for (_, value) in bar.fields() {
            hasher.update(&value.to_le_bytes());
        }
    }
}
