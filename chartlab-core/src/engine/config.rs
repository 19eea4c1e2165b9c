//! Indicator parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be >= {min}, got {value}")]
    WindowTooSmall {
        name: &'static str,
        value: usize,
        min: usize,
    },

    #[error("bollinger_multiplier must be finite and >= 0, got {0}")]
    InvalidMultiplier(f64),
}

/// Windows and spans for every indicator the engine produces.
///
/// Defaults match the conventional charting setup: SMA 20/50, RSI 14,
/// MACD 12/26/9, Bollinger 20 x 2.0, volume SMA 20. Missing fields in a
/// deserialized config fall back to these defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorConfig {
    pub sma_short: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_window: usize,
    pub bollinger_multiplier: f64,
    pub volume_sma_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_long: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_window: 20,
            bollinger_multiplier: 2.0,
            volume_sma_window: 20,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("sma_short", self.sma_short, 1),
            ("sma_long", self.sma_long, 1),
            ("rsi_period", self.rsi_period, 1),
            ("macd_fast", self.macd_fast, 1),
            ("macd_slow", self.macd_slow, 1),
            ("macd_signal", self.macd_signal, 1),
            // sample stddev needs two observations
            ("bollinger_window", self.bollinger_window, 2),
            ("volume_sma_window", self.volume_sma_window, 1),
        ];
        for (name, value, min) in windows {
            if value < min {
                return Err(ConfigError::WindowTooSmall { name, value, min });
            }
        }
        if !self.bollinger_multiplier.is_finite() || self.bollinger_multiplier < 0.0 {
            return Err(ConfigError::InvalidMultiplier(self.bollinger_multiplier));
        }
        Ok(())
    }

    /// Number of leading rows the trim step removes: the longest warm-up
    /// prefix of any column (RSI always has one).
    pub fn warmup(&self) -> usize {
        [
            self.sma_short.saturating_sub(1),
            self.sma_long.saturating_sub(1),
            self.bollinger_window.saturating_sub(1),
            self.volume_sma_window.saturating_sub(1),
            1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Column labels in output order, derived from the configured windows.
    pub fn column_labels(&self) -> [String; 11] {
        [
            format!("SMA_{}", self.sma_short),
            format!("SMA_{}", self.sma_long),
            format!("RSI_{}", self.rsi_period),
            format!("EMA_{}", self.macd_fast),
            format!("EMA_{}", self.macd_slow),
            "MACD".to_string(),
            "Signal_Line".to_string(),
            "Middle_Band".to_string(),
            "Upper_Band".to_string(),
            "Lower_Band".to_string(),
            format!("Volume_SMA_{}", self.volume_sma_window),
        ]
    }
}
