//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1).
//! Seed: EMA[0] = x[0] (no SMA seed window), so the column is defined from the
//! first position. Lookback: 0.

use super::{Column, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Column {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.span).into_iter().map(Some).collect()
    }
}

/// Smoothing factor for a given span.
pub fn alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// EMA of a fully defined series, seeded at its first value.
///
/// Used directly by MACD (EMA of closes, then EMA of the MACD line) and by
/// RSI through [`ema_from`].
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let a = alpha(span);
    let mut result = Vec::with_capacity(values.len());
    let mut prev = first;
    result.push(prev);
    for &v in &values[1..] {
        prev = a * v + (1.0 - a) * prev;
        result.push(prev);
    }
    result
}

/// EMA over `values[start..]`, seeded at `values[start]`; positions before
/// `start` are undefined.
pub fn ema_from(values: &[f64], start: usize, span: usize) -> Column {
    let n = values.len();
    let mut result = vec![None; n];
    if start >= n {
        return result;
    }
    for (slot, v) in result[start..]
        .iter_mut()
        .zip(ema_of_series(&values[start..], span))
    {
        *slot = Some(v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_span_1_equals_input() {
        let result = ema_of_series(&[100.0, 200.0, 300.0], 1);
        assert_eq!(result, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 2/(3+1) = 0.5, seed = 10
        // EMA[1] = 0.5*11 + 0.5*10   = 10.5
        // EMA[2] = 0.5*12 + 0.5*10.5 = 11.25
        // EMA[3] = 0.5*13 + 0.5*11.25 = 12.125
        let result = ema_of_series(&[10.0, 11.0, 12.0, 13.0], 3);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.25, DEFAULT_EPSILON);
        assert_approx(result[3], 12.125, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_indicator_defined_from_first_bar() {
        let bars = make_bars(&[5.0, 6.0, 7.0]);
        let result = Ema::new(12).compute(&bars);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|v| v.is_some()));
        assert_eq!(result[0], Some(5.0));
    }

    #[test]
    fn ema_constant_input_stays_constant() {
        let result = ema_of_series(&[42.0; 30], 26);
        assert!(result.iter().all(|&v| (v - 42.0).abs() < DEFAULT_EPSILON));
    }

    #[test]
    fn ema_from_skips_prefix() {
        let result = ema_from(&[99.0, 10.0, 11.0], 1, 3);
        assert_eq!(result[0], None);
        assert_eq!(result[1], Some(10.0));
        assert_approx(result[2].unwrap(), 10.5, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_from_start_past_end() {
        assert_eq!(ema_from(&[1.0], 1, 3), vec![None]);
        assert!(ema_from(&[], 1, 3).is_empty());
    }

    #[test]
    fn ema_empty_input() {
        assert!(ema_of_series(&[], 12).is_empty());
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(26).lookback(), 0);
        assert_eq!(Ema::new(12).name(), "ema_12");
    }
}
