//! Point-in-time fundamental fields, passed through to reports unmodified.
//!
//! Field names follow the market-data provider's keys so a provider "info"
//! dump can be saved as JSON next to the bar file and loaded as-is. Keys the
//! provider sends that are not listed here are ignored.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data_loader::LoadError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    pub market_cap: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub average_volume: Option<f64>,
    pub current_price: Option<f64>,
    pub regular_market_price: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    #[serde(alias = "trailingEPS")]
    pub trailing_eps: Option<f64>,
    #[serde(alias = "forwardEPS")]
    pub forward_eps: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_stockholder_equity: Option<f64>,
    #[serde(alias = "totalRevenue")]
    pub revenue: Option<f64>,
    pub gross_profits: Option<f64>,
    pub net_income_to_common: Option<f64>,
}

/// Whether a preferred value came from trailing or forward estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    Trailing,
    Forward,
}

impl Fundamentals {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| LoadError::Fundamentals {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Current price, falling back to the regular-market price.
    pub fn price(&self) -> Option<f64> {
        self.current_price.or(self.regular_market_price)
    }

    /// P/E ratio, trailing if available, otherwise forward.
    pub fn pe_ratio(&self) -> Option<(f64, Basis)> {
        prefer_trailing(self.trailing_pe, self.forward_pe)
    }

    /// Earnings per share, trailing if available, otherwise forward.
    pub fn eps(&self) -> Option<(f64, Basis)> {
        prefer_trailing(self.trailing_eps, self.forward_eps)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn prefer_trailing(trailing: Option<f64>, forward: Option<f64>) -> Option<(f64, Basis)> {
    trailing
        .map(|v| (v, Basis::Trailing))
        .or_else(|| forward.map(|v| (v, Basis::Forward)))
}
