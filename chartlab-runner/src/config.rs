//! Serializable analysis configuration.
//!
//! A config file is TOML; every table and field is optional. Reports are
//! written to disk only when an `[output]` table is present:
//!
//! ```toml
//! period = "1y"
//! parallel = true
//!
//! [indicators]
//! sma_short = 20
//! sma_long = 50
//! bollinger_multiplier = 2.0
//!
//! [output]
//! format = "csv"
//! directory = "results"
//! ```

use chartlab_core::{ConfigError, IndicatorConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::period::LookbackPeriod;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config TOML: {0}")]
    Render(#[from] toml::ser::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Output file format for enriched series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            directory: PathBuf::from("results"),
        }
    }
}

/// Everything needed to analyze a batch of symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Trailing window applied to each symbol's bars before computing.
    pub period: LookbackPeriod,

    /// Process symbols on the rayon thread pool.
    pub parallel: bool,

    pub indicators: IndicatorConfig,

    /// Where to write reports. `None` prints summaries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            period: LookbackPeriod::Max,
            parallel: true,
            indicators: IndicatorConfig::default(),
            output: None,
        }
    }
}

impl AnalysisConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigFileError> {
        let config: Self = toml::from_str(content)?;
        config.indicators.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
