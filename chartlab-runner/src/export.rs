//! Report export: pretty JSON or a flat CSV table per symbol.
//!
//! The CSV has one row per enriched bar: `timestamp, open, high, low, close,
//! volume`, followed by the indicator columns under their configured labels.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::OutputFormat;
use crate::runner::SymbolReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV: {0}")]
    Flush(String),

    #[error("symbol '{0}' cannot be used as a file name")]
    InvalidSymbol(String),
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(report: &SymbolReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

// ─── CSV ────────────────────────────────────────────────────────────

pub fn export_csv(report: &SymbolReport) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["timestamp", "open", "high", "low", "close", "volume"];
    header.extend(report.columns.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for row in &report.series.rows {
        let bar = &row.bar;
        let mut record = vec![bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()];
        record.extend(bar.fields().iter().map(|(_, v)| v.to_string()));
        record.extend(row.indicators.values().iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    String::from_utf8(data).map_err(|e| ExportError::Flush(e.to_string()))
}

// ─── Files ──────────────────────────────────────────────────────────

/// File name for a symbol's report. Path separators become `_` so tickers
/// like `BRK/B` stay inside the output directory.
pub fn report_file_name(symbol: &str, format: OutputFormat) -> Result<String, ExportError> {
    let stem: String = symbol
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() || stem == "." || stem == ".." {
        return Err(ExportError::InvalidSymbol(symbol.to_string()));
    }
    Ok(format!("{stem}.{}", format.extension()))
}

/// Write one report into `dir` as `{symbol}.{ext}`, creating `dir` if needed.
///
/// Returns the written file's path.
pub fn write_report(
    report: &SymbolReport,
    dir: &Path,
    format: OutputFormat,
) -> Result<PathBuf, ExportError> {
    let file_name = report_file_name(&report.symbol, format)?;
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let content = match format {
        OutputFormat::Json => export_json(report)?,
        OutputFormat::Csv => export_csv(report)?,
    };
    let path = dir.join(file_name);
    std::fs::write(&path, content).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
