//! Dropping incomplete rows.

use tracing::debug;

use super::columns::{EnrichedBar, EnrichedSeries, IndicatorColumns};
use crate::domain::Series;

/// Keep only the rows for which every indicator column is defined.
///
/// Undefined values only occur in warm-up prefixes, so the kept rows are a
/// contiguous suffix of the series. If no row survives the result is empty.
pub fn trim(series: &Series, columns: &IndicatorColumns) -> EnrichedSeries {
    debug_assert_eq!(series.len(), columns.len());

    let rows: Vec<EnrichedBar> = series
        .bars()
        .iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            columns.row(i).map(|indicators| EnrichedBar {
                bar: bar.clone(),
                indicators,
            })
        })
        .collect();

    debug!(
        symbol = series.symbol(),
        input = series.len(),
        kept = rows.len(),
        "trimmed incomplete rows"
    );

    EnrichedSeries {
        symbol: series.symbol().to_string(),
        rows,
    }
}
