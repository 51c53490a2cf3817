//! Row extraction: raw table in, ordered holding records out.

use crate::error::Result;
use crate::header::{self, ColumnMap};
use crate::table::{cell_at, RawTable, Row};
use crate::weight::{self, Weight};

/// One (symbol, weight) line of a holdings disclosure.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingRecord {
    pub symbol: String,
    pub weight: Weight,
}

impl HoldingRecord {
    pub fn new(symbol: impl Into<String>, weight: Weight) -> Self {
        Self {
            symbol: symbol.into(),
            weight,
        }
    }
}

/// Extract holding records from `table`, using row 0 as the header.
///
/// Rows without a symbol are dropped. Output keeps the input row order and
/// does not de-duplicate repeated symbols.
pub fn extract(table: &RawTable) -> Result<Vec<HoldingRecord>> {
    let Some((header_row, rows)) = table.split_first() else {
        return Ok(Vec::new());
    };

    let columns = header::resolve(header_row)?;
    tracing::debug!(
        symbol_col = columns.symbol,
        weight_col = columns.weight,
        rows = rows.len(),
        "resolved holdings columns"
    );

    Ok(rows
        .iter()
        .filter_map(|row| extract_row(row, columns))
        .collect())
}

fn extract_row(row: &Row, columns: ColumnMap) -> Option<HoldingRecord> {
    if row.is_empty() {
        return None;
    }
    let symbol = cell_at(row, columns.symbol).trimmed();
    if symbol.is_empty() {
        return None;
    }
    Some(HoldingRecord {
        symbol,
        weight: weight::normalize(cell_at(row, columns.weight)),
    })
}
