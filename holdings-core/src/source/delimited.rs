//! Comma-delimited text adapter.
//!
//! Deliberately naive: lines are split on `\n` and cells on `,` with no
//! quoting or escaping. Fund CSV exports that quote fields with embedded
//! commas will shift columns.

use crate::table::{Cell, RawTable};

/// Split text into rows of text cells, dropping empty lines.
pub fn parse_text(text: &str) -> RawTable {
    text.replace('\r', "")
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| line.split(',').map(Cell::text).collect())
        .collect()
}
