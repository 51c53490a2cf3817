//! Raw table shape shared by every source adapter.
//!
//! Publishers hand us loosely typed cells: spreadsheets carry numbers and
//! strings side by side, delimited text carries only strings. Cells are kept
//! as a tagged union so downstream code matches on them instead of probing.

use std::fmt;

/// A single raw cell value as read from a source document.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Shorthand for building a text cell.
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// True when the cell carries no value at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Stringified, trimmed form of the cell (empty cells become `""`).
    pub fn trimmed(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => trim_cell(s).to_string(),
        }
    }
}

/// Trim whitespace and stray byte-order marks from a cell's text.
pub fn trim_cell(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

/// One row of raw cells, in column order.
pub type Row = Vec<Cell>;

/// Rows of raw cells; row 0 is conventionally the header row.
pub type RawTable = Vec<Row>;

/// Read a cell by column index, treating out-of-range columns as empty.
pub fn cell_at(row: &[Cell], index: usize) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    row.get(index).unwrap_or(&EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_stringifies_each_variant() {
        assert_eq!(Cell::Empty.trimmed(), "");
        assert_eq!(Cell::Number(700.0).trimmed(), "700");
        assert_eq!(Cell::Number(0.25).trimmed(), "0.25");
        assert_eq!(Cell::text("  AAPL \t").trimmed(), "AAPL");
    }

    #[test]
    fn trimmed_drops_byte_order_mark() {
        assert_eq!(Cell::text("\u{feff}Ticker").trimmed(), "Ticker");
        assert_eq!(Cell::text(" \u{feff} ").trimmed(), "");
    }

    #[test]
    fn cell_at_past_end_is_empty() {
        let row = vec![Cell::text("a")];
        assert_eq!(cell_at(&row, 0), &Cell::text("a"));
        assert!(cell_at(&row, 5).is_empty());
    }
}
