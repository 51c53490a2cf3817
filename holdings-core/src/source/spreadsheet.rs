//! Workbook adapter for publishers that ship xlsx/xls exports.
//!
//! Only the first worksheet is read. Rows come out exactly as laid out in the
//! sheet (row 0 is the literal first row, not a detected header), with fully
//! blank rows dropped.

use crate::error::{HoldingsError, Result};
use crate::table::{Cell, RawTable, Row};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// Decode the first worksheet of a workbook held in memory.
pub fn parse_workbook(bytes: Vec<u8>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| HoldingsError::Parse(format!("unreadable workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| HoldingsError::Parse("workbook has no sheets".into()))?
        .map_err(|e| HoldingsError::Parse(format!("failed to read first sheet: {e}")))?;

    Ok(rows_to_table(range.rows()))
}

/// Convert worksheet rows to a raw table, skipping rows with no values.
pub fn rows_to_table<'a>(rows: impl Iterator<Item = &'a [Data]>) -> RawTable {
    rows.map(|row| row.iter().map(to_cell).collect::<Row>())
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect()
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
