//! Header resolution: find the symbol and weight columns in a header row.
//!
//! Each column is tested left to right against an ordered list of predicates.
//! The first column any predicate accepts wins. There is no scoring, so an
//! ambiguous header resolves to its leftmost candidate.

use crate::error::{HoldingsError, Result};
use crate::table::Cell;

/// Column positions of the two fields the extractor needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub symbol: usize,
    pub weight: usize,
}

type HeaderPredicate = fn(&str) -> bool;

/// Symbol column names, matched exactly after trimming and lowercasing.
const SYMBOL_NAMES: [&str; 4] = ["ticker", "symbol", "ticker symbol", "code"];

const SYMBOL_PREDICATES: &[HeaderPredicate] = &[is_symbol_name];

const WEIGHT_PREDICATES: &[HeaderPredicate] = &[
    is_weight_with_trailing_percent,
    is_weight_percent_in_parens,
    is_bare_weight,
    contains_portfolio_weight,
];

/// Locate the symbol and weight columns in `header`.
pub fn resolve(header: &[Cell]) -> Result<ColumnMap> {
    let names: Vec<String> = header.iter().map(Cell::trimmed).collect();
    let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();

    match (
        find_column(&lowered, SYMBOL_PREDICATES),
        find_column(&lowered, WEIGHT_PREDICATES),
    ) {
        (Some(symbol), Some(weight)) => Ok(ColumnMap { symbol, weight }),
        _ => Err(HoldingsError::MissingColumns { header: names }),
    }
}

fn find_column(lowered: &[String], predicates: &[HeaderPredicate]) -> Option<usize> {
    lowered
        .iter()
        .position(|name| predicates.iter().any(|accepts| accepts(name)))
}

fn is_symbol_name(name: &str) -> bool {
    SYMBOL_NAMES.contains(&name)
}

/// `weight ... %`, e.g. "weight %" or "weight, %".
fn is_weight_with_trailing_percent(name: &str) -> bool {
    name.starts_with("weight") && name.ends_with('%')
}

/// `[%] weight (%)` with optional whitespace around "weight".
fn is_weight_percent_in_parens(name: &str) -> bool {
    let Some(rest) = name.strip_suffix("(%)") else {
        return false;
    };
    let rest = rest.trim_end();
    let rest = rest.strip_prefix('%').unwrap_or(rest).trim_start();
    rest == "weight"
}

fn is_bare_weight(name: &str) -> bool {
    name == "weight"
}

/// "portfolio", optional whitespace, "weight" anywhere in the name.
fn contains_portfolio_weight(name: &str) -> bool {
    name.match_indices("portfolio").any(|(at, word)| {
        name[at + word.len()..]
            .trim_start()
            .starts_with("weight")
    })
}
