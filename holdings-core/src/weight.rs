//! Weight normalization.
//!
//! Publishers report weights as fractions (`0.0712`), percentages (`7.12`),
//! percent strings (`7,12%`), or annotated text (`7.12 (est.)`). Everything
//! is folded into a fraction using one rule: a value greater than 1 is a
//! percentage and gets divided by 100.
//!
//! A genuine 100% holding reported as `1` stays `1` and is indistinguishable
//! from a fractional encoding. Source data has this quirk; the threshold is
//! left exactly at `> 1`.

use crate::table::{trim_cell, Cell};
use std::fmt;

/// A normalized holding weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weight {
    /// Fraction of the portfolio (0.05 = 5%).
    Fraction(f64),
    /// The source cell was blank or not a number.
    Unknown,
}

impl Weight {
    pub fn fraction(&self) -> Option<f64> {
        match self {
            Weight::Fraction(v) => Some(*v),
            Weight::Unknown => None,
        }
    }
}

/// Snapshot form: the numeric value, or nothing at all for unknown weights.
impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Fraction(v) => write!(f, "{v}"),
            Weight::Unknown => Ok(()),
        }
    }
}

/// Convert a raw cell into a canonical weight.
pub fn normalize(cell: &Cell) -> Weight {
    match cell {
        Cell::Empty => Weight::Unknown,
        Cell::Number(v) => scale(*v),
        Cell::Text(s) if s.is_empty() => Weight::Unknown,
        Cell::Text(s) => match parse_weight_text(s) {
            Some(v) => scale(v),
            None => Weight::Unknown,
        },
    }
}

fn scale(v: f64) -> Weight {
    if !v.is_finite() {
        return Weight::Unknown;
    }
    if v > 1.0 {
        Weight::Fraction(v / 100.0)
    } else {
        Weight::Fraction(v)
    }
}

/// Pull the first signed decimal number out of a weight string.
fn parse_weight_text(raw: &str) -> Option<f64> {
    let s = trim_cell(raw).replacen(',', ".", 1);
    let number = first_number(&s)?;
    number.replace('%', "").parse::<f64>().ok()
}

/// First match of `-?\d+(\.\d+)?` in `s`, scanning left to right.
fn first_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let start = (0..bytes.len()).find(|&i| {
        bytes[i].is_ascii_digit()
            || (bytes[i] == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    })?;

    let mut end = start;
    if bytes[end] == b'-' {
        end += 1;
    }
    end += count_digits(&bytes[end..]);

    // Fractional part only counts when at least one digit follows the point.
    if bytes.get(end) == Some(&b'.') {
        let frac = count_digits(&bytes[end + 1..]);
        if frac > 0 {
            end += 1 + frac;
        }
    }

    Some(&s[start..end])
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(w: Weight, expected: f64) {
        match w {
            Weight::Fraction(v) => assert!(
                (v - expected).abs() < 1e-12,
                "expected {expected}, got {v}"
            ),
            Weight::Unknown => panic!("expected {expected}, got Unknown"),
        }
    }

    #[test]
    fn numbers_above_one_are_percentages() {
        approx(normalize(&Cell::Number(5.0)), 0.05);
        approx(normalize(&Cell::Number(100.0)), 1.0);
        approx(normalize(&Cell::Number(1.5)), 0.015);
    }

    #[test]
    fn fractional_numbers_pass_through() {
        approx(normalize(&Cell::Number(0.0712)), 0.0712);
        approx(normalize(&Cell::Number(0.0)), 0.0);
        // 100% encoded as 1 is indistinguishable from a fraction; kept as-is.
        approx(normalize(&Cell::Number(1.0)), 1.0);
    }

    #[test]
    fn blanks_are_unknown() {
        assert_eq!(normalize(&Cell::Empty), Weight::Unknown);
        assert_eq!(normalize(&Cell::text("")), Weight::Unknown);
        assert_eq!(normalize(&Cell::text("   ")), Weight::Unknown);
    }

    #[test]
    fn decimal_comma_and_percent_sign() {
        approx(normalize(&Cell::text("12,5%")), 0.125);
        approx(normalize(&Cell::text(" 0,25 ")), 0.25);
    }

    #[test]
    fn annotations_are_stripped() {
        approx(normalize(&Cell::text("1.23 (est.)")), 0.0123);
        approx(normalize(&Cell::text("approx. 7.5%")), 0.075);
    }

    #[test]
    fn negative_weights_are_not_scaled() {
        approx(normalize(&Cell::text("-0.5")), -0.5);
        approx(normalize(&Cell::text("-3.2%")), -3.2);
    }

    #[test]
    fn text_without_digits_is_unknown() {
        assert_eq!(normalize(&Cell::text("n/a")), Weight::Unknown);
        assert_eq!(normalize(&Cell::text("-")), Weight::Unknown);
        assert_eq!(normalize(&Cell::text("%")), Weight::Unknown);
    }

    #[test]
    fn non_finite_numbers_are_unknown() {
        assert_eq!(normalize(&Cell::Number(f64::NAN)), Weight::Unknown);
        assert_eq!(normalize(&Cell::Number(f64::INFINITY)), Weight::Unknown);
    }

    #[test]
    fn dangling_decimal_point_is_ignored() {
        approx(normalize(&Cell::text("3.")), 0.03);
        // Leading point: the first digit run wins.
        approx(normalize(&Cell::text(".5")), 0.05);
    }

    #[test]
    fn only_first_comma_becomes_a_point() {
        approx(normalize(&Cell::text("1,234.5")), 0.01234);
    }

    #[test]
    fn display_leaves_unknown_blank() {
        assert_eq!(Weight::Fraction(0.05).to_string(), "0.05");
        assert_eq!(Weight::Unknown.to_string(), "");
    }
}
