//! Parsing and formatting helpers for the named-option protocol.

use crate::err::{ChartError, Result};
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Case-insensitive option name match against any of `candidates`.
pub(crate) fn is(name: &str, candidates: &[&str]) -> bool {
    candidates.iter().any(|c| c.eq_ignore_ascii_case(name))
}

pub(crate) fn parse_bool(field: &'static str, value: &str) -> Result<bool> {
    let v = value.trim();
    if v.eq_ignore_ascii_case("true") || v == "1" {
        Ok(true)
    } else if v.eq_ignore_ascii_case("false") || v == "0" {
        Ok(false)
    } else {
        Err(ChartError::invalid_value(field, value, "true, false, 1 or 0"))
    }
}

/// Parses `value` and checks it against `range`.
pub(crate) fn parse_in<T>(
    field: &'static str,
    value: &str,
    range: RangeInclusive<T>,
    expected: &'static str,
) -> Result<T>
where
    T: FromStr + PartialOrd + Display,
{
    let parsed = value
        .trim()
        .parse::<T>()
        .map_err(|_| ChartError::invalid_value(field, value, expected))?;
    check_in(field, parsed, range, expected)
}

pub(crate) fn check_in<T>(
    field: &'static str,
    value: T,
    range: RangeInclusive<T>,
    expected: &'static str,
) -> Result<T>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ChartError::invalid_value(field, value, expected))
    }
}

pub(crate) fn parse_f64(field: &'static str, value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ChartError::invalid_value(field, value, "a finite number")),
    }
}

pub(crate) fn bool_str(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// Looks `value` up in a `(name, code)` table, case-insensitively.
pub(crate) fn parse_named<T: Copy>(
    field: &'static str,
    value: &str,
    table: &[(&str, T)],
    expected: &'static str,
) -> Result<T> {
    table
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(value.trim()))
        .map(|(_, code)| *code)
        .ok_or_else(|| ChartError::invalid_value(field, value, expected))
}

pub(crate) fn name_of<T: PartialEq>(table: &[(&'static str, T)], code: T) -> Option<String> {
    table
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(n, _)| (*n).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_forms() {
        assert!(parse_bool("x", "TRUE").unwrap());
        assert!(parse_bool("x", "1").unwrap());
        assert!(!parse_bool("x", " false ").unwrap());
        assert!(matches!(
            parse_bool("x", "yes"),
            Err(ChartError::InvalidFieldValue { field: "x", .. })
        ));
    }

    #[test]
    fn test_range_checked_parse() {
        assert_eq!(parse_in::<i16>("Overlap", "-100", -100..=100, "-100..=100").unwrap(), -100);
        assert!(parse_in::<i16>("Overlap", "101", -100..=100, "-100..=100").is_err());
        assert!(parse_in::<u16>("Gap", "abc", 0..=500, "0..=500").is_err());
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        assert!(parse_f64("max", "NaN").is_err());
        assert!(parse_f64("max", "inf").is_err());
        assert_eq!(parse_f64("max", "2.5").unwrap(), 2.5);
    }

    #[test]
    fn test_named_table() {
        let table = [("none", 0u8), ("in", 1), ("out", 2), ("cross", 3)];
        assert_eq!(parse_named("tick", "Cross", &table, "x").unwrap(), 3);
        assert_eq!(name_of(&table, 2), Some("out".to_string()));
        assert!(parse_named("tick", "sideways", &table, "x").is_err());
    }
}
