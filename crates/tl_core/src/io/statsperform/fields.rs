//! Scalar field conversion shared by the StatsPerform decoders.
//!
//! Empty cells and `nan` are absent (`None`), never zero. Anything else
//! that fails to convert is a malformed record.

use std::str::FromStr;

use crate::error::{ParseError, Result};

fn is_absent(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("nan")
}

pub(crate) fn parse_required<T: FromStr>(raw: &str, line: usize, field: &str) -> Result<T> {
    let raw = raw.trim();
    raw.parse::<T>()
        .map_err(|_| ParseError::malformed(line, format!("invalid {} value '{}'", field, raw)))
}

pub(crate) fn parse_optional_f64(raw: &str, line: usize, field: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if is_absent(raw) {
        return Ok(None);
    }
    parse_required::<f64>(raw, line, field).map(Some)
}

/// Integer cell that pandas may have written as a float (`"2.0"`)
pub(crate) fn parse_optional_int(raw: &str, line: usize, field: &str) -> Result<Option<i64>> {
    let Some(value) = parse_optional_f64(raw, line, field)? else {
        return Ok(None);
    };
    if value.fract() != 0.0 {
        return Err(ParseError::malformed(
            line,
            format!("{} value '{}' is not an integer", field, raw.trim()),
        ));
    }
    Ok(Some(value as i64))
}

pub(crate) fn parse_optional_jersey(raw: &str, line: usize) -> Result<Option<u32>> {
    match parse_optional_int(raw, line, "jersey")? {
        None => Ok(None),
        Some(jersey) => u32::try_from(jersey)
            .map(Some)
            .map_err(|_| ParseError::malformed(line, format!("invalid jersey number {}", jersey))),
    }
}

/// Non-empty trimmed text
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_none_not_zero() {
        assert_eq!(parse_optional_f64("", 1, "x").unwrap(), None);
        assert_eq!(parse_optional_f64(" NaN ", 1, "x").unwrap(), None);
        assert_eq!(parse_optional_f64("0", 1, "x").unwrap(), Some(0.0));
    }

    #[test]
    fn test_float_written_integers() {
        assert_eq!(parse_optional_int("2.0", 1, "team_id").unwrap(), Some(2));
        assert_eq!(parse_optional_jersey("10", 1).unwrap(), Some(10));
        assert!(parse_optional_int("2.5", 3, "team_id").is_err());
        assert!(parse_optional_jersey("-4", 3).is_err());
    }

    #[test]
    fn test_bad_number_is_malformed() {
        let err = parse_required::<i64>("abc", 7, "gameclock").unwrap_err();
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" 42 ").as_deref(), Some("42"));
    }
}
