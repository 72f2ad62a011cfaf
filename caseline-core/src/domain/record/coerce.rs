// caseline-core/src/domain/record/coerce.rs

// Scalar coercions applied to raw JSON values while reshaping a record.
// Every function takes the record index so errors point at the offending row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::domain::error::DomainError;
use crate::domain::record::schema::AGE_UNIT_MARKER;

const ZERO_AGE_LITERAL: &str = "0.0";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

pub fn coerce_integer(record: usize, field: &str, value: &Value) -> Result<i32, DomainError> {
    let invalid = || DomainError::InvalidInteger {
        record,
        field: field.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(invalid),
        Value::String(s) => s.trim().parse::<i32>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Age as a non-negative integer.
///
/// `"0.0"` maps to 0, other numeric values truncate toward zero. Null,
/// non-numeric, non-finite and negative values are rejected.
pub fn coerce_age(record: usize, value: &Value) -> Result<i64, DomainError> {
    let invalid = || DomainError::InvalidAge {
        record,
        value: value.to_string(),
    };

    let age = match value {
        Value::String(s) if s == ZERO_AGE_LITERAL => 0,
        Value::String(s) => parse_magnitude(s.trim()).ok_or_else(invalid)?,
        Value::Number(n) => match n.as_i64() {
            Some(v) => v,
            None => n.as_f64().and_then(truncate).ok_or_else(invalid)?,
        },
        _ => return Err(invalid()),
    };

    if age < 0 {
        return Err(invalid());
    }
    Ok(age)
}

fn parse_magnitude(raw: &str) -> Option<i64> {
    // "-0.5" would otherwise truncate to a valid 0
    if raw.starts_with('-') {
        return None;
    }
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    raw.parse::<f64>().ok().and_then(truncate)
}

fn truncate(v: f64) -> Option<i64> {
    if !v.is_finite() || v.is_sign_negative() || v >= i64::MAX as f64 {
        return None;
    }
    Some(v.trunc() as i64)
}

pub fn strip_unit_marker(raw: &str) -> String {
    raw.replace(AGE_UNIT_MARKER, "")
}

/// Free-text cell. Null becomes an empty cell; scalars are stringified.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn parse_timestamp(record: usize, value: &Value) -> Result<NaiveDateTime, DomainError> {
    let invalid = || DomainError::InvalidTimestamp {
        record,
        value: value.to_string(),
    };

    let raw = value.as_str().map(str::trim).ok_or_else(invalid)?;

    // Offset-aware input keeps the wall time of its own offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_literal_becomes_zero() {
        assert_eq!(coerce_age(0, &json!("0.0")).unwrap(), 0);
    }

    #[test]
    fn test_numeric_strings_keep_their_magnitude() {
        assert_eq!(coerce_age(0, &json!("42")).unwrap(), 42);
        assert_eq!(coerce_age(0, &json!(" 7 ")).unwrap(), 7);
        assert_eq!(coerce_age(0, &json!("36.9")).unwrap(), 36);
        assert_eq!(coerce_age(0, &json!(18)).unwrap(), 18);
        assert_eq!(coerce_age(0, &json!(64.5)).unwrap(), 64);
    }

    #[test]
    fn test_bad_ages_are_rejected() {
        for bad in [json!("abc"), json!(""), json!(null), json!(-3), json!("-1"), json!("NaN")] {
            let err = coerce_age(5, &bad).unwrap_err();
            assert!(
                matches!(err, DomainError::InvalidAge { record: 5, .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_negative_fractions_are_rejected_before_truncation() {
        for bad in [json!("-0.5"), json!(-0.9), json!("-0.0"), json!(" -0.2")] {
            assert!(
                matches!(coerce_age(1, &bad), Err(DomainError::InvalidAge { record: 1, .. })),
                "{bad} should be rejected"
            );
        }
        assert_eq!(coerce_age(1, &json!("0.0")).unwrap(), 0);
        assert_eq!(coerce_age(1, &json!(0.4)).unwrap(), 0);
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(coerce_integer(0, "year", &json!(2023)).unwrap(), 2023);
        assert_eq!(coerce_integer(0, "weeknum", &json!("12")).unwrap(), 12);
        assert!(coerce_integer(0, "weeknum", &json!(1.5)).is_err());
        assert!(coerce_integer(0, "weeknum", &json!(null)).is_err());
    }

    #[test]
    fn test_strip_unit_marker_removes_every_occurrence() {
        assert_eq!(strip_unit_marker("20-29 ปี"), "20-29 ");
        assert_eq!(strip_unit_marker("ปีปี"), "");
        assert_eq!(strip_unit_marker("unknown"), "unknown");
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(coerce_text(&json!(null)), "");
        assert_eq!(coerce_text(&json!(12)), "12");
        assert_eq!(coerce_text(&json!("กรุงเทพมหานคร")), "กรุงเทพมหานคร");
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 16)
            .unwrap()
            .and_hms_opt(7, 36, 13)
            .unwrap();
        assert_eq!(parse_timestamp(0, &json!("2023-01-16 07:36:13")).unwrap(), expected);
        assert_eq!(parse_timestamp(0, &json!("2023-01-16T07:36:13")).unwrap(), expected);
        assert_eq!(
            parse_timestamp(0, &json!("2023-01-16T07:36:13+07:00")).unwrap(),
            expected
        );
        assert_eq!(
            parse_timestamp(0, &json!("2023-01-16")).unwrap(),
            expected.date().and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_fractional_seconds_are_parsed() {
        let parsed = parse_timestamp(0, &json!("2023-01-16 07:36:13.123456")).unwrap();
        let expected = NaiveDate::from_ymd_opt(2023, 1, 16)
            .unwrap()
            .and_hms_micro_opt(7, 36, 13, 123_456)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_bad_timestamps_are_rejected() {
        for bad in [json!("16/01/2023"), json!(1673854573), json!(null), json!("")] {
            assert!(matches!(
                parse_timestamp(2, &bad),
                Err(DomainError::InvalidTimestamp { record: 2, .. })
            ));
        }
    }
}
