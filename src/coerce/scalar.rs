//! Scalar conversions.

use super::coerced::Coerced;
use super::descriptor::ScalarKind;
use crate::error::{Error, Result};
use crate::value::{Number, Value, canonical_string, describe};

pub(crate) fn coerce_scalar(value: &Value, kind: ScalarKind) -> Result<Coerced> {
    match kind {
        ScalarKind::Bool => to_bool(value).map(Coerced::Bool),
        ScalarKind::Byte => to_integer(value, kind, |n| n as i8).map(Coerced::Byte),
        ScalarKind::Short => to_integer(value, kind, |n| n as i16).map(Coerced::Short),
        ScalarKind::Int => to_integer(value, kind, |n| n as i32).map(Coerced::Int),
        ScalarKind::Long => to_integer(value, kind, |n| n).map(Coerced::Long),
        ScalarKind::Float => to_float(value, kind).map(|f| Coerced::Float(f as f32)),
        ScalarKind::Double => to_float(value, kind).map(Coerced::Double),
        ScalarKind::String => Ok(canonical_string(value).map_or(Coerced::Null, Coerced::Text)),
    }
}

/// Only the exact text `true` is true; any other text is false.
fn to_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => Ok(s == "true"),
        other => Err(Error::coercion(describe(other), ScalarKind::Bool.as_str())),
    }
}

/// Integers narrow by truncation, without overflow checks. Text parses as
/// base 10 at the target width.
fn to_integer<T>(value: &Value, kind: ScalarKind, narrow: fn(i64) -> T) -> Result<T>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    match value {
        Value::Number(n) => Ok(narrow(number_as_i64(n))),
        Value::String(s) => s
            .parse::<T>()
            .map_err(|e| Error::coercion_caused_by(s.as_str(), kind.as_str(), e)),
        other => Err(Error::coercion(describe(other), kind.as_str())),
    }
}

fn number_as_i64(n: &Number) -> i64 {
    if let Some(i) = n.as_i64() {
        i
    } else if let Some(u) = n.as_u64() {
        u as i64
    } else {
        n.as_f64().map_or(0, |f| f as i64)
    }
}

fn to_float(value: &Value, kind: ScalarKind) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => parse_float(s)
            .map_err(|e| Error::coercion_caused_by(s.as_str(), kind.as_str(), e)),
        other => Err(Error::coercion(describe(other), kind.as_str())),
    }
}

/// Decimal syntax plus the literal tokens `Infinity`, `-Infinity` and `NaN`.
///
/// Other spellings of the specials (`inf`, `nan`, `infinity`) are rejected.
fn parse_float(s: &str) -> std::result::Result<f64, std::num::ParseFloatError> {
    match s.trim() {
        "Infinity" | "+Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        "NaN" => Ok(f64::NAN),
        trimmed if !is_decimal(trimmed) => "x".parse::<f64>(),
        trimmed => trimmed.parse::<f64>(),
    }
}

fn is_decimal(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bool_leniency() {
        assert_eq!(coerce_scalar(&json!("true"), ScalarKind::Bool).unwrap(), Coerced::Bool(true));
        assert_eq!(coerce_scalar(&json!("off"), ScalarKind::Bool).unwrap(), Coerced::Bool(false));
        assert_eq!(coerce_scalar(&json!("TRUE"), ScalarKind::Bool).unwrap(), Coerced::Bool(false));
        assert_eq!(coerce_scalar(&json!(false), ScalarKind::Bool).unwrap(), Coerced::Bool(false));
    }

    #[test]
    fn test_bool_rejects_number() {
        let err = coerce_scalar(&json!(10), ScalarKind::Bool).unwrap_err();
        assert_eq!(err.to_string(), "can't parse [10] to be Boolean");
    }

    #[test]
    fn test_integer_narrowing_truncates() {
        assert_eq!(coerce_scalar(&json!(100), ScalarKind::Byte).unwrap(), Coerced::Byte(100));
        assert_eq!(coerce_scalar(&json!(300), ScalarKind::Byte).unwrap(), Coerced::Byte(44));
        assert_eq!(coerce_scalar(&json!(70000), ScalarKind::Short).unwrap(), Coerced::Short(4464));
        assert_eq!(coerce_scalar(&json!(5.9), ScalarKind::Int).unwrap(), Coerced::Int(5));
        assert_eq!(
            coerce_scalar(&json!(u64::MAX), ScalarKind::Long).unwrap(),
            Coerced::Long(-1)
        );
    }

    #[test]
    fn test_integer_from_text() {
        assert_eq!(coerce_scalar(&json!("10"), ScalarKind::Byte).unwrap(), Coerced::Byte(10));
        assert_eq!(coerce_scalar(&json!("-42"), ScalarKind::Long).unwrap(), Coerced::Long(-42));
    }

    #[test]
    fn test_integer_text_out_of_range_or_malformed() {
        let err = coerce_scalar(&json!("ttt"), ScalarKind::Byte).unwrap_err();
        assert_eq!(err.to_string(), "can't parse [ttt] to be Byte");
        assert!(std::error::Error::source(&err).is_some());
        assert!(coerce_scalar(&json!("300"), ScalarKind::Byte).is_err());
    }

    #[test]
    fn test_integer_rejects_map() {
        let err = coerce_scalar(&json!({"A": "a"}), ScalarKind::Int).unwrap_err();
        assert_eq!(err.to_string(), r#"can't parse [{"A":"a"}] to be Integer"#);
    }

    #[test]
    fn test_float_specials() {
        assert_eq!(
            coerce_scalar(&json!("Infinity"), ScalarKind::Float).unwrap(),
            Coerced::Float(f32::INFINITY)
        );
        assert_eq!(
            coerce_scalar(&json!("-Infinity"), ScalarKind::Double).unwrap(),
            Coerced::Double(f64::NEG_INFINITY)
        );
        match coerce_scalar(&json!("NaN"), ScalarKind::Double).unwrap() {
            Coerced::Double(d) => assert!(d.is_nan()),
            other => panic!("expected double, got {other:?}"),
        }
    }

    #[test]
    fn test_float_from_number_and_text() {
        assert_eq!(coerce_scalar(&json!(5.3), ScalarKind::Float).unwrap(), Coerced::Float(5.3));
        assert_eq!(coerce_scalar(&json!("5.3"), ScalarKind::Double).unwrap(), Coerced::Double(5.3));
        assert_eq!(
            coerce_scalar(&json!("1.23015E6"), ScalarKind::Double).unwrap(),
            Coerced::Double(1230150.0)
        );
        assert!(coerce_scalar(&json!("ttt"), ScalarKind::Float).is_err());
    }

    #[test]
    fn test_float_rejects_other_special_spellings() {
        for text in ["inf", "+inf", "-inf", "INF", "infinity", "-infinity", "nan", "NAN", "Inf"] {
            assert!(
                coerce_scalar(&json!(text), ScalarKind::Double).is_err(),
                "{text} should not parse"
            );
            assert!(coerce_scalar(&json!(text), ScalarKind::Float).is_err());
        }
        assert_eq!(
            coerce_scalar(&json!(" Infinity "), ScalarKind::Double).unwrap(),
            Coerced::Double(f64::INFINITY)
        );
        assert_eq!(coerce_scalar(&json!("-2.5e-1"), ScalarKind::Double).unwrap(), Coerced::Double(-0.25));
    }

    #[test]
    fn test_string_of_scalars() {
        assert_eq!(
            coerce_scalar(&json!(10), ScalarKind::String).unwrap(),
            Coerced::Text("10".into())
        );
        assert_eq!(
            coerce_scalar(&json!(true), ScalarKind::String).unwrap(),
            Coerced::Text("true".into())
        );
        assert_eq!(coerce_scalar(&Value::Null, ScalarKind::String).unwrap(), Coerced::Null);
    }
}
