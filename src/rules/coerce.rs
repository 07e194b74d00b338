//! Rule-local type coercion.
//!
//! Each conversion returns a `Result`; rules turn an `Err` into an `Invalid Type` finding and
//! never fall back to a default.

use thiserror::Error;

use crate::types::Value;

/// A raw value could not be read as the type a rule expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read '{raw}' as {expected}")]
pub struct CoercionError {
    pub expected: &'static str,
    pub raw: String,
}

impl CoercionError {
    fn new(expected: &'static str, v: &Value) -> Self {
        Self {
            expected,
            raw: v.to_string(),
        }
    }
}

/// Result of reading a value as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integral {
    /// The value truncated toward zero.
    pub value: i64,
    /// `true` if the source was a number with a non-zero fractional part.
    pub fractional: bool,
}

/// Read a value as a real number.
///
/// Null reads as `NaN` so that range checks classify a missing number as out of range rather
/// than as a type error.
pub fn to_real(v: &Value) -> Result<f64, CoercionError> {
    match v {
        Value::Null => Ok(f64::NAN),
        Value::Int64(i) => Ok(*i as f64),
        Value::Float64(f) => Ok(*f),
        Value::Utf8(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CoercionError::new("a number", v)),
        Value::Bool(_) => Err(CoercionError::new("a number", v)),
    }
}

/// Read a value as an integer.
///
/// Finite floats (and numeric text) are accepted and truncated; the `fractional` flag records
/// whether anything was cut off. Null, NaN, infinities, booleans and non-numeric text fail.
pub fn to_integer(v: &Value) -> Result<Integral, CoercionError> {
    match v {
        Value::Int64(i) => Ok(Integral {
            value: *i,
            fractional: false,
        }),
        Value::Float64(f) => float_to_integral(*f).ok_or_else(|| CoercionError::new("an integer", v)),
        Value::Utf8(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Integral {
                    value: i,
                    fractional: false,
                });
            }
            s.parse::<f64>()
                .ok()
                .and_then(float_to_integral)
                .ok_or_else(|| CoercionError::new("an integer", v))
        }
        Value::Null | Value::Bool(_) => Err(CoercionError::new("an integer", v)),
    }
}

fn float_to_integral(f: f64) -> Option<Integral> {
    if !f.is_finite() {
        return None;
    }
    let truncated = f.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(Integral {
        value: truncated as i64,
        fractional: f.fract() != 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::{Integral, to_integer, to_real};
    use crate::types::Value;

    #[test]
    fn to_real_accepts_numbers_and_numeric_text() {
        assert_eq!(to_real(&Value::Int64(3)), Ok(3.0));
        assert_eq!(to_real(&Value::Float64(2.5)), Ok(2.5));
        assert_eq!(to_real(&Value::Utf8(" 88.5 ".to_string())), Ok(88.5));
        assert!(to_real(&Value::Null).unwrap().is_nan());
    }

    #[test]
    fn to_real_rejects_text_and_bools() {
        let err = to_real(&Value::Utf8("abc".to_string())).unwrap_err();
        assert_eq!(err.raw, "abc");
        assert!(to_real(&Value::Bool(true)).is_err());
    }

    #[test]
    fn to_integer_flags_fractions() {
        assert_eq!(
            to_integer(&Value::Float64(2.5)),
            Ok(Integral {
                value: 2,
                fractional: true
            })
        );
        assert_eq!(
            to_integer(&Value::Float64(-3.0)),
            Ok(Integral {
                value: -3,
                fractional: false
            })
        );
        assert_eq!(
            to_integer(&Value::Utf8("1.5".to_string())),
            Ok(Integral {
                value: 1,
                fractional: true
            })
        );
        assert_eq!(to_integer(&Value::Utf8("42".to_string())).unwrap().value, 42);
    }

    #[test]
    fn to_integer_rejects_non_numbers() {
        assert!(to_integer(&Value::Null).is_err());
        assert!(to_integer(&Value::Float64(f64::NAN)).is_err());
        assert!(to_integer(&Value::Float64(f64::INFINITY)).is_err());
        assert!(to_integer(&Value::Utf8("ten".to_string())).is_err());
        assert!(to_integer(&Value::Bool(false)).is_err());
    }
}
