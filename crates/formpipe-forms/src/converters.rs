//! Field converters.
//!
//! A [`Converter`] turns a validated string into a typed [`Value`]. It runs
//! at most once per field per load, and only when the field's validator chain
//! succeeded. Plain closures become converters through [`converter_fn`].
//!
//! Numeric converters report failures with human-readable messages:
//! "that number is out of range" (code `out_of_range`) and
//! "that is not a number" (code `not_a_number`).

use std::fmt;
use std::num::IntErrorKind;

use chrono::{NaiveTime, TimeZone, Utc};
use formpipe_core::ValidationError;

use crate::validators::parse_date;
use crate::value::Value;

/// A trait for converting a validated string into a typed value.
///
/// # Examples
///
/// ```
/// use formpipe_forms::converters::{Converter, IntConverter};
/// use formpipe_forms::value::Value;
///
/// assert_eq!(IntConverter.convert("-10").unwrap(), Value::Int(-10));
/// assert_eq!(
///     IntConverter.convert("ten").unwrap_err().to_string(),
///     "that is not a number"
/// );
/// ```
pub trait Converter: Send + Sync {
    /// Converts `input` into a typed value.
    fn convert(&self, input: &str) -> Result<Value, ValidationError>;

    /// Returns a human-readable name for this converter.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Adapts a closure into a [`Converter`]. Build one with [`converter_fn`].
pub struct ConverterFn<F>(F);

/// Wraps `f` so it can be used anywhere a [`Converter`] is expected.
///
/// # Examples
///
/// ```
/// use formpipe_forms::converters::{converter_fn, Converter};
/// use formpipe_forms::value::Value;
///
/// let length = converter_fn(|input| Ok(Value::Int(input.len() as i64)));
/// assert_eq!(length.convert("four").unwrap(), Value::Int(4));
/// ```
pub fn converter_fn<F>(f: F) -> ConverterFn<F>
where
    F: Fn(&str) -> Result<Value, ValidationError> + Send + Sync,
{
    ConverterFn(f)
}

impl<F> Converter for ConverterFn<F>
where
    F: Fn(&str) -> Result<Value, ValidationError> + Send + Sync,
{
    fn convert(&self, input: &str) -> Result<Value, ValidationError> {
        (self.0)(input)
    }

    fn name(&self) -> &str {
        "ConverterFn"
    }
}

impl<F> fmt::Debug for ConverterFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterFn").finish_non_exhaustive()
    }
}

fn out_of_range() -> ValidationError {
    ValidationError::new("that number is out of range", "out_of_range")
}

fn not_a_number() -> ValidationError {
    ValidationError::new("that is not a number", "not_a_number")
}

/// `true` when the input spells infinity itself rather than overflowing to it.
fn is_literal_infinity(input: &str) -> bool {
    let unsigned = input.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Parses a base-10 signed integer into [`Value::Int`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntConverter;

impl Converter for IntConverter {
    fn convert(&self, input: &str) -> Result<Value, ValidationError> {
        input.parse::<i64>().map(Value::Int).map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
            _ => not_a_number(),
        })
    }

    fn name(&self) -> &str {
        "IntConverter"
    }
}

/// Parses a decimal floating-point number into [`Value::Float32`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Float32Converter;

impl Converter for Float32Converter {
    fn convert(&self, input: &str) -> Result<Value, ValidationError> {
        let f = input.parse::<f32>().map_err(|_| not_a_number())?;
        if f.is_infinite() && !is_literal_infinity(input) {
            return Err(out_of_range());
        }
        Ok(Value::Float32(f))
    }

    fn name(&self) -> &str {
        "Float32Converter"
    }
}

/// Parses a decimal floating-point number into [`Value::Float`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Float64Converter;

impl Converter for Float64Converter {
    fn convert(&self, input: &str) -> Result<Value, ValidationError> {
        let f = input.parse::<f64>().map_err(|_| not_a_number())?;
        if f.is_infinite() && !is_literal_infinity(input) {
            return Err(out_of_range());
        }
        Ok(Value::Float(f))
    }

    fn name(&self) -> &str {
        "Float64Converter"
    }
}

/// Parses checkbox-style booleans into [`Value::Bool`].
///
/// `true`, `1`, `yes`, `on`, `t` are true; `false`, `0`, `no`, `off`, `f`
/// and the empty string (an unchecked checkbox is never submitted) are
/// false. Matching is case-insensitive. Anything else fails with
/// "that is not a boolean" (code `invalid_boolean`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConverter;

impl Converter for BoolConverter {
    fn convert(&self, input: &str) -> Result<Value, ValidationError> {
        match input.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" | "f" | "" => Ok(Value::Bool(false)),
            _ => Err(ValidationError::new("that is not a boolean", "invalid_boolean")),
        }
    }

    fn name(&self) -> &str {
        "BoolConverter"
    }
}

/// Parses a `YYYY-MM-DD` date into [`Value::DateTime`] at midnight UTC.
///
/// Fails with "invalid time: YYYY-MM-DD" (code `invalid_time`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeConverter;

impl Converter for TimeConverter {
    fn convert(&self, input: &str) -> Result<Value, ValidationError> {
        let date = parse_date(input)
            .ok_or_else(|| ValidationError::new("invalid time: YYYY-MM-DD", "invalid_time"))?;
        let midnight = date.and_time(NaiveTime::MIN);
        Ok(Value::DateTime(Utc.from_utc_datetime(&midnight)))
    }

    fn name(&self) -> &str {
        "TimeConverter"
    }
}

/// Parses a hyphenated or simple UUID into [`Value::Uuid`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidConverter;

impl Converter for UuidConverter {
    fn convert(&self, input: &str) -> Result<Value, ValidationError> {
        uuid::Uuid::parse_str(input)
            .map(Value::Uuid)
            .map_err(|_| ValidationError::new("that is not a valid UUID", "invalid_uuid"))
    }

    fn name(&self) -> &str {
        "UuidConverter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_converter_range() {
        for i in -10_i64..=10 {
            assert_eq!(IntConverter.convert(&i.to_string()).unwrap(), Value::Int(i));
        }
    }

    #[test]
    fn test_int_converter_plus_sign() {
        assert_eq!(IntConverter.convert("+7").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_int_converter_errors() {
        let err = IntConverter.convert("bar").unwrap_err();
        assert_eq!(err.message, "that is not a number");
        assert_eq!(err.code, "not_a_number");

        assert_eq!(IntConverter.convert("").unwrap_err().code, "not_a_number");
        assert_eq!(IntConverter.convert("1.5").unwrap_err().code, "not_a_number");

        let err = IntConverter.convert("9223372036854775808").unwrap_err();
        assert_eq!(err.message, "that number is out of range");
        assert_eq!(
            IntConverter.convert("-9223372036854775809").unwrap_err().code,
            "out_of_range"
        );
    }

    #[test]
    fn test_float32_converter() {
        assert_eq!(
            Float32Converter.convert("123.456").unwrap(),
            Value::Float32(123.456_f32)
        );
        assert_eq!(
            Float32Converter.convert("1e39").unwrap_err().code,
            "out_of_range"
        );
        assert_eq!(Float32Converter.convert("pi").unwrap_err().code, "not_a_number");
    }

    #[test]
    fn test_float64_converter() {
        assert_eq!(
            Float64Converter.convert("123.456").unwrap(),
            Value::Float(123.456_f64)
        );
        assert_eq!(Float64Converter.convert("-2").unwrap(), Value::Float(-2.0));
        let err = Float64Converter.convert("1e400").unwrap_err();
        assert_eq!(err.message, "that number is out of range");
        assert_eq!(Float64Converter.convert("").unwrap_err().code, "not_a_number");
    }

    #[test]
    fn test_float_literal_infinity_is_not_overflow() {
        assert_eq!(
            Float64Converter.convert("-Infinity").unwrap(),
            Value::Float(f64::NEG_INFINITY)
        );
        assert_eq!(
            Float32Converter.convert("inf").unwrap(),
            Value::Float32(f32::INFINITY)
        );
    }

    #[test]
    fn test_bool_converter() {
        for t in ["on", "ON", "true", "1", "yes", "t"] {
            assert_eq!(BoolConverter.convert(t).unwrap(), Value::Bool(true), "input {t:?}");
        }
        for f in ["off", "false", "0", "no", "f", "False", ""] {
            assert_eq!(BoolConverter.convert(f).unwrap(), Value::Bool(false), "input {f:?}");
        }
        let err = BoolConverter.convert("maybe").unwrap_err();
        assert_eq!(err.message, "that is not a boolean");
    }

    #[test]
    fn test_time_converter() {
        let v = TimeConverter.convert("1978-07-10").unwrap();
        let expected = Utc.with_ymd_and_hms(1978, 7, 10, 0, 0, 0).unwrap();
        assert_eq!(v, Value::DateTime(expected));
    }

    #[test]
    fn test_time_converter_error() {
        for bad in ["07/10/1978", "1978-7-10", "1978-07-1", "+1978-07-10", " 1978-07-10"] {
            let err = TimeConverter.convert(bad).unwrap_err();
            assert_eq!(err.message, "invalid time: YYYY-MM-DD", "input {bad:?}");
            assert_eq!(err.code, "invalid_time");
        }
    }

    #[test]
    fn test_uuid_converter() {
        let v = UuidConverter
            .convert("67e55044-10b1-426f-9247-bb680e5fe0c8")
            .unwrap();
        assert_eq!(
            v.as_uuid().map(|u| u.to_string()),
            Some("67e55044-10b1-426f-9247-bb680e5fe0c8".to_string())
        );
        assert_eq!(UuidConverter.convert("nope").unwrap_err().code, "invalid_uuid");
    }

    #[test]
    fn test_converter_fn() {
        let c = converter_fn(|input| {
            input
                .split(',')
                .map(str::trim)
                .map(|part| part.parse::<i64>().map_err(|_| ValidationError::invalid("bad list")))
                .sum::<Result<i64, _>>()
                .map(Value::Int)
        });
        assert_eq!(c.convert("1, 2, 3").unwrap(), Value::Int(6));
        assert_eq!(c.convert("1, x").unwrap_err().message, "bad list");
        assert_eq!(c.name(), "ConverterFn");
    }
}
