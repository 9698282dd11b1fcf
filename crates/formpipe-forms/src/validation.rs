//! The per-field pass of a form load.
//!
//! Every declared field is read, recorded, validated, and converted in
//! declaration order. Field errors accumulate rather than short-circuiting,
//! so one pass reports every failing field.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use formpipe_core::ValidationError;

use crate::fields::Field;
use crate::input::FieldAccessor;
use crate::value::Values;

/// Everything the per-field pass learned about one submission.
#[derive(Debug, Default)]
pub struct FieldPass {
    /// Raw input per field name, recorded before validation.
    pub raw_values: HashMap<String, String>,
    /// The failure that stopped each rejected field.
    pub field_errors: HashMap<String, ValidationError>,
    /// Typed values of the fields that succeeded.
    pub converted: Values,
    /// Set when a plugin panicked under panic recovery. Later fields still
    /// have their raw values recorded but no plugin runs for them.
    pub panic: Option<ValidationError>,
}

impl FieldPass {
    /// Returns `true` when every field validated and converted.
    pub fn is_clean(&self) -> bool {
        self.field_errors.is_empty() && self.panic.is_none()
    }
}

/// Runs validation and conversion for all fields.
///
/// For each field, in order:
/// 1. Reads the raw value; a missing key reads as `""`
/// 2. Records it in `raw_values`
/// 3. Runs [`Field::clean`], storing either the typed value or the error
///
/// A later field with a duplicate name overwrites whatever an earlier one
/// wrote to the same map. Entries in the other maps are left alone, so a
/// failed duplicate still blocks the form even if its twin succeeded.
pub fn clean_fields<I>(fields: &[Field], input: &I, recover_panics: bool) -> FieldPass
where
    I: FieldAccessor + ?Sized,
{
    let mut pass = FieldPass::default();

    for field in fields {
        let raw = input.value(&field.name).unwrap_or_default();
        pass.raw_values.insert(field.name.clone(), raw.to_string());
        if pass.panic.is_some() {
            continue;
        }

        let outcome = match guard(recover_panics, &field.name, || field.clean(raw)) {
            Ok(outcome) => outcome,
            Err(panicked) => {
                pass.panic = Some(panicked);
                continue;
            }
        };

        match outcome {
            Ok(value) => {
                tracing::trace!(field = %field.name, kind = value.type_name(), "field clean");
                pass.converted.insert(field.name.clone(), value);
            }
            Err(err) => {
                tracing::debug!(field = %field.name, code = %err.code, "field rejected");
                pass.field_errors.insert(field.name.clone(), err);
            }
        }
    }

    pass
}

/// Runs `f`, turning a panic into a `panic`-coded error when `recover` is set.
///
/// Without `recover` the panic unwinds to the caller untouched.
pub(crate) fn guard<R>(
    recover: bool,
    stage: &str,
    f: impl FnOnce() -> R,
) -> Result<R, ValidationError> {
    if !recover {
        return Ok(f());
    }

    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::error!(stage, %detail, "plugin panicked");
        ValidationError::new(format!("internal error while processing {stage}"), "panic")
            .with_param("stage", stage)
            .with_param("detail", detail)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::{converter_fn, IntConverter};
    use crate::validators::{validator_fn, NonEmptyValidator};
    use crate::value::Value;

    fn input(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_clean_fields_valid() {
        let fields = vec![
            Field::new("name").validator(NonEmptyValidator),
            Field::new("age").converter(IntConverter),
        ];
        let pass = clean_fields(&fields, &input(&[("name", "Alice"), ("age", "30")]), false);

        assert!(pass.is_clean());
        assert_eq!(pass.converted.get("name"), Some(&Value::from("Alice")));
        assert_eq!(pass.converted.get("age"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_clean_fields_errors_accumulate() {
        let fields = vec![
            Field::new("name").validator(NonEmptyValidator),
            Field::new("age").converter(IntConverter),
        ];
        let pass = clean_fields(&fields, &input(&[("age", "old")]), false);

        assert!(pass.field_errors.contains_key("name"));
        assert!(pass.field_errors.contains_key("age"));
        assert!(pass.converted.is_empty());
    }

    #[test]
    fn test_clean_fields_partial_valid() {
        let fields = vec![
            Field::new("name"),
            Field::new("age").converter(IntConverter),
        ];
        let pass = clean_fields(&fields, &input(&[("name", "Alice"), ("age", "x")]), false);

        assert_eq!(pass.converted.get("name"), Some(&Value::from("Alice")));
        assert!(!pass.converted.contains_key("age"));
        assert!(pass.field_errors.contains_key("age"));
        assert!(!pass.field_errors.contains_key("name"));
    }

    #[test]
    fn test_raw_values_recorded_for_every_field() {
        let fields = vec![
            Field::new("ok"),
            Field::new("bad").validator(NonEmptyValidator),
            Field::new("absent"),
        ];
        let pass = clean_fields(&fields, &input(&[("ok", "1"), ("bad", "")]), false);

        assert_eq!(pass.raw_values.len(), 3);
        assert_eq!(pass.raw_values["ok"], "1");
        assert_eq!(pass.raw_values["bad"], "");
        assert_eq!(pass.raw_values["absent"], "");
    }

    #[test]
    fn test_missing_key_reads_as_empty() {
        let fields = vec![Field::new("foo")];
        let pass = clean_fields(&fields, &input(&[]), false);
        assert_eq!(pass.converted.get("foo"), Some(&Value::from("")));
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let fields = vec![
            Field::new("dup").converter(IntConverter),
            Field::new("dup"),
        ];
        let pass = clean_fields(&fields, &input(&[("dup", "x")]), false);
        assert_eq!(pass.field_errors["dup"].code, "not_a_number");
        assert_eq!(pass.converted.get("dup"), Some(&Value::from("x")));
        assert!(!pass.is_clean());

        let fields = vec![
            Field::new("dup"),
            Field::new("dup").converter(IntConverter),
        ];
        let pass = clean_fields(&fields, &input(&[("dup", "x")]), false);
        assert!(pass.field_errors.contains_key("dup"));
        assert_eq!(pass.converted.get("dup"), Some(&Value::from("x")));

        let fields = vec![
            Field::new("dup").converter(IntConverter),
            Field::new("dup").converter(converter_fn(|_| Ok(Value::Bool(true)))),
        ];
        let pass = clean_fields(&fields, &input(&[("dup", "7")]), false);
        assert_eq!(pass.converted.get("dup"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_panic_recovered_skips_later_plugins() {
        let fields = vec![
            Field::new("first"),
            Field::new("boom").validator(validator_fn(|_| panic!("validator exploded"))),
            Field::new("never").converter(converter_fn(|_| panic!("must not run"))),
        ];
        let pass = clean_fields(&fields, &input(&[("never", "kept")]), true);

        let err = pass.panic.as_ref().unwrap();
        assert_eq!(err.code, "panic");
        assert_eq!(err.params.get("stage").map(String::as_str), Some("boom"));
        assert_eq!(
            err.params.get("detail").map(String::as_str),
            Some("validator exploded")
        );
        assert!(!pass.is_clean());
        assert!(pass.raw_values.contains_key("boom"));
        assert_eq!(pass.raw_values.get("never").map(String::as_str), Some("kept"));
        assert!(!pass.converted.contains_key("never"));
        assert!(!pass.field_errors.contains_key("never"));
    }

    #[test]
    #[should_panic(expected = "validator exploded")]
    fn test_panic_propagates_without_recovery() {
        let fields = vec![Field::new("boom").validator(validator_fn(|_| panic!("validator exploded")))];
        let _ = clean_fields(&fields, &input(&[]), false);
    }

    #[test]
    fn test_guard_formats_string_payload() {
        let err = guard::<()>(true, "loader", || panic!("{}", String::from("owned"))).unwrap_err();
        assert_eq!(err.params.get("detail").map(String::as_str), Some("owned"));
        assert_eq!(err.message, "internal error while processing loader");
    }
}
