//! The outcome of one form load.

use std::collections::HashMap;

use formpipe_core::ValidationError;

use crate::value::Values;

/// Everything [`Form::load`](crate::form::Form::load) learned about one
/// submission.
///
/// A `LoadResult` is built fresh by every load and cannot be modified
/// afterwards; use the accessors to read it, or [`into_value`](Self::into_value)
/// to take the constructed value.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult<T = Values> {
    pub(crate) value: Option<T>,
    pub(crate) raw_values: HashMap<String, String>,
    pub(crate) field_errors: HashMap<String, ValidationError>,
    pub(crate) form_error: Option<ValidationError>,
}

impl<T> LoadResult<T> {
    /// Returns `true` if no field or form errors were recorded.
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty() && self.form_error.is_none()
    }

    /// The constructed value: the converted map, or the loader's output.
    ///
    /// Always `None` when any field failed validation or conversion.
    pub const fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Takes the constructed value.
    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// The raw submitted string for every declared field, for re-displaying
    /// the form.
    pub const fn raw_values(&self) -> &HashMap<String, String> {
        &self.raw_values
    }

    /// The raw submitted string for one field.
    pub fn raw_value(&self, name: &str) -> Option<&str> {
        self.raw_values.get(name).map(String::as_str)
    }

    /// Errors keyed by field name, from the field pass or the loader.
    pub const fn field_errors(&self) -> &HashMap<String, ValidationError> {
        &self.field_errors
    }

    /// The error recorded for one field.
    pub fn field_error(&self, name: &str) -> Option<&ValidationError> {
        self.field_errors.get(name)
    }

    /// The error not attributable to any single field.
    pub const fn form_error(&self) -> Option<&ValidationError> {
        self.form_error.as_ref()
    }

    /// All error messages as `(field, message)` pairs sorted by field name.
    /// The form-level error, if any, comes first under the name `"__form__"`.
    pub fn errors_as_strings(&self) -> Vec<(String, String)> {
        let mut field_errors: Vec<(String, String)> = self
            .field_errors
            .iter()
            .map(|(name, err)| (name.clone(), err.to_string()))
            .collect();
        field_errors.sort();

        self.form_error
            .iter()
            .map(|err| ("__form__".to_string(), err.to_string()))
            .chain(field_errors)
            .collect()
    }
}
