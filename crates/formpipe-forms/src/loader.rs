//! The aggregate loading stage.
//!
//! A [`Loader`] receives the complete map of converted values once every
//! field has validated and converted cleanly. It may check constraints that
//! span several fields and build the final domain value.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use formpipe_core::ValidationError;

use crate::value::Values;

/// What a [`Loader`] hands back to the form.
///
/// The three parts are independent: a loader may return a value together
/// with errors, and both per-field and form-level errors at once. The form
/// merges all of them into its result.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderOutput<T> {
    /// The constructed value, if any.
    pub value: Option<T>,
    /// Problems attributable to individual fields.
    pub field_errors: HashMap<String, ValidationError>,
    /// A problem not attributable to any single field.
    pub form_error: Option<ValidationError>,
}

impl<T> Default for LoaderOutput<T> {
    fn default() -> Self {
        Self {
            value: None,
            field_errors: HashMap::new(),
            form_error: None,
        }
    }
}

impl<T> LoaderOutput<T> {
    /// A successful load producing `value`.
    pub fn value(value: T) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// A failed load with a single form-level error.
    pub fn form_error(error: ValidationError) -> Self {
        Self {
            form_error: Some(error),
            ..Self::default()
        }
    }

    /// A failed load with one error for `field`.
    pub fn field_error(field: impl Into<String>, error: ValidationError) -> Self {
        Self::default().with_field_error(field, error)
    }

    /// Adds an error for `field`, replacing any earlier error for it.
    #[must_use]
    pub fn with_field_error(mut self, field: impl Into<String>, error: ValidationError) -> Self {
        self.field_errors.insert(field.into(), error);
        self
    }

    /// Sets the form-level error.
    #[must_use]
    pub fn with_form_error(mut self, error: ValidationError) -> Self {
        self.form_error = Some(error);
        self
    }

    /// Returns `true` if neither field nor form errors were reported.
    pub fn is_ok(&self) -> bool {
        self.field_errors.is_empty() && self.form_error.is_none()
    }
}

/// Builds the final value of a form from its converted fields.
///
/// Called at most once per `Form::load`, and only when no field failed.
///
/// # Examples
///
/// ```
/// use formpipe_core::ValidationError;
/// use formpipe_forms::loader::{Loader, LoaderOutput};
/// use formpipe_forms::value::{Value, Values};
///
/// struct PasswordLoader;
///
/// impl Loader for PasswordLoader {
///     type Output = String;
///
///     fn load(&self, values: Values) -> LoaderOutput<String> {
///         let password = values.get("password").and_then(Value::as_str);
///         let confirm = values.get("confirm").and_then(Value::as_str);
///         match (password, confirm) {
///             (Some(p), Some(c)) if p == c => LoaderOutput::value(p.to_string()),
///             _ => LoaderOutput::field_error(
///                 "confirm",
///                 ValidationError::new("passwords do not match", "mismatch"),
///             ),
///         }
///     }
/// }
///
/// let mut values = Values::new();
/// values.insert("password".into(), Value::from("hunter2"));
/// values.insert("confirm".into(), Value::from("hunter3"));
/// let out = PasswordLoader.load(values);
/// assert!(out.value.is_none());
/// assert!(out.field_errors.contains_key("confirm"));
/// ```
pub trait Loader: Send + Sync {
    /// The value this loader constructs.
    type Output;

    /// Builds the final value from the complete converted map.
    fn load(&self, values: Values) -> LoaderOutput<Self::Output>;
}

/// Adapts a closure into a [`Loader`]. Build one with [`loader_fn`].
pub struct LoaderFn<F, T> {
    f: F,
    _output: PhantomData<fn() -> T>,
}

/// Wraps `f` so it can be used anywhere a [`Loader`] is expected.
///
/// # Examples
///
/// ```
/// use formpipe_forms::loader::{loader_fn, Loader, LoaderOutput};
/// use formpipe_forms::value::Values;
///
/// let count = loader_fn(|values: Values| LoaderOutput::value(values.len()));
/// assert_eq!(count.load(Values::new()).value, Some(0));
/// ```
pub fn loader_fn<F, T>(f: F) -> LoaderFn<F, T>
where
    F: Fn(Values) -> LoaderOutput<T> + Send + Sync,
{
    LoaderFn {
        f,
        _output: PhantomData,
    }
}

impl<F, T> Loader for LoaderFn<F, T>
where
    F: Fn(Values) -> LoaderOutput<T> + Send + Sync,
{
    type Output = T;

    fn load(&self, values: Values) -> LoaderOutput<T> {
        (self.f)(values)
    }
}

impl<F, T> fmt::Debug for LoaderFn<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderFn").finish_non_exhaustive()
    }
}
