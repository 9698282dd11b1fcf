//! Forms and the load pipeline.
//!
//! A [`Form`] is an ordered list of [`Field`]s plus an optional [`Loader`].
//! [`Form::load`] runs every field over the submitted input, then hands the
//! converted values to the loader when nothing failed.

use std::fmt;

use formpipe_core::logging::form_span;
use formpipe_core::Settings;

use crate::fields::Field;
use crate::input::FieldAccessor;
use crate::loader::Loader;
use crate::result::LoadResult;
use crate::validation::{clean_fields, guard};
use crate::value::Values;

/// How a form turns its converted map into the final value.
enum Assembly<T> {
    Converted(fn(Values) -> T),
    Loader(Box<dyn Loader<Output = T>>),
}

/// A declared form.
///
/// Without a loader, a successful load yields the converted map itself
/// ([`Values`]). [`with_loader`](Form::with_loader) switches the form to the
/// loader's output type.
///
/// A form is immutable once built and may be shared between threads; every
/// call to [`load`](Form::load) produces an independent [`LoadResult`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use formpipe_forms::converters::IntConverter;
/// use formpipe_forms::fields::Field;
/// use formpipe_forms::form::Form;
/// use formpipe_forms::validators::NonEmptyValidator;
/// use formpipe_forms::value::Value;
///
/// let form = Form::new(vec![
///     Field::new("name").validator(NonEmptyValidator),
///     Field::new("age").converter(IntConverter),
/// ]);
///
/// let input = HashMap::from([("name", "Ada"), ("age", "36")]);
/// let result = form.load(&input);
/// assert!(result.is_valid());
/// assert_eq!(result.value().unwrap()["age"], Value::Int(36));
///
/// let result = form.load(&HashMap::from([("age", "old")]));
/// assert!(result.value().is_none());
/// assert_eq!(result.field_errors().len(), 2);
/// ```
pub struct Form<T = Values> {
    name: String,
    fields: Vec<Field>,
    assembly: Assembly<T>,
    recover_plugin_panics: bool,
}

const fn identity(values: Values) -> Values {
    values
}

impl Form<Values> {
    /// Creates a form over `fields` with no loader.
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            name: "form".to_string(),
            fields,
            assembly: Assembly::Converted(identity),
            recover_plugin_panics: false,
        }
    }
}

impl<T> Form<T> {
    /// Attaches a loader, replacing any earlier one.
    ///
    /// The loader runs only when every field validated and converted, and
    /// its output becomes the result's value.
    pub fn with_loader<L>(self, loader: L) -> Form<L::Output>
    where
        L: Loader + 'static,
    {
        Form {
            name: self.name,
            fields: self.fields,
            assembly: Assembly::Loader(Box::new(loader)),
            recover_plugin_panics: self.recover_plugin_panics,
        }
    }

    /// Names the form in log output.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Catches panics raised by validators, converters, and the loader.
    ///
    /// A caught panic becomes a form-level error with code `panic` and the
    /// load produces no value. Fields after the panicking one only have their
    /// raw values recorded.
    #[must_use]
    pub fn recover_plugin_panics(mut self, recover: bool) -> Self {
        self.recover_plugin_panics = recover;
        self
    }

    /// Applies the form-related parts of `settings`.
    #[must_use]
    pub fn with_settings(self, settings: &Settings) -> Self {
        self.recover_plugin_panics(settings.recover_plugin_panics)
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// The declared fields, in order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The name used in log output.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if a loader is attached.
    pub const fn has_loader(&self) -> bool {
        matches!(self.assembly, Assembly::Loader(_))
    }

    /// Runs the full pipeline over one submission.
    ///
    /// 1. Every field is read (missing keys as `""`), recorded in
    ///    `raw_values`, validated, and converted. Errors are collected per
    ///    field and never stop the other fields.
    /// 2. If any field failed, the load ends with no value and the loader is
    ///    not called.
    /// 3. Otherwise the loader, if any, receives the converted map and its
    ///    value and errors are merged into the result. Without a loader the
    ///    converted map is the value.
    pub fn load<I>(&self, input: &I) -> LoadResult<T>
    where
        I: FieldAccessor + ?Sized,
    {
        let span = form_span(&self.name);
        let _enter = span.enter();

        let pass = clean_fields(&self.fields, input, self.recover_plugin_panics);
        let mut result = LoadResult {
            value: None,
            raw_values: pass.raw_values,
            field_errors: pass.field_errors,
            form_error: pass.panic,
        };

        if result.form_error.is_some() {
            return result;
        }
        if !result.field_errors.is_empty() {
            tracing::debug!(
                failed = result.field_errors.len(),
                "field errors present, loader skipped"
            );
            return result;
        }

        match &self.assembly {
            Assembly::Converted(assemble) => {
                result.value = Some(assemble(pass.converted));
            }
            Assembly::Loader(loader) => {
                let out = match guard(self.recover_plugin_panics, "loader", || {
                    loader.load(pass.converted)
                }) {
                    Ok(out) => out,
                    Err(panicked) => {
                        result.form_error = Some(panicked);
                        return result;
                    }
                };

                if !out.field_errors.is_empty() || out.form_error.is_some() {
                    tracing::debug!(
                        field_errors = out.field_errors.len(),
                        form_error = out.form_error.is_some(),
                        "loader reported errors"
                    );
                }
                result.value = out.value;
                result.field_errors.extend(out.field_errors);
                result.form_error = out.form_error;
            }
        }

        tracing::debug!(valid = result.is_valid(), "form loaded");
        result
    }
}

impl<T> fmt::Debug for Form<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("has_loader", &self.has_loader())
            .field("recover_plugin_panics", &self.recover_plugin_panics)
            .finish()
    }
}
