//! Form field definitions.
//!
//! A [`Field`] ties an input name to an ordered validator chain and an
//! optional converter. [`Field::clean`] runs the two in sequence for one raw
//! input string.

use std::fmt;

use formpipe_core::ValidationError;

use crate::converters::Converter;
use crate::validators::Validator;
use crate::value::Value;

/// A single named field of a form.
///
/// Fields are declared once, alongside the form, and reused for every
/// submission.
///
/// # Examples
///
/// ```
/// use formpipe_forms::converters::IntConverter;
/// use formpipe_forms::fields::Field;
/// use formpipe_forms::validators::{NonEmptyValidator, TrimValidator};
/// use formpipe_forms::value::Value;
///
/// let age = Field::new("age")
///     .validator(TrimValidator)
///     .validator(NonEmptyValidator)
///     .converter(IntConverter);
///
/// assert_eq!(age.clean(" 42 ").unwrap(), Value::Int(42));
/// assert_eq!(age.clean("   ").unwrap_err().code, "required");
/// ```
pub struct Field {
    /// The input key, also used to key every map in the load result.
    pub name: String,
    /// Validators run in order; the first error stops the chain.
    pub validators: Vec<Box<dyn Validator>>,
    /// Turns the validated string into a typed value. `None` keeps the string.
    pub converter: Option<Box<dyn Converter>>,
}

impl Field {
    /// Creates a field with no validators and no converter.
    ///
    /// Such a field accepts any input, including the empty string, and
    /// contributes it unchanged as a [`Value::String`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validators: Vec::new(),
            converter: None,
        }
    }

    /// Appends a validator to the chain.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Sets the converter, replacing any earlier one.
    #[must_use]
    pub fn converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converter = Some(Box::new(converter));
        self
    }

    /// Runs the validator chain over `input`.
    ///
    /// Each validator receives the previous validator's output. The chain
    /// stops at the first error, which is returned as-is; later validators
    /// are never called. An empty chain returns `input` unchanged.
    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        let mut current = input.to_string();
        for validator in &self.validators {
            current = validator.validate(&current)?;
        }
        Ok(current)
    }

    /// Converts an already validated string.
    ///
    /// Without a converter the string itself becomes the value. A converter
    /// is called exactly once and its error, if any, is returned verbatim.
    pub fn convert(&self, validated: String) -> Result<Value, ValidationError> {
        match &self.converter {
            Some(converter) => converter.convert(&validated),
            None => Ok(Value::String(validated)),
        }
    }

    /// Validates then converts `input`. The converter never runs when
    /// validation fails.
    pub fn clean(&self, input: &str) -> Result<Value, ValidationError> {
        let validated = self.validate(input)?;
        self.convert(validated)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validators: Vec<&str> = self.validators.iter().map(|v| v.name()).collect();
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("validators", &validators)
            .field("converter", &self.converter.as_ref().map(|c| c.name()))
            .finish()
    }
}
