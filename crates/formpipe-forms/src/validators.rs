//! Field validators.
//!
//! A [`Validator`] inspects a raw string and either rejects it or hands a
//! (possibly rewritten) string to the next validator in the field's chain.
//! Plain closures become validators through [`validator_fn`].

use std::fmt;

use chrono::NaiveDate;
use formpipe_core::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Date layout accepted by [`DateValidator`] and
/// [`TimeConverter`](crate::converters::TimeConverter).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// `@` with non-whitespace on both sides, optionally wrapped in a matched `<...>` pair.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:<\S+@\S+>|[^\s<]\S*@\S*[^\s>])$").expect("EMAIL_RE: invalid regex pattern")
});

// Exactly four, two and two digits; chrono alone accepts unpadded or signed fields.
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("DATE_RE: invalid regex pattern"));

/// Parses a date in the fixed `YYYY-MM-DD` layout.
///
/// Returns `None` for anything that is not zero-padded to exactly that shape
/// or that names a day the calendar does not have.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(input) {
        return None;
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

/// A trait for validating raw field input.
///
/// Validators run in declared order. Each receives the string returned by the
/// previous one, so a validator may normalize its input (trim, lowercase)
/// as well as reject it. A validator must not assume it is first or last in
/// the chain.
///
/// # Examples
///
/// ```
/// use formpipe_forms::validators::{NonEmptyValidator, Validator};
///
/// assert!(NonEmptyValidator.validate("bar").is_ok());
/// assert_eq!(
///     NonEmptyValidator.validate("").unwrap_err().to_string(),
///     "value must be present"
/// );
/// ```
pub trait Validator: Send + Sync {
    /// Validates `input`, returning the string to pass down the chain.
    fn validate(&self, input: &str) -> Result<String, ValidationError>;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Adapts a closure into a [`Validator`].
///
/// Build one with [`validator_fn`], which also pins down the closure's
/// argument types.
pub struct ValidatorFn<F>(F);

/// Wraps `f` so it can be used anywhere a [`Validator`] is expected.
///
/// # Examples
///
/// ```
/// use formpipe_forms::validators::{validator_fn, Validator};
///
/// let lower = validator_fn(|input| Ok(input.to_lowercase()));
/// assert_eq!(lower.validate("MiXeD").unwrap(), "mixed");
/// ```
pub fn validator_fn<F>(f: F) -> ValidatorFn<F>
where
    F: Fn(&str) -> Result<String, ValidationError> + Send + Sync,
{
    ValidatorFn(f)
}

impl<F> Validator for ValidatorFn<F>
where
    F: Fn(&str) -> Result<String, ValidationError> + Send + Sync,
{
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        (self.0)(input)
    }

    fn name(&self) -> &str {
        "ValidatorFn"
    }
}

impl<F> fmt::Debug for ValidatorFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorFn").finish_non_exhaustive()
    }
}

/// Rejects empty input with "value must be present" (code `required`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyValidator;

impl Validator for NonEmptyValidator {
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::new("value must be present", "required"));
        }
        Ok(input.to_string())
    }

    fn name(&self) -> &str {
        "NonEmptyValidator"
    }
}

/// Rejects input that is not a `YYYY-MM-DD` date with "invalid date"
/// (code `invalid_date`). The input passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateValidator;

impl Validator for DateValidator {
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        parse_date(input)
            .map(|_| input.to_string())
            .ok_or_else(|| ValidationError::new("invalid date", "invalid_date"))
    }

    fn name(&self) -> &str {
        "DateValidator"
    }
}

/// Loosely checks for an e-mail address, failing with
/// "invalid e-mail address" (code `invalid_email`).
///
/// The check only requires an `@` with non-whitespace on both sides,
/// optionally angle-bracketed (`<user@example.com>`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl Validator for EmailValidator {
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        if EMAIL_RE.is_match(input) {
            Ok(input.to_string())
        } else {
            Err(ValidationError::new("invalid e-mail address", "invalid_email"))
        }
    }

    fn name(&self) -> &str {
        "EmailValidator"
    }
}

/// Strips leading and trailing whitespace. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimValidator;

impl Validator for TrimValidator {
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        Ok(input.trim().to_string())
    }

    fn name(&self) -> &str {
        "TrimValidator"
    }
}

/// Requires at least `min_length` characters.
#[derive(Debug, Clone, Copy)]
pub struct MinLengthValidator {
    /// The minimum number of characters.
    pub min_length: usize,
}

impl MinLengthValidator {
    /// Creates a new `MinLengthValidator`.
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        let len = input.chars().count();
        if len < self.min_length {
            return Err(ValidationError::new(
                format!(
                    "ensure this value has at least {} characters (it has {len})",
                    self.min_length
                ),
                "min_length",
            )
            .with_param("min", self.min_length.to_string()));
        }
        Ok(input.to_string())
    }

    fn name(&self) -> &str {
        "MinLengthValidator"
    }
}

/// Allows at most `max_length` characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLengthValidator {
    /// The maximum number of characters.
    pub max_length: usize,
}

impl MaxLengthValidator {
    /// Creates a new `MaxLengthValidator`.
    pub const fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        let len = input.chars().count();
        if len > self.max_length {
            return Err(ValidationError::new(
                format!(
                    "ensure this value has at most {} characters (it has {len})",
                    self.max_length
                ),
                "max_length",
            )
            .with_param("max", self.max_length.to_string()));
        }
        Ok(input.to_string())
    }

    fn name(&self) -> &str {
        "MaxLengthValidator"
    }
}

/// Requires the input to match a regular expression.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
    message: String,
}

impl RegexValidator {
    /// Compiles `pattern`, failing with the `regex` error if it is invalid.
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    /// Builds a validator from an already compiled expression.
    pub fn from_regex(regex: Regex, message: impl Into<String>) -> Self {
        Self {
            regex,
            message: message.into(),
        }
    }
}

impl Validator for RegexValidator {
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        if self.regex.is_match(input) {
            Ok(input.to_string())
        } else {
            Err(ValidationError::invalid(self.message.clone())
                .with_param("pattern", self.regex.as_str()))
        }
    }

    fn name(&self) -> &str {
        "RegexValidator"
    }
}
