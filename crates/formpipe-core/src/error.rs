//! Core error types for formpipe.
//!
//! [`ValidationError`] is the value every validator, converter, and loader
//! reports failures with. [`FormpipeError`] covers the failures that happen
//! around the pipeline: configuration loading, I/O, and mutation of
//! immutable input.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single validation failure.
///
/// A `ValidationError` carries a human-readable message and a short
/// machine-readable code. Built-in validators and converters document the
/// codes they use (e.g. `"required"`, `"not_a_number"`).
///
/// # Examples
///
/// ```
/// use formpipe_core::error::ValidationError;
///
/// let err = ValidationError::new("value must be present", "required");
/// assert_eq!(err.to_string(), "value must be present");
/// assert_eq!(err.code, "required");
///
/// let err = ValidationError::new("too short", "min_length").with_param("min", "8");
/// assert_eq!(err.params.get("min").map(String::as_str), Some("8"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of failure (e.g. "required", "invalid").
    pub code: String,
    /// Additional parameters providing context for the error message.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` with the generic `"invalid"` code.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(message, "invalid")
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for everything outside a single form evaluation.
///
/// Per-field and form-level failures during `Form::load` are reported as
/// [`ValidationError`] values inside the load result, never as a
/// `FormpipeError`.
#[derive(Error, Debug)]
pub enum FormpipeError {
    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An attempt was made to modify an immutable value.
    #[error("Immutable: {0}")]
    Immutable(String),

    /// A validation failure escaped the pipeline.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for FormpipeError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A convenience type alias for `Result<T, FormpipeError>`.
pub type FormpipeResult<T> = Result<T, FormpipeError>;
