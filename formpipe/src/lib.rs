//! # formpipe
//!
//! Declarative validate-convert-load pipelines for string-keyed form input.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient access.
//! You can depend on `formpipe` to get everything, or depend on the
//! individual crates for finer-grained control.

/// Settings, logging, and error types.
pub use formpipe_core as core;

/// Fields, validators, converters, loaders, and forms.
#[cfg(feature = "forms")]
pub use formpipe_forms as forms;

/// Third-party crates that appear in the public API.
pub use chrono;
pub use regex;
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;
pub use uuid;

/// The types needed to declare and load a form.
#[cfg(feature = "forms")]
pub mod prelude {
    pub use formpipe_core::{FormpipeError, FormpipeResult, Settings, ValidationError};
    pub use formpipe_forms::{
        converter_fn, loader_fn, validator_fn, BoolConverter, Converter, DateValidator,
        EmailValidator, Field, FieldAccessor, Float32Converter, Float64Converter, Form, FormData,
        IntConverter, LoadResult, Loader, LoaderOutput, MaxLengthValidator, MinLengthValidator,
        NonEmptyValidator, RegexValidator, TimeConverter, TrimValidator, UuidConverter,
        Validator, Value, Values,
    };
}
