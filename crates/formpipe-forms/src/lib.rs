//! # formpipe-forms
//!
//! The form pipeline: declare fields once, then load string-keyed
//! submissions into typed values.
//!
//! Each [`Field`](fields::Field) runs its validators in order, then its
//! converter. Every field is processed even when others fail, so a single
//! load reports all field errors. When all fields succeed, an optional
//! [`Loader`](loader::Loader) builds the final domain value and may report
//! cross-field problems of its own.
//!
//! ## Module Overview
//!
//! - [`form`] - [`Form`](form::Form) and the load pipeline
//! - [`fields`] - Field definitions
//! - [`validators`] - The [`Validator`](validators::Validator) trait and built-in validators
//! - [`converters`] - The [`Converter`](converters::Converter) trait and built-in converters
//! - [`loader`] - The [`Loader`](loader::Loader) trait for whole-form construction
//! - [`result`] - [`LoadResult`](result::LoadResult)
//! - [`input`] - Input access and url-encoded [`FormData`](input::FormData)
//! - [`value`] - The typed [`Value`](value::Value) enum
//! - [`validation`] - The per-field pass

pub mod converters;
pub mod fields;
pub mod form;
pub mod input;
pub mod loader;
pub mod result;
pub mod validation;
pub mod validators;
pub mod value;

pub use converters::{
    converter_fn, BoolConverter, Converter, Float32Converter, Float64Converter, IntConverter,
    TimeConverter, UuidConverter,
};
pub use fields::Field;
pub use form::Form;
pub use input::{FieldAccessor, FormData};
pub use loader::{loader_fn, Loader, LoaderOutput};
pub use result::LoadResult;
pub use validators::{
    validator_fn, DateValidator, EmailValidator, MaxLengthValidator, MinLengthValidator,
    NonEmptyValidator, RegexValidator, TrimValidator, Validator,
};
pub use value::{Value, Values};
