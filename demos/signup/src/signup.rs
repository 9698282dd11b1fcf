//! The signup form and its loader.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use formpipe_core::{Settings, ValidationError};
use formpipe_forms::converters::{BoolConverter, IntConverter, TimeConverter};
use formpipe_forms::fields::Field;
use formpipe_forms::form::Form;
use formpipe_forms::loader::{Loader, LoaderOutput};
use formpipe_forms::result::LoadResult;
use formpipe_forms::validators::{
    EmailValidator, MaxLengthValidator, MinLengthValidator, NonEmptyValidator, TrimValidator,
};
use formpipe_forms::value::{Value, Values};

/// Usernames that can never be registered.
const RESERVED_USERNAMES: &[&str] = &["admin", "root", "system"];

/// Fields whose raw input is never echoed back.
const SECRET_FIELDS: &[&str] = &["password", "confirm"];

const MINIMUM_AGE: i64 = 13;

/// A successfully registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub age: i64,
    pub birthday: DateTime<Utc>,
    pub newsletter: bool,
}

/// Builds a [`User`] once every field is valid.
///
/// Checks the rules that need more than one field, or that a single
/// validator has no business knowing about.
#[derive(Debug, Default)]
pub struct SignupLoader;

impl Loader for SignupLoader {
    type Output = User;

    fn load(&self, values: Values) -> LoaderOutput<User> {
        let text = |name: &str| values.get(name).and_then(Value::as_str).unwrap_or_default();

        let mut out = LoaderOutput::default();
        if text("password") != text("confirm") {
            out = out.with_field_error(
                "confirm",
                ValidationError::new("passwords do not match", "password_mismatch"),
            );
        }

        let username = text("username");
        if RESERVED_USERNAMES.contains(&username.to_lowercase().as_str()) {
            out = out.with_field_error(
                "username",
                ValidationError::new("that username is reserved", "reserved"),
            );
        }

        let age = values.get("age").and_then(Value::as_int).unwrap_or_default();
        if age < MINIMUM_AGE {
            out = out.with_field_error(
                "age",
                ValidationError::new(
                    format!("you must be at least {MINIMUM_AGE} years old"),
                    "min_value",
                )
                .with_param("min", MINIMUM_AGE.to_string()),
            );
        }

        if !out.is_ok() {
            return out;
        }

        let (Some(birthday), Some(newsletter)) = (
            values.get("birthday").and_then(Value::as_datetime),
            values.get("newsletter").and_then(Value::as_bool),
        ) else {
            return LoaderOutput::form_error(ValidationError::invalid(
                "signup form is missing typed values",
            ));
        };

        tracing::info!(username, "signup accepted");
        LoaderOutput::value(User {
            username: username.to_string(),
            email: text("email").to_string(),
            age,
            birthday,
            newsletter,
        })
    }
}

/// Declares the signup form.
pub fn signup_form(settings: &Settings) -> Form<User> {
    Form::new(vec![
        Field::new("username")
            .validator(TrimValidator)
            .validator(NonEmptyValidator)
            .validator(MaxLengthValidator::new(32)),
        Field::new("email")
            .validator(TrimValidator)
            .validator(EmailValidator),
        Field::new("age")
            .validator(NonEmptyValidator)
            .converter(IntConverter),
        Field::new("birthday").converter(TimeConverter),
        Field::new("newsletter").converter(BoolConverter),
        Field::new("password").validator(MinLengthValidator::new(8)),
        Field::new("confirm"),
    ])
    .named("signup")
    .with_settings(settings)
    .with_loader(SignupLoader)
}

/// Renders a load result as a JSON document with sorted keys.
///
/// Raw values of password fields are replaced by asterisks.
pub fn outcome_json(result: &LoadResult<User>) -> serde_json::Value {
    let raw_values: BTreeMap<&str, String> = result
        .raw_values()
        .iter()
        .map(|(name, raw)| {
            let shown = if SECRET_FIELDS.contains(&name.as_str()) {
                "*".repeat(raw.chars().count())
            } else {
                raw.clone()
            };
            (name.as_str(), shown)
        })
        .collect();

    let field_errors: BTreeMap<&str, &ValidationError> = result
        .field_errors()
        .iter()
        .map(|(name, err)| (name.as_str(), err))
        .collect();

    json!({
        "valid": result.is_valid(),
        "user": result.value(),
        "raw_values": raw_values,
        "field_errors": field_errors,
        "form_error": result.form_error(),
    })
}
