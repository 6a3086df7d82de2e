//! Request contracts, checked before any provider call
//!
//! Checking happens in two passes. The raw body must be a JSON object whose declared
//! fields are all present as strings; then the value rules declared with `validator`
//! on the request types in [`super::types`] run. Checking is pure: the same body
//! always yields the same verdict, and the first failing field is the one reported.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

pub const MSG_REQUIRED: &str = "Required";
pub const MSG_EXPECTED_STRING: &str = "Expected string";
pub const MSG_EXPECTED_OBJECT: &str = "Expected object";
pub const MSG_MALFORMED_JSON: &str = "Malformed JSON body";
pub const MSG_INVALID_EMAIL: &str = "Invalid email";
pub const MSG_EMPTY_STRING: &str = "String must contain at least 1 character(s)";
pub const MSG_CODE_LENGTH: &str = "String must be exactly 6 digits";
pub const MSG_CODE_DIGITS: &str = "String must only contain digits";

/// ASCII digits only; the length rule is separate
pub static DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]*$").expect("valid digits regex"));

/// When one field breaks several rules, the earliest rule here is reported
const RULE_PRECEDENCE: [&str; 3] = ["email", "length", "regex"];

/// A rejected request field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// First failure among `fields`, in order, out of a `validator` report
    fn first_of(fields: &'static [&'static str], errors: &ValidationErrors) -> Self {
        let by_field = errors.field_errors();

        fields
            .iter()
            .find_map(|name| {
                let failure = by_field
                    .iter()
                    .find(|(field, _)| {
                        let field: &str = field.as_ref();
                        field == *name
                    })
                    .and_then(|(_, failures)| failures.iter().min_by_key(|f| rank(&f.code)))?;
                let message = failure
                    .message
                    .as_deref()
                    .unwrap_or(&failure.code)
                    .to_string();
                Some(Self::new(*name, message))
            })
            .unwrap_or_else(|| Self::new("body", errors.to_string()))
    }
}

fn rank(code: &str) -> usize {
    RULE_PRECEDENCE
        .iter()
        .position(|known| *known == code)
        .unwrap_or(RULE_PRECEDENCE.len())
}

/// The four operations exposed over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Authenticate,
    ConfirmEmail,
    Profile,
}

impl Operation {
    /// Required string fields of this operation's body, in checking order
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Operation::Register | Operation::Authenticate => &["username", "password"],
            Operation::ConfirmEmail => &["username", "code"],
            Operation::Profile => &["username"],
        }
    }

    /// Check that `body` is an object carrying every field as a string
    pub fn check_shape(&self, body: &Value) -> Result<(), ValidationError> {
        let object = body
            .as_object()
            .ok_or_else(|| ValidationError::new("body", MSG_EXPECTED_OBJECT))?;

        for field in self.fields() {
            match object.get(*field) {
                None | Some(Value::Null) => return Err(ValidationError::new(*field, MSG_REQUIRED)),
                Some(Value::String(_)) => {}
                Some(_) => return Err(ValidationError::new(*field, MSG_EXPECTED_STRING)),
            }
        }

        Ok(())
    }
}

/// A request body type bound to an [`Operation`]
pub trait RequestSchema: DeserializeOwned + Validate {
    const OPERATION: Operation;
}

/// Parse and check a raw request body, producing the typed request
///
/// An empty body is treated as `{}` so that missing fields are reported by name.
pub fn validate<T: RequestSchema>(raw: &[u8]) -> Result<T, ValidationError> {
    let body: Value = if raw.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(raw).map_err(|_| ValidationError::new("body", MSG_MALFORMED_JSON))?
    };

    T::OPERATION.check_shape(&body)?;

    let request: T =
        serde_json::from_value(body).map_err(|e| ValidationError::new("body", e.to_string()))?;

    request
        .validate()
        .map_err(|errors| ValidationError::first_of(T::OPERATION.fields(), &errors))?;

    Ok(request)
}
