//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure is an `invalid_request` error (HTTP 422) whose
//! details carry `{ field, code, value? }` so clients can point at the
//! offending input.

use std::str::FromStr;

use actix_web::web;
use serde_json::json;

use crate::domain::{Error, GroupValidationError, LoginValidationError, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidNumber,
    InvalidValue,
    EmptyField,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::InvalidBody => "invalid_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Unwrap a required body or query field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a required UUID-backed identifier from a query or body field.
pub(crate) fn parse_required_id<T: FromStr>(
    value: Option<String>,
    field: FieldName,
) -> Result<T, Error> {
    let raw = require(value, field)?;
    raw.trim()
        .parse()
        .map_err(|_| invalid_uuid_error(field, &raw))
}

/// Parse an identifier taken from the URL path.
///
/// A malformed id names a resource that cannot exist, so it is reported as
/// `404` rather than a validation failure.
pub(crate) fn parse_path_id<T: FromStr>(raw: &str, resource: &str) -> Result<T, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("{resource} {raw} not found")))
}

/// Parse an optional positive integer query parameter.
pub(crate) fn parse_optional_u32(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<u32>, Error> {
    value
        .map(|raw| {
            raw.trim().parse().map_err(|_| {
                let name = field.as_str();
                ValidationError::new(field, format!("{name} must be a positive integer"))
                    .with_value(ErrorCode::InvalidNumber, raw.clone())
            })
        })
        .transpose()
}

/// Report a rejected value for `field` using the domain's own message.
pub(crate) fn invalid_value_error(field: FieldName, message: impl Into<String>) -> Error {
    ValidationError::new(field, message).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn map_user_validation_error(field: FieldName, err: UserValidationError) -> Error {
    match err {
        UserValidationError::EmptyUsername => {
            ValidationError::new(field, err.to_string()).with_code(ErrorCode::EmptyField)
        }
        other => invalid_value_error(field, other.to_string()),
    }
}

pub(crate) fn map_password_validation_error(field: FieldName, err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyPassword => {
            ValidationError::new(field, err.to_string()).with_code(ErrorCode::EmptyField)
        }
        other => invalid_value_error(field, other.to_string()),
    }
}

pub(crate) fn map_group_validation_error(err: GroupValidationError) -> Error {
    let field = FieldName::new(err.field().as_str());
    match err {
        GroupValidationError::MissingField { .. } => missing_field_error(field),
        GroupValidationError::EmptyField { .. } => {
            ValidationError::new(field, err.to_string()).with_code(ErrorCode::EmptyField)
        }
    }
}

/// JSON extractor configuration reporting unreadable bodies as 422.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let error = Error::invalid_request(format!("request body is invalid: {err}"))
            .with_details(json!({ "field": "body", "code": ErrorCode::InvalidBody.as_str() }));
        error.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, GroupField, UserId};
    use rstest::rstest;
    use serde_json::Value;

    fn details(error: &Error) -> &Value {
        error.details().expect("details present")
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = require::<String>(None, FieldName::new("email")).expect_err("missing");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(details(&err)["field"], "email");
        assert_eq!(details(&err)["code"], "missing_field");
    }

    #[rstest]
    fn malformed_ids_echo_the_value() {
        let err = parse_required_id::<UserId>(Some("nope".into()), FieldName::new("master"))
            .expect_err("not a uuid");
        assert_eq!(details(&err)["code"], "invalid_uuid");
        assert_eq!(details(&err)["value"], "nope");
    }

    #[rstest]
    fn malformed_path_ids_are_not_found() {
        let err = parse_path_id::<UserId>("42", "group").expect_err("not a uuid");
        assert_eq!(err.code(), DomainCode::NotFound);
        assert_eq!(err.message(), "group 42 not found");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("3"), Some(3))]
    #[case(Some(" 7 "), Some(7))]
    fn numbers_parse(#[case] raw: Option<&str>, #[case] expected: Option<u32>) {
        let parsed = parse_optional_u32(raw.map(str::to_owned), FieldName::new("page"))
            .expect("valid number");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("-1")]
    #[case("abc")]
    fn bad_numbers_are_rejected(#[case] raw: &str) {
        let err = parse_optional_u32(Some(raw.into()), FieldName::new("limit"))
            .expect_err("invalid number");
        assert_eq!(details(&err)["code"], "invalid_number");
    }

    #[rstest]
    fn group_errors_use_the_wire_field_name() {
        let err = map_group_validation_error(GroupValidationError::EmptyField {
            field: GroupField::Chronic,
        });
        assert_eq!(err.message(), "chronic must not be empty");
        assert_eq!(details(&err)["field"], "chronic");
        assert_eq!(details(&err)["code"], "empty_field");
    }
}
