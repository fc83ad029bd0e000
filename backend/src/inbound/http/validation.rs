//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs keep their fields optional so a missing field is reported as
//! `invalid_request` naming the field instead of a generic JSON error.

use serde_json::json;

use crate::domain::{Error, ImageUpload, image_error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidInteger,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidInteger => "invalid_integer",
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

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
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
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// Unwrap an optional payload field or report it missing.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn invalid_integer_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be an integer"))
        .with_value(ErrorCode::InvalidInteger, value)
}

/// Parse an integer query parameter such as `author`.
pub(crate) fn parse_integer(value: &str, field: FieldName) -> Result<i64, Error> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| invalid_integer_error(field, value))
}

/// Interpret boolean-style query flags. Only `1` and `true` switch a flag on.
pub(crate) fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim),
        Some("1") | Some("true") | Some("True")
    )
}

/// Decode an inline image field.
pub(crate) fn parse_image(value: &str, field: FieldName) -> Result<ImageUpload, Error> {
    ImageUpload::parse(value).map_err(|err| image_error(field.as_str(), err))
}

/// Narrow a client-supplied number into the `u32` domain range. Negative and
/// oversized values become `0` so domain range checks reject them.
pub(crate) fn to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    const AUTHOR: FieldName = FieldName::new("author");

    #[rstest]
    fn missing_field_names_the_field() {
        let error = require::<String>(None, FieldName::new("name")).expect_err("missing");
        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        let details = error.details().and_then(Value::as_object).expect("details");
        assert_eq!(details.get("field").and_then(Value::as_str), Some("name"));
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("missing_field")
        );
    }

    #[rstest]
    #[case(" 7 ", Some(7))]
    #[case("seven", None)]
    #[case("", None)]
    fn integers_are_parsed_or_rejected(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_integer(raw, AUTHOR).ok(), expected);
    }

    #[rstest]
    #[case(Some("1"), true)]
    #[case(Some("true"), true)]
    #[case(Some("0"), false)]
    #[case(Some("yes"), false)]
    #[case(None, false)]
    fn flags_accept_one_and_true(#[case] raw: Option<&str>, #[case] expected: bool) {
        assert_eq!(parse_flag(raw), expected);
    }

    #[rstest]
    #[case(-5, 0)]
    #[case(12, 12)]
    #[case(i64::MAX, 0)]
    fn numbers_narrow_to_u32(#[case] raw: i64, #[case] expected: u32) {
        assert_eq!(to_u32(raw), expected);
    }

    #[rstest]
    fn images_report_the_field() {
        let error = parse_image("not base64!", FieldName::new("image")).expect_err("invalid");
        let details = error.details().and_then(Value::as_object).expect("details");
        assert_eq!(details.get("field").and_then(Value::as_str), Some("image"));
    }
}
