//! Conversions from port and validation errors into [`Error`].
//!
//! Connection failures become `service_unavailable`, query failures become
//! `internal_error`, and validation failures become `invalid_request` with
//! `{"field", "code"}` details naming the offending payload field.

use serde_json::json;

use crate::domain::ports::{
    IngredientRepositoryError, MediaStoreError, PasswordHasherError, RecipeMarkRepositoryError,
    RecipeRepositoryError, SubscriptionRepositoryError, TokenRepositoryError, UserRepositoryError,
};
use crate::domain::{
    Error, ImageValidationError, PasswordPolicyError, RecipeValidationError, UserValidationError,
};

/// `invalid_request` error pointing at one payload field.
pub fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// Image failures are reported against the field that carried the image.
pub fn image_error(field: &str, error: ImageValidationError) -> Error {
    field_error(field, "invalid_image", error.to_string())
}

/// Password policy failures are reported against the field holding the new
/// password.
pub fn password_policy_error(field: &str, error: PasswordPolicyError) -> Error {
    field_error(field, "weak_password", error.to_string())
}

impl From<UserValidationError> for Error {
    fn from(error: UserValidationError) -> Self {
        field_error(error.field(), "invalid_value", error.to_string())
    }
}

impl From<RecipeValidationError> for Error {
    fn from(error: RecipeValidationError) -> Self {
        let field = error.field();
        match &error {
            RecipeValidationError::UnknownIngredients { ids } => {
                Error::invalid_request(error.to_string()).with_details(json!({
                    "field": field,
                    "code": "unknown_ingredient",
                    "ids": ids.iter().map(|id| id.get()).collect::<Vec<_>>(),
                }))
            }
            RecipeValidationError::MissingImage => {
                field_error(field, "missing_field", error.to_string())
            }
            _ => field_error(field, "invalid_value", error.to_string()),
        }
    }
}

impl From<UserRepositoryError> for Error {
    fn from(error: UserRepositoryError) -> Self {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateEmail => {
                field_error("email", "unique", "a user with this email already exists")
            }
            UserRepositoryError::DuplicateUsername => {
                field_error("username", "unique", "a user with this username already exists")
            }
        }
    }
}

macro_rules! connection_or_query {
    ($error:ident, $label:literal) => {
        impl From<$error> for Error {
            fn from(error: $error) -> Self {
                match error {
                    $error::Connection { message } => Error::service_unavailable(format!(
                        concat!($label, " unavailable: {}"),
                        message
                    )),
                    $error::Query { message } => {
                        Error::internal(format!(concat!($label, " error: {}"), message))
                    }
                }
            }
        }
    };
}

connection_or_query!(TokenRepositoryError, "token repository");
connection_or_query!(IngredientRepositoryError, "ingredient repository");
connection_or_query!(RecipeRepositoryError, "recipe repository");
connection_or_query!(RecipeMarkRepositoryError, "recipe mark repository");
connection_or_query!(SubscriptionRepositoryError, "subscription repository");

impl From<MediaStoreError> for Error {
    fn from(error: MediaStoreError) -> Self {
        Error::internal(error.to_string())
    }
}

impl From<PasswordHasherError> for Error {
    fn from(error: PasswordHasherError) -> Self {
        Error::internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, IngredientId};
    use rstest::rstest;

    #[rstest]
    #[case(Error::from(RecipeRepositoryError::connection("down")), ErrorCode::ServiceUnavailable)]
    #[case(Error::from(RecipeRepositoryError::query("bad sql")), ErrorCode::InternalError)]
    #[case(Error::from(TokenRepositoryError::connection("down")), ErrorCode::ServiceUnavailable)]
    #[case(Error::from(UserRepositoryError::query("bad sql")), ErrorCode::InternalError)]
    #[case(Error::from(UserRepositoryError::duplicate_email()), ErrorCode::InvalidRequest)]
    fn repository_errors_map_to_codes(#[case] error: Error, #[case] code: ErrorCode) {
        assert_eq!(error.code(), code);
    }

    #[rstest]
    fn unknown_ingredients_list_ids() {
        let error = Error::from(RecipeValidationError::UnknownIngredients {
            ids: vec![IngredientId::new(4), IngredientId::new(9)],
        });
        assert_eq!(
            error.details(),
            Some(&json!({"field": "ingredients", "code": "unknown_ingredient", "ids": [4, 9]}))
        );
    }

    #[rstest]
    fn duplicate_username_points_at_field() {
        let error = Error::from(UserRepositoryError::duplicate_username());
        assert_eq!(
            error.details(),
            Some(&json!({"field": "username", "code": "unique"}))
        );
    }
}
