//! Token login and logout.
//!
//! ```text
//! POST /api/auth/token/login/ {"email":"cook@example.com","password":"..."}
//! POST /api/auth/token/logout/   (Authorization: Token <key>)
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginValidationError, field_error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Login request body for `POST /api/auth/token/login/`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "cook@example.com")]
    pub email: Option<String>,
    #[schema(example = "s3cret-pass")]
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let email = require(value.email, FieldName::new("email"))?;
        let password = require(value.password, FieldName::new("password"))?;
        Self::try_from_parts(&email, &password).map_err(map_login_validation_error)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => {
            field_error("email", "empty_email", "email must not be empty")
        }
        LoginValidationError::EmptyPassword => {
            field_error("password", "empty_password", "password must not be empty")
        }
    }
}

/// Issued token.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Key to send as `Authorization: Token <key>`.
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub auth_token: String,
}

/// Exchange credentials for an API token. Earlier tokens stay valid.
#[utoipa::path(
    post,
    path = "/api/auth/token/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/api/auth/token/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let token = state.tokens.login(&credentials).await?;
    Ok(web::Json(TokenResponse {
        auth_token: token.key().to_owned(),
    }))
}

/// Revoke the token presented with this request.
#[utoipa::path(
    post,
    path = "/api/auth/token/logout/",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security(("token" = []))
)]
#[post("/api/auth/token/logout/")]
pub async fn logout(state: web::Data<HttpState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    state.tokens.logout(auth.user_id(), auth.token()).await?;
    Ok(HttpResponse::NoContent().finish())
}
