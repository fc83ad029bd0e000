//! Token authentication extractors.
//!
//! Clients authenticate with `Authorization: Token <key>`. [`AuthContext`]
//! requires a valid token and fails with `401`; [`Viewer`] lets anonymous
//! callers through but still rejects a malformed or unknown token. Headers
//! using another scheme are ignored.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::TokenAuth;
use crate::domain::{Error, TokenDigest, UserId};

use super::state::HttpState;

/// Authorization scheme keyword.
pub const TOKEN_SCHEME: &str = "Token";

/// Token key presented by the request, if it uses the `Token` scheme.
fn presented_key(req: &HttpRequest) -> Result<Option<String>, Error> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("invalid token header"))?;
    let mut parts = value.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case(TOKEN_SCHEME) => {}
        _ => return Ok(None),
    }
    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(Some(key.to_owned())),
        (None, _) => Err(Error::unauthorized(
            "invalid token header: no credentials provided",
        )),
        (Some(_), Some(_)) => Err(Error::unauthorized(
            "invalid token header: token string should not contain spaces",
        )),
    }
}

fn token_auth(req: &HttpRequest) -> Result<Arc<dyn TokenAuth>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .map(|state| Arc::clone(&state.tokens))
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

/// Resolve the request's user and token: `Ok(None)` when no token was
/// presented.
fn resolve(
    req: &HttpRequest,
) -> LocalBoxFuture<'static, Result<Option<(UserId, TokenDigest)>, Error>> {
    let key = presented_key(req);
    let tokens = token_auth(req);
    Box::pin(async move {
        let Some(key) = key? else {
            return Ok(None);
        };
        let user_id = tokens?.authenticate(&key).await?;
        Ok(Some((user_id, TokenDigest::of(&key))))
    })
}

/// Authenticated caller. Extraction fails with `401` without a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user_id: UserId,
    token: TokenDigest,
}

impl AuthContext {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Digest of the token this request was authenticated with.
    pub fn token(&self) -> &TokenDigest {
        &self.token
    }
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolved = resolve(req);
        Box::pin(async move {
            resolved
                .await?
                .map(|(user_id, token)| Self { user_id, token })
                .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))
        })
    }
}

/// Optional caller for endpoints that also serve anonymous users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewer(Option<UserId>);

impl Viewer {
    pub fn user_id(&self) -> Option<UserId> {
        self.0
    }
}

impl FromRequest for Viewer {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolved = resolve(req);
        Box::pin(async move {
            resolved
                .await
                .map(|caller| Self(caller.map(|(user_id, _)| user_id)))
        })
    }
}
