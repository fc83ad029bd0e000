//! Users API handlers.
//!
//! ```text
//! GET  /api/users/?page=1&limit=6
//! POST /api/users/ {"email":"cook@example.com","username":"cook",...}
//! GET  /api/users/me/
//! PUT  /api/users/me/avatar/ {"avatar":"data:image/png;base64,..."}
//! POST /api/users/set_password/ {"current_password":"...","new_password":"..."}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{ChangePasswordRequest, RegisterUserRequest};
use crate::domain::{Error, UserId, UserRegistration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthContext, Viewer};
use crate::inbound::http::paging::{PageQuery, Paginated, paginate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_image, require};
use crate::inbound::http::views::{MediaLinks, UserDetail, UserListItem};

/// Registration body for `POST /api/users/`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "cook@example.com")]
    pub email: Option<String>,
    #[schema(example = "cook")]
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(example = "s3cret-pass")]
    pub password: Option<String>,
}

impl TryFrom<CreateUserRequest> for RegisterUserRequest {
    type Error = Error;

    fn try_from(body: CreateUserRequest) -> Result<Self, Self::Error> {
        let email = require(body.email, FieldName::new("email"))?;
        let username = require(body.username, FieldName::new("username"))?;
        let first_name = require(body.first_name, FieldName::new("first_name"))?;
        let last_name = require(body.last_name, FieldName::new("last_name"))?;
        let password = require(body.password, FieldName::new("password"))?;
        let registration =
            UserRegistration::try_from_parts(&email, &username, &first_name, &last_name)?;
        Ok(Self {
            registration,
            password: Zeroizing::new(password),
        })
    }
}

/// Body returned after registration. The password is never echoed.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedUserResponse {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub id: i64,
}

/// Body for `PUT /api/users/me/avatar/`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AvatarRequest {
    /// Base64 image or `data:image/...;base64,` URL.
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvatarResponse {
    /// Absolute URL of the stored avatar.
    pub avatar: String,
}

/// Body for `POST /api/users/set_password/`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// List users ordered by id.
#[utoipa::path(
    get,
    path = "/api/users/",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of users", body = Paginated<UserListItem>),
        (status = 404, description = "Invalid page", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/api/users/")]
pub async fn list_users(
    req: HttpRequest,
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<UserListItem>>> {
    let page = query.to_request(state.page_size())?;
    let users = state.accounts.users(page).await?;
    let links = MediaLinks::new(&req, &state);
    let body = paginate(&req, users, |user| UserListItem::render(user, &links))?;
    Ok(web::Json(body))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/users/",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreatedUserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/api/users/")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = RegisterUserRequest::try_from(payload.into_inner())?;
    let user = state.accounts.register(request).await?;
    Ok(HttpResponse::Created().json(CreatedUserResponse {
        email: user.email.into(),
        username: user.username.into(),
        first_name: user.first_name.into(),
        last_name: user.last_name.into(),
        id: user.id.get(),
    }))
}

/// Profile of the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/users/me/",
    responses(
        (status = 200, description = "Current user", body = UserDetail),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("token" = []))
)]
#[get("/api/users/me/")]
pub async fn current_user(
    req: HttpRequest,
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<UserDetail>> {
    let me = auth.user_id();
    let profile = state.accounts.profile(Some(me), me).await?;
    Ok(web::Json(UserDetail::render(
        profile,
        &MediaLinks::new(&req, &state),
    )))
}

/// A single user profile.
#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile", body = UserDetail),
        (status = 401, description = "Invalid token", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security((), ("token" = []))
)]
#[get("/api/users/{id}/")]
pub async fn user_detail(
    req: HttpRequest,
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserDetail>> {
    let id = UserId::new(path.into_inner());
    let profile = state.accounts.profile(viewer.user_id(), id).await?;
    Ok(web::Json(UserDetail::render(
        profile,
        &MediaLinks::new(&req, &state),
    )))
}

/// Upload or replace the caller's avatar.
#[utoipa::path(
    put,
    path = "/api/users/me/avatar/",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar stored", body = AvatarResponse),
        (status = 400, description = "Invalid image", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "setAvatar",
    security(("token" = []))
)]
#[put("/api/users/me/avatar/")]
pub async fn set_avatar(
    req: HttpRequest,
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<AvatarRequest>,
) -> ApiResult<web::Json<AvatarResponse>> {
    let field = FieldName::new("avatar");
    let raw = require(payload.into_inner().avatar, field)?;
    let image = parse_image(&raw, field)?;
    let path = state.accounts.set_avatar(auth.user_id(), image).await?;
    Ok(web::Json(AvatarResponse {
        avatar: MediaLinks::new(&req, &state).url(&path),
    }))
}

/// Remove the caller's avatar.
#[utoipa::path(
    delete,
    path = "/api/users/me/avatar/",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteAvatar",
    security(("token" = []))
)]
#[delete("/api/users/me/avatar/")]
pub async fn delete_avatar(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    state.accounts.clear_avatar(auth.user_id()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Change the caller's password.
#[utoipa::path(
    post,
    path = "/api/users/set_password/",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or weak new password", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "setPassword",
    security(("token" = []))
)]
#[post("/api/users/set_password/")]
pub async fn set_password(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = ChangePasswordRequest {
        current_password: Zeroizing::new(require(
            body.current_password,
            FieldName::new("current_password"),
        )?),
        new_password: Zeroizing::new(require(body.new_password, FieldName::new("new_password"))?),
    };
    state.accounts.change_password(auth.user_id(), request).await?;
    Ok(HttpResponse::NoContent().finish())
}
