//! Following authors.
//!
//! ```text
//! GET    /api/users/subscriptions/?page=1&limit=6&recipes_limit=3
//! POST   /api/users/{id}/subscribe/?recipes_limit=3
//! DELETE /api/users/{id}/subscribe/
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, UserId, parse_recipes_limit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::paging::{Paginated, page_request, paginate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{MediaLinks, SubscriptionResponse};

/// Cap on the recipes embedded in each subscription. Values that are not
/// non-negative integers are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubscriptionsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub recipes_limit: Option<String>,
}

/// Authors the caller follows, in subscription order.
#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    params(SubscriptionsQuery),
    responses(
        (status = 200, description = "Followed authors", body = Paginated<SubscriptionResponse>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Invalid page", body = Error)
    ),
    tags = ["subscriptions"],
    operation_id = "listSubscriptions",
    security(("token" = []))
)]
#[get("/api/users/subscriptions/")]
pub async fn list_subscriptions(
    req: HttpRequest,
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<SubscriptionsQuery>,
) -> ApiResult<web::Json<Paginated<SubscriptionResponse>>> {
    let page = page_request(
        query.page.as_deref(),
        query.limit.as_deref(),
        state.page_size(),
    )?;
    let recipes_limit = parse_recipes_limit(query.recipes_limit.as_deref());
    let views = state
        .subscriptions
        .subscriptions(auth.user_id(), page, recipes_limit)
        .await?;
    let links = MediaLinks::new(&req, &state);
    let body = paginate(&req, views, |view| SubscriptionResponse::render(view, &links))?;
    Ok(web::Json(body))
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    params(("id" = i64, Path, description = "Author id"), RecipesLimitQuery),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Self or duplicate subscription", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown author", body = Error)
    ),
    tags = ["subscriptions"],
    operation_id = "subscribe",
    security(("token" = []))
)]
#[post("/api/users/{id}/subscribe/")]
pub async fn subscribe(
    req: HttpRequest,
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<i64>,
    query: web::Query<RecipesLimitQuery>,
) -> ApiResult<HttpResponse> {
    let author = UserId::new(path.into_inner());
    let recipes_limit = parse_recipes_limit(query.recipes_limit.as_deref());
    let view = state
        .subscriptions
        .subscribe(auth.user_id(), author, recipes_limit)
        .await?;
    Ok(HttpResponse::Created().json(SubscriptionResponse::render(
        view,
        &MediaLinks::new(&req, &state),
    )))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown author", body = Error)
    ),
    tags = ["subscriptions"],
    operation_id = "unsubscribe",
    security(("token" = []))
)]
#[delete("/api/users/{id}/subscribe/")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let author = UserId::new(path.into_inner());
    state.subscriptions.unsubscribe(auth.user_id(), author).await?;
    Ok(HttpResponse::NoContent().finish())
}
