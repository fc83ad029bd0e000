//! Favourites and shopping cart toggles.
//!
//! Both marks share one pair of helpers; the routes differ only in the
//! [`RecipeMark`] they pass.
//!
//! ```text
//! POST   /api/recipes/{id}/favorite/
//! DELETE /api/recipes/{id}/favorite/
//! POST   /api/recipes/{id}/shopping_cart/
//! DELETE /api/recipes/{id}/shopping_cart/
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, post, web};

use crate::domain::{Error, RecipeId, RecipeMark};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{MediaLinks, RecipeShort};

async fn add_mark(
    mark: RecipeMark,
    req: &HttpRequest,
    state: &HttpState,
    auth: AuthContext,
    recipe: i64,
) -> ApiResult<HttpResponse> {
    let summary = state
        .marks
        .mark(mark, auth.user_id(), RecipeId::new(recipe))
        .await?;
    Ok(HttpResponse::Created().json(RecipeShort::render(summary, &MediaLinks::new(req, state))))
}

async fn remove_mark(
    mark: RecipeMark,
    state: &HttpState,
    auth: AuthContext,
    recipe: i64,
) -> ApiResult<HttpResponse> {
    state
        .marks
        .unmark(mark, auth.user_id(), RecipeId::new(recipe))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to favourites", body = RecipeShort),
        (status = 400, description = "Already a favourite", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "addFavorite",
    security(("token" = []))
)]
#[post("/api/recipes/{id}/favorite/")]
pub async fn add_favorite(
    req: HttpRequest,
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    add_mark(RecipeMark::Favorite, &req, &state, auth, path.into_inner()).await
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from favourites"),
        (status = 400, description = "Not a favourite", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "removeFavorite",
    security(("token" = []))
)]
#[delete("/api/recipes/{id}/favorite/")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove_mark(RecipeMark::Favorite, &state, auth, path.into_inner()).await
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to the shopping cart", body = RecipeShort),
        (status = 400, description = "Already in the cart", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["shopping cart"],
    operation_id = "addToShoppingCart",
    security(("token" = []))
)]
#[post("/api/recipes/{id}/shopping_cart/")]
pub async fn add_to_cart(
    req: HttpRequest,
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    add_mark(RecipeMark::ShoppingCart, &req, &state, auth, path.into_inner()).await
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 400, description = "Not in the cart", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["shopping cart"],
    operation_id = "removeFromShoppingCart",
    security(("token" = []))
)]
#[delete("/api/recipes/{id}/shopping_cart/")]
pub async fn remove_from_cart(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove_mark(RecipeMark::ShoppingCart, &state, auth, path.into_inner()).await
}
