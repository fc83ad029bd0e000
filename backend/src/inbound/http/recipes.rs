//! Recipe handlers.
//!
//! ```text
//! GET    /api/recipes/?page=1&limit=6&author=2&is_favorited=1&is_in_shopping_cart=0&search=soup
//! POST   /api/recipes/ {"ingredients":[{"id":1,"amount":10}],"image":"...","name":"...","text":"...","cooking_time":5}
//! GET    /api/recipes/{id}/
//! PATCH  /api/recipes/{id}/
//! DELETE /api/recipes/{id}/
//! GET    /api/recipes/{id}/get-link/
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, route, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::RecipeListQuery;
use crate::domain::{
    Error, ImageUpload, IngredientAmount, IngredientId, RecipeDraft, RecipeId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthContext, Viewer};
use crate::inbound::http::links::recipe_link;
use crate::inbound::http::paging::{Paginated, page_request, paginate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_flag, parse_image, parse_integer, require, to_u32,
};
use crate::inbound::http::views::{MediaLinks, RecipeResponse};

const INGREDIENTS: FieldName = FieldName::new("ingredients");

/// One ingredient line of a recipe payload.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RecipeIngredientRequest {
    /// Ingredient id from the catalogue.
    pub id: Option<i64>,
    #[schema(minimum = 1, maximum = 32000)]
    pub amount: Option<i64>,
}

/// Body for creating or editing a recipe.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<RecipeIngredientRequest>>,
    /// Base64 image or `data:image/...;base64,` URL. Required on create.
    pub image: Option<String>,
    #[schema(max_length = 256)]
    pub name: Option<String>,
    pub text: Option<String>,
    /// Minutes.
    #[schema(minimum = 1, maximum = 32000)]
    pub cooking_time: Option<i64>,
}

impl RecipeRequest {
    fn into_parts(self) -> Result<(RecipeDraft, Option<ImageUpload>), Error> {
        let ingredients = require(self.ingredients, INGREDIENTS)?
            .into_iter()
            .map(|line| -> Result<IngredientAmount, Error> {
                Ok(IngredientAmount {
                    ingredient_id: IngredientId::new(require(line.id, INGREDIENTS)?),
                    amount: to_u32(require(line.amount, INGREDIENTS)?),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        let name = require(self.name, FieldName::new("name"))?;
        let text = require(self.text, FieldName::new("text"))?;
        let cooking_time = require(self.cooking_time, FieldName::new("cooking_time"))?;
        let draft = RecipeDraft::new(name, text, to_u32(cooking_time), ingredients)?;
        let image = self
            .image
            .map(|raw| parse_image(&raw, FieldName::new("image")))
            .transpose()?;
        Ok((draft, image))
    }
}

/// Filters for `GET /api/recipes/`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Author id.
    pub author: Option<String>,
    /// `1` restricts to the caller's favourites.
    pub is_favorited: Option<String>,
    /// `1` restricts to the caller's shopping cart.
    pub is_in_shopping_cart: Option<String>,
    /// Case-insensitive substring of the recipe name.
    pub search: Option<String>,
}

impl RecipeListParams {
    fn to_query(&self) -> Result<RecipeListQuery, Error> {
        let author = self
            .author
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_integer(raw, FieldName::new("author")).map(UserId::new))
            .transpose()?;
        Ok(RecipeListQuery {
            author,
            only_favorited: parse_flag(self.is_favorited.as_deref()),
            only_in_shopping_cart: parse_flag(self.is_in_shopping_cart.as_deref()),
            search: self.search.clone(),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    #[schema(example = "https://foodgram.example.com/recipes/7/")]
    pub short_link: String,
}

/// Page through recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/recipes/",
    params(RecipeListParams),
    responses(
        (status = 200, description = "Page of recipes", body = Paginated<RecipeResponse>),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 404, description = "Invalid page", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security((), ("token" = []))
)]
#[get("/api/recipes/")]
pub async fn list_recipes(
    req: HttpRequest,
    state: web::Data<HttpState>,
    viewer: Viewer,
    params: web::Query<RecipeListParams>,
) -> ApiResult<web::Json<Paginated<RecipeResponse>>> {
    let query = params.to_query()?;
    let page = page_request(
        params.page.as_deref(),
        params.limit.as_deref(),
        state.page_size(),
    )?;
    let views = state
        .recipes_query
        .recipes(viewer.user_id(), query, page)
        .await?;
    let links = MediaLinks::new(&req, &state);
    let body = paginate(&req, views, |view| RecipeResponse::render(view, &links))?;
    Ok(web::Json(body))
}

/// Publish a recipe.
#[utoipa::path(
    post,
    path = "/api/recipes/",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid recipe", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe",
    security(("token" = []))
)]
#[post("/api/recipes/")]
pub async fn create_recipe(
    req: HttpRequest,
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let (draft, image) = payload.into_inner().into_parts()?;
    let view = state.recipes.create(auth.user_id(), draft, image).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::render(
        view,
        &MediaLinks::new(&req, &state),
    )))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security((), ("token" = []))
)]
#[get("/api/recipes/{id}/")]
pub async fn recipe_detail(
    req: HttpRequest,
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let id = RecipeId::new(path.into_inner());
    let view = state.recipes_query.recipe(viewer.user_id(), id).await?;
    Ok(web::Json(RecipeResponse::render(
        view,
        &MediaLinks::new(&req, &state),
    )))
}

/// Replace a recipe. Only its author may edit it; the image is kept when
/// omitted.
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid recipe", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe",
    security(("token" = []))
)]
#[route("/api/recipes/{id}/", method = "PATCH", method = "PUT")]
pub async fn update_recipe(
    req: HttpRequest,
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let id = RecipeId::new(path.into_inner());
    let (draft, image) = payload.into_inner().into_parts()?;
    let view = state
        .recipes
        .update(auth.user_id(), id, draft, image)
        .await?;
    Ok(web::Json(RecipeResponse::render(
        view,
        &MediaLinks::new(&req, &state),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe",
    security(("token" = []))
)]
#[delete("/api/recipes/{id}/")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = RecipeId::new(path.into_inner());
    state.recipes.delete(auth.user_id(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Shareable front-end link to a recipe.
#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Link", body = ShortLinkResponse),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipeLink",
    security((), ("token" = []))
)]
#[get("/api/recipes/{id}/get-link/")]
pub async fn recipe_short_link(
    req: HttpRequest,
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ShortLinkResponse>> {
    let id = RecipeId::new(path.into_inner());
    let view = state.recipes_query.recipe(viewer.user_id(), id).await?;
    Ok(web::Json(ShortLinkResponse {
        short_link: recipe_link(&req, view.recipe.id),
    }))
}

#[cfg(test)]
mod tests;
