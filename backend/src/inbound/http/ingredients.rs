//! Ingredient catalogue handlers.
//!
//! ```text
//! GET /api/ingredients/?name=fl
//! GET /api/ingredients/{id}/
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, IngredientId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::IngredientResponse;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngredientSearch {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

/// Search the catalogue. The list is not paginated.
#[utoipa::path(
    get,
    path = "/api/ingredients/",
    params(IngredientSearch),
    responses(
        (status = 200, description = "Matching ingredients", body = [IngredientResponse]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/api/ingredients/")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientSearch>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let ingredients = state.ingredients.search(query.into_inner().name).await?;
    Ok(web::Json(ingredients.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Unknown ingredient", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/api/ingredients/{id}/")]
pub async fn ingredient_detail(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let ingredient = state
        .ingredients
        .ingredient(IngredientId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ingredient.into()))
}
