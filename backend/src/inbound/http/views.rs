//! Response bodies shared by the HTTP handlers.
//!
//! Domain types stay free of serde and utoipa concerns; these DTOs fix the
//! JSON field order clients rely on and turn media paths into absolute URLs.

use actix_web::HttpRequest;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Ingredient, MediaPath, RecipeIngredient, RecipeSummary, RecipeView, SubscriptionView, User,
    UserProfile,
};

use super::links::media_url;
use super::state::HttpState;

/// Renders media paths as absolute URLs for one request.
pub(crate) struct MediaLinks<'a> {
    req: &'a HttpRequest,
    prefix: &'a str,
}

impl<'a> MediaLinks<'a> {
    pub(crate) fn new(req: &'a HttpRequest, state: &'a HttpState) -> Self {
        Self {
            req,
            prefix: state.media_url(),
        }
    }

    pub(crate) fn url(&self, path: &MediaPath) -> String {
        media_url(self.req, self.prefix, path)
    }

    fn optional(&self, path: Option<&MediaPath>) -> Option<String> {
        path.map(|path| self.url(path))
    }
}

/// User as listed by `GET /api/users/`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListItem {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "chef")]
    pub username: String,
    #[schema(example = "chef@example.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Absolute avatar URL.
    pub avatar: Option<String>,
}

impl UserListItem {
    pub(crate) fn render(user: User, links: &MediaLinks<'_>) -> Self {
        Self {
            avatar: links.optional(user.avatar.as_ref()),
            id: user.id.get(),
            username: user.username.into(),
            email: user.email.into(),
            first_name: user.first_name.into(),
            last_name: user.last_name.into(),
        }
    }
}

/// User as seen by the caller, with their subscription state.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetail {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the caller follows this user.
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserDetail {
    pub(crate) fn render(profile: UserProfile, links: &MediaLinks<'_>) -> Self {
        let UserProfile {
            user,
            is_subscribed,
        } = profile;
        Self {
            avatar: links.optional(user.avatar.as_ref()),
            email: user.email.into(),
            id: user.id.get(),
            username: user.username.into(),
            first_name: user.first_name.into(),
            last_name: user.last_name.into(),
            is_subscribed,
        }
    }
}

/// Ingredient catalogue entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngredientResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "flour")]
    pub name: String,
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Ingredient line of a recipe.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub amount: u32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(line: RecipeIngredient) -> Self {
        Self {
            id: line.ingredient.id.get(),
            amount: line.amount,
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
        }
    }
}

/// Full recipe as seen by the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i64,
    pub author: UserDetail,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    /// Absolute image URL.
    pub image: String,
    pub text: String,
    /// Minutes.
    pub cooking_time: u32,
}

impl RecipeResponse {
    pub(crate) fn render(view: RecipeView, links: &MediaLinks<'_>) -> Self {
        let RecipeView {
            recipe,
            author,
            is_favorited,
            is_in_shopping_cart,
        } = view;
        Self {
            id: recipe.id.get(),
            author: UserDetail::render(author, links),
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: links.url(&recipe.image),
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Short recipe card used by marks and subscriptions.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecipeShort {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: u32,
}

impl RecipeShort {
    pub(crate) fn render(summary: RecipeSummary, links: &MediaLinks<'_>) -> Self {
        Self {
            id: summary.id.get(),
            image: links.url(&summary.image),
            name: summary.name,
            cooking_time: summary.cooking_time,
        }
    }
}

/// Followed author with a preview of their recipes.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserDetail,
    pub recipes: Vec<RecipeShort>,
    /// Total recipes by the author, regardless of `recipes_limit`.
    pub recipes_count: u64,
}

impl SubscriptionResponse {
    pub(crate) fn render(view: SubscriptionView, links: &MediaLinks<'_>) -> Self {
        Self {
            author: UserDetail::render(view.author, links),
            recipes: view
                .recipes
                .into_iter()
                .map(|summary| RecipeShort::render(summary, links))
                .collect(),
            recipes_count: view.recipes_count,
        }
    }
}
