//! Driving port for recipe reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, RecipeId, RecipeView, UserId};

/// Client-facing list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListQuery {
    pub author: Option<UserId>,
    /// Restrict to the viewer's favourites. Anonymous viewers get nothing.
    pub only_favorited: bool,
    /// Restrict to the viewer's cart. Anonymous viewers get nothing.
    pub only_in_shopping_cart: bool,
    pub search: Option<String>,
}

#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Page through recipes, newest first.
    async fn recipes(
        &self,
        viewer: Option<UserId>,
        query: RecipeListQuery,
        page: PageRequest,
    ) -> Result<Page<RecipeView>, Error>;

    async fn recipe(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error>;
}
