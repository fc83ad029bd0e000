//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use pagination::DEFAULT_PAGE_SIZE;

use crate::domain::ports::{
    IngredientCatalogue, RecipeCommand, RecipeMarksCommand, RecipeQuery, ShoppingListQuery,
    Subscriptions, TokenAuth, UserAccounts,
};

/// Public URL prefix for media files when none is configured.
pub const DEFAULT_MEDIA_URL: &str = "/media/";

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn UserAccounts>,
    pub tokens: Arc<dyn TokenAuth>,
    pub subscriptions: Arc<dyn Subscriptions>,
    pub ingredients: Arc<dyn IngredientCatalogue>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub marks: Arc<dyn RecipeMarksCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn UserAccounts>,
    pub tokens: Arc<dyn TokenAuth>,
    pub subscriptions: Arc<dyn Subscriptions>,
    pub ingredients: Arc<dyn IngredientCatalogue>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub marks: Arc<dyn RecipeMarksCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    media_url: String,
    page_size: u32,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with the default media prefix and page size.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            tokens,
            subscriptions,
            ingredients,
            recipes,
            recipes_query,
            marks,
            shopping_list,
        } = ports;
        Self {
            accounts,
            tokens,
            subscriptions,
            ingredients,
            recipes,
            recipes_query,
            marks,
            shopping_list,
            media_url: DEFAULT_MEDIA_URL.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the public media prefix. A trailing `/` is added when missing.
    #[must_use]
    pub fn with_media_url(mut self, media_url: impl Into<String>) -> Self {
        let mut media_url = media_url.into();
        if !media_url.ends_with('/') {
            media_url.push('/');
        }
        self.media_url = media_url;
        self
    }

    /// Set the page size used when clients omit `limit`.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Public prefix for media files, always ending in `/`.
    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}
