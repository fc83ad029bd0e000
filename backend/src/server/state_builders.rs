//! Builders wiring Diesel repositories into the HTTP state ports.

use std::sync::Arc;

use foodgram::domain::ports::{MediaStore, PasswordHasher};
use foodgram::domain::{
    IngredientService, RecipeMarksService, RecipeService, ShoppingListService,
    SubscriptionService, TokenAuthService, UserAccountsService,
};
use foodgram::inbound::http::state::{HttpState, HttpStatePorts};
use foodgram::outbound::media::FsMediaStore;
use foodgram::outbound::persistence::{
    DbPool, DieselIngredientRepository, DieselRecipeMarkRepository, DieselRecipeRepository,
    DieselSubscriptionRepository, DieselTokenRepository, DieselUserRepository,
};
use foodgram::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

type DieselRecipeService = RecipeService<
    DieselRecipeRepository,
    DieselIngredientRepository,
    DieselRecipeMarkRepository,
    DieselUserRepository,
    DieselSubscriptionRepository,
>;

/// Repository adapters sharing one connection pool.
#[derive(Clone)]
pub(crate) struct Repositories {
    users: Arc<DieselUserRepository>,
    tokens: Arc<DieselTokenRepository>,
    subscriptions: Arc<DieselSubscriptionRepository>,
    ingredients: Arc<DieselIngredientRepository>,
    recipes: Arc<DieselRecipeRepository>,
    marks: Arc<DieselRecipeMarkRepository>,
}

impl Repositories {
    pub(crate) fn new(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            tokens: Arc::new(DieselTokenRepository::new(pool.clone())),
            subscriptions: Arc::new(DieselSubscriptionRepository::new(pool.clone())),
            ingredients: Arc::new(DieselIngredientRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
            marks: Arc::new(DieselRecipeMarkRepository::new(pool.clone())),
        }
    }

    pub(crate) fn ingredient_service(&self) -> IngredientService<DieselIngredientRepository> {
        IngredientService::new(Arc::clone(&self.ingredients))
    }

    pub(crate) fn accounts_service(
        &self,
        hasher: Arc<dyn PasswordHasher>,
        media: Arc<dyn MediaStore>,
    ) -> UserAccountsService<DieselUserRepository, DieselSubscriptionRepository> {
        UserAccountsService::new(
            Arc::clone(&self.users),
            Arc::clone(&self.subscriptions),
            hasher,
            media,
        )
    }

    fn recipe_service(&self, media: Arc<dyn MediaStore>) -> DieselRecipeService {
        RecipeService::new(
            Arc::clone(&self.recipes),
            Arc::clone(&self.ingredients),
            Arc::clone(&self.marks),
            Arc::clone(&self.users),
            Arc::clone(&self.subscriptions),
            media,
        )
    }
}

/// Open the media store configured for the server.
///
/// # Errors
///
/// Returns the I/O error when the media root cannot be created.
pub(crate) fn open_media_store(config: &ServerConfig) -> std::io::Result<Arc<dyn MediaStore>> {
    Ok(Arc::new(FsMediaStore::open(config.media_root())?))
}

/// Build the HTTP state over the database-backed repositories.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    repositories: &Repositories,
    media: &Arc<dyn MediaStore>,
) -> HttpState {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let recipes = Arc::new(repositories.recipe_service(Arc::clone(media)));

    let ports = HttpStatePorts {
        accounts: Arc::new(repositories.accounts_service(hasher.clone(), Arc::clone(media))),
        tokens: Arc::new(TokenAuthService::new(
            Arc::clone(&repositories.users),
            Arc::clone(&repositories.tokens),
            hasher,
        )),
        subscriptions: Arc::new(SubscriptionService::new(
            Arc::clone(&repositories.users),
            Arc::clone(&repositories.subscriptions),
            Arc::clone(&repositories.recipes),
        )),
        ingredients: Arc::new(repositories.ingredient_service()),
        recipes: recipes.clone(),
        recipes_query: recipes,
        marks: Arc::new(RecipeMarksService::new(
            Arc::clone(&repositories.recipes),
            Arc::clone(&repositories.marks),
        )),
        shopping_list: Arc::new(ShoppingListService::new(
            Arc::clone(&repositories.marks),
            Arc::clone(&repositories.recipes),
        )),
    };

    HttpState::new(ports)
        .with_media_url(config.media_url.clone())
        .with_page_size(config.page_size)
}
