//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Repository ports are driven by services and implemented by outbound
//! adapters. Use-case ports are implemented by services and driven by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod ingredient_catalogue;
mod ingredient_repository;
mod media_store;
mod password_hasher;
mod recipe_command;
mod recipe_mark_repository;
mod recipe_marks_command;
mod recipe_query;
mod recipe_repository;
mod shopping_list_query;
mod subscription_repository;
mod subscriptions_command;
mod token_auth;
mod token_repository;
mod user_accounts;
mod user_repository;

pub use ingredient_catalogue::IngredientCatalogue;
#[cfg(test)]
pub use ingredient_repository::MockIngredientRepository;
pub use ingredient_repository::{IngredientRepository, IngredientRepositoryError};
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{MediaStore, MediaStoreError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use recipe_command::RecipeCommand;
#[cfg(test)]
pub use recipe_mark_repository::MockRecipeMarkRepository;
pub use recipe_mark_repository::{RecipeMarkRepository, RecipeMarkRepositoryError};
pub use recipe_marks_command::RecipeMarksCommand;
pub use recipe_query::{RecipeListQuery, RecipeQuery};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use shopping_list_query::MockShoppingListQuery;
pub use shopping_list_query::ShoppingListQuery;
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};
pub use subscriptions_command::Subscriptions;
#[cfg(test)]
pub use token_auth::MockTokenAuth;
pub use token_auth::TokenAuth;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
pub use token_repository::{TokenRepository, TokenRepositoryError};
pub use user_accounts::{ChangePasswordRequest, RegisterUserRequest, UserAccounts};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUserRecord, StoredCredentials, UserRepository, UserRepositoryError};
