//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services that implement the driving ports.
//! Keep types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Recipe, Ingredient: the main aggregates.
//! - ShoppingList: the aggregated cart report.
//! - `*Service` types: use-case implementations wired by the server.

pub mod auth;
pub mod error;
pub mod error_mapping;
pub mod image;
pub mod ingredient;
pub mod ingredient_service;
pub mod ports;
pub mod recipe;
pub mod recipe_marks_service;
pub mod recipe_service;
pub mod shopping_list;
pub mod subscription;
pub mod subscription_service;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{
    AuthToken, LoginCredentials, LoginValidationError, NewPassword, PASSWORD_MIN_LENGTH,
    PasswordHash, PasswordPolicyError, TokenDigest,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::error_mapping::{field_error, image_error, password_policy_error};
pub use self::image::{ImageFormat, ImageUpload, ImageValidationError, MediaPath};
pub use self::ingredient::{Ingredient, IngredientId, IngredientImportSummary, IngredientSeed};
pub use self::ingredient_service::IngredientService;
pub use self::recipe::{
    IngredientAmount, MAX_AMOUNT, MAX_COOKING_TIME, MIN_AMOUNT, MIN_COOKING_TIME,
    RECIPE_NAME_MAX, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeIngredient, RecipeMark,
    RecipeRecord, RecipeSummary, RecipeValidationError, RecipeView,
};
pub use self::recipe_marks_service::RecipeMarksService;
pub use self::recipe_service::RecipeService;
pub use self::shopping_list::{
    AggregatedLine, Aggregator, CartExpansionError, IngredientUnitKey, SHOPPING_LIST_FILE_NAME,
    ShoppingList, ShoppingListService, aggregate, expand_cart, render,
};
pub use self::subscription::{SubscriptionView, parse_recipes_limit};
pub use self::subscription_service::{SubscriptionService, subscribed_authors};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, Email, PERSON_NAME_MAX, PersonName, USERNAME_MAX, User, UserId, UserProfile,
    UserRegistration, UserSeed, UserValidationError, Username,
};
pub use self::user_service::{TokenAuthService, UserAccountsService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use foodgram::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
