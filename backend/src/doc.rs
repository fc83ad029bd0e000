//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI document for the REST API. It registers
//! every inbound HTTP path, the response schemas, and the `Token` header
//! authentication scheme.
//!
//! The document is served by Swagger UI in debug builds and exported by the
//! `openapi-dump` binary for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::recipes::{RecipeIngredientRequest, RecipeRequest, ShortLinkResponse};
use crate::inbound::http::tokens::{LoginRequest, TokenResponse};
use crate::inbound::http::users::{
    AvatarRequest, AvatarResponse, CreateUserRequest, CreatedUserResponse, SetPasswordRequest,
};
use crate::inbound::http::views::{
    IngredientResponse, RecipeIngredientResponse, RecipeResponse, RecipeShort,
    SubscriptionResponse, UserDetail, UserListItem,
};

/// Security scheme name referenced by `security(("token" = []))`.
pub const TOKEN_SECURITY_SCHEME: &str = "token";

/// Enrich the generated document with the token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` with a key issued by POST /api/auth/token/login/.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Foodgram API",
        description = "Recipes, favourites, subscriptions and shopping lists.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::tokens::login,
        crate::inbound::http::tokens::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::user_detail,
        crate::inbound::http::users::set_avatar,
        crate::inbound::http::users::delete_avatar,
        crate::inbound::http::users::set_password,
        crate::inbound::http::subscriptions::list_subscriptions,
        crate::inbound::http::subscriptions::subscribe,
        crate::inbound::http::subscriptions::unsubscribe,
        crate::inbound::http::ingredients::list_ingredients,
        crate::inbound::http::ingredients::ingredient_detail,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::recipe_detail,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::recipe_short_link,
        crate::inbound::http::marks::add_favorite,
        crate::inbound::http::marks::remove_favorite,
        crate::inbound::http::marks::add_to_cart,
        crate::inbound::http::marks::remove_from_cart,
        crate::inbound::http::shopping_list::download_shopping_cart,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        TokenResponse,
        CreateUserRequest,
        CreatedUserResponse,
        AvatarRequest,
        AvatarResponse,
        SetPasswordRequest,
        UserListItem,
        UserDetail,
        SubscriptionResponse,
        IngredientResponse,
        RecipeIngredientRequest,
        RecipeRequest,
        RecipeIngredientResponse,
        RecipeResponse,
        RecipeShort,
        ShortLinkResponse,
    )),
    tags(
        (name = "auth", description = "Token login and logout"),
        (name = "users", description = "Accounts, profiles and avatars"),
        (name = "subscriptions", description = "Following authors"),
        (name = "ingredients", description = "Ingredient catalogue"),
        (name = "recipes", description = "Recipes and favourites"),
        (name = "shopping cart", description = "Shopping cart and list download"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI paths and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;

    use crate::test_support::openapi::{get_property, unwrap_object_schema};

    #[rstest]
    #[case("RecipeResponse", "is_in_shopping_cart")]
    #[case("RecipeResponse", "author")]
    #[case("UserDetail", "is_subscribed")]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("ShortLinkResponse", "short-link")]
    fn schemas_expose_client_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let object = unwrap_object_schema(
            schemas
                .get(schema)
                .unwrap_or_else(|| panic!("{schema} schema")),
            schema,
        );
        get_property(object, field);
    }

    #[rstest]
    #[case("/api/recipes/download_shopping_cart/")]
    #[case("/api/recipes/{id}/favorite/")]
    #[case("/api/users/{id}/subscribe/")]
    #[case("/api/auth/token/login/")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn token_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(TOKEN_SECURITY_SCHEME));
    }
}
