//! HTTP inbound adapter exposing the REST API.
//!
//! Handlers translate requests into calls on the driving ports held by
//! [`state::HttpState`] and render domain results as JSON. [`configure`]
//! registers every API route; the server adds probes, tracing and docs.

pub mod auth;
pub mod error;
pub mod health;
pub mod ingredients;
mod links;
pub mod marks;
pub mod paging;
pub mod recipes;
pub mod shopping_list;
pub mod state;
pub mod subscriptions;
#[cfg(test)]
mod test_utils;
pub mod tokens;
pub mod users;
mod validation;
pub mod views;

use actix_web::web;

pub use error::ApiResult;

/// Register the API routes together with the extractor configs that route
/// body, query and path failures through the JSON error envelope.
///
/// Literal segments are registered before `{id}` patterns that would
/// otherwise shadow them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(tokens::login)
        .service(tokens::logout)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::current_user)
        .service(users::set_avatar)
        .service(users::delete_avatar)
        .service(users::set_password)
        .service(subscriptions::list_subscriptions)
        .service(users::user_detail)
        .service(subscriptions::subscribe)
        .service(subscriptions::unsubscribe)
        .service(ingredients::list_ingredients)
        .service(ingredients::ingredient_detail)
        .service(shopping_list::download_shopping_cart)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::recipe_detail)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(recipes::recipe_short_link)
        .service(marks::add_favorite)
        .service(marks::remove_favorite)
        .service(marks::add_to_cart)
        .service(marks::remove_from_cart);
}
