//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the embedded migrations under
//! `backend/migrations`. Regenerate with `diesel print-schema` after a
//! migration changes a table.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        /// Normalised address, unique.
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Media path of the avatar, relative to the media root.
        avatar -> Nullable<Text>,
    }
}

diesel::table! {
    /// Issued API tokens, at most one per user.
    auth_tokens (digest) {
        /// Hex SHA-256 of the key handed to the client.
        digest -> Varchar,
        user_id -> Int8,
    }
}

diesel::table! {
    /// Follower to author links.
    subscriptions (id) {
        id -> Int8,
        user_id -> Int8,
        author_id -> Int8,
    }
}

diesel::table! {
    /// Ingredient reference data, unique on `(name, measurement_unit)`.
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        author_id -> Int8,
        name -> Varchar,
        text -> Text,
        cooking_time -> Int4,
        image -> Text,
    }
}

diesel::table! {
    /// Ingredient lines. `id` preserves the order lines were written in.
    recipe_ingredients (id) {
        id -> Int8,
        recipe_id -> Int8,
        ingredient_id -> Int8,
        amount -> Int4,
    }
}

diesel::table! {
    favorites (id) {
        id -> Int8,
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    /// Cart entries. `id` gives the order recipes were added in.
    shopping_cart (id) {
        id -> Int8,
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(shopping_cart -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    auth_tokens,
    subscriptions,
    ingredients,
    recipes,
    recipe_ingredients,
    favorites,
    shopping_cart,
);
