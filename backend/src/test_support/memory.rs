//! In-memory implementation of every repository port.
//!
//! One [`InMemoryStore`] plays users, tokens, subscriptions, ingredients,
//! recipes and marks at once, so a single `Arc` can be handed to every
//! service. Ordering follows the PostgreSQL adapters: users and subscriptions
//! by insertion, recipes newest first, ingredients by name then id.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    IngredientRepository, IngredientRepositoryError, NewUserRecord, RecipeMarkRepository,
    RecipeMarkRepositoryError, RecipeRepository, RecipeRepositoryError, StoredCredentials,
    SubscriptionRepository, SubscriptionRepositoryError, TokenRepository, TokenRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Ingredient, IngredientAmount, IngredientId, IngredientSeed, MediaPath, PasswordHash, Recipe,
    RecipeFilter, RecipeId, RecipeIngredient, RecipeMark, RecipeRecord, RecipeSummary,
    TokenDigest, User, UserId,
};

const OUTAGE: &str = "in-memory store marked unavailable";

struct StoredUser {
    user: User,
    password_hash: PasswordHash,
}

struct StoredRecipe {
    id: RecipeId,
    author: UserId,
    record: RecipeRecord,
}

#[derive(Default)]
struct State {
    unavailable: bool,
    next_id: i64,
    users: Vec<StoredUser>,
    tokens: HashMap<String, UserId>,
    subscriptions: Vec<(UserId, UserId)>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<StoredRecipe>,
    favorites: Vec<(UserId, RecipeId)>,
    shopping_cart: Vec<(UserId, RecipeId)>,
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn marks(&self, mark: RecipeMark) -> &Vec<(UserId, RecipeId)> {
        match mark {
            RecipeMark::Favorite => &self.favorites,
            RecipeMark::ShoppingCart => &self.shopping_cart,
        }
    }

    fn marks_mut(&mut self, mark: RecipeMark) -> &mut Vec<(UserId, RecipeId)> {
        match mark {
            RecipeMark::Favorite => &mut self.favorites,
            RecipeMark::ShoppingCart => &mut self.shopping_cart,
        }
    }

    fn user(&self, id: UserId) -> Option<&StoredUser> {
        self.users.iter().find(|stored| stored.user.id == id)
    }

    fn user_mut(&mut self, id: UserId) -> Option<&mut StoredUser> {
        self.users.iter_mut().find(|stored| stored.user.id == id)
    }

    fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.iter().find(|ingredient| ingredient.id == id)
    }

    fn lines(&self, lines: &[IngredientAmount]) -> Vec<RecipeIngredient> {
        lines
            .iter()
            .filter_map(|line| {
                self.ingredient(line.ingredient_id)
                    .map(|ingredient| RecipeIngredient {
                        ingredient: ingredient.clone(),
                        amount: line.amount,
                    })
            })
            .collect()
    }

    fn recipe(&self, stored: &StoredRecipe) -> Recipe {
        Recipe {
            id: stored.id,
            author_id: stored.author,
            name: stored.record.name.clone(),
            text: stored.record.text.clone(),
            cooking_time: stored.record.cooking_time,
            image: stored.record.image.clone(),
            ingredients: self.lines(&stored.record.ingredients),
        }
    }

    fn matches(&self, stored: &StoredRecipe, filter: &RecipeFilter) -> bool {
        let marked_by = |mark: RecipeMark, user: UserId| {
            self.marks(mark).contains(&(user, stored.id))
        };
        filter.author.is_none_or(|author| stored.author == author)
            && filter
                .favorited_by
                .is_none_or(|user| marked_by(RecipeMark::Favorite, user))
            && filter
                .in_shopping_cart_of
                .is_none_or(|user| marked_by(RecipeMark::ShoppingCart, user))
            && filter.name_contains.as_ref().is_none_or(|needle| {
                stored
                    .record
                    .name
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            })
    }

    /// Recipes matching `filter`, newest first.
    fn filtered<'a>(&'a self, filter: &'a RecipeFilter) -> impl Iterator<Item = &'a StoredRecipe> {
        self.recipes
            .iter()
            .rev()
            .filter(move |stored| self.matches(stored, filter))
    }
}

fn window<T>(items: impl Iterator<Item = T>, offset: u64, limit: u32) -> Vec<T> {
    let skip = usize::try_from(offset).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);
    items.skip(skip).take(take).collect()
}

fn count_of(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Repository double holding every table in memory.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a connection error, or recover.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Insert an ingredient directly and return its id.
    pub fn add_ingredient(&self, name: &str, measurement_unit: &str) -> IngredientId {
        let mut state = self.lock();
        let id = IngredientId::new(state.allocate_id());
        state.ingredients.push(Ingredient {
            id,
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        });
        id
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the state, failing with `outage` when marked unavailable.
    fn available<E>(&self, outage: impl FnOnce(String) -> E) -> Result<MutexGuard<'_, State>, E> {
        let state = self.lock();
        if state.unavailable {
            return Err(outage(OUTAGE.to_owned()));
        }
        Ok(state)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserRepositoryError> {
        let mut state = self.available(UserRepositoryError::connection)?;
        let registration = &record.registration;
        if state
            .users
            .iter()
            .any(|stored| stored.user.email == registration.email)
        {
            return Err(UserRepositoryError::duplicate_email());
        }
        if state
            .users
            .iter()
            .any(|stored| stored.user.username == registration.username)
        {
            return Err(UserRepositoryError::duplicate_username());
        }
        let user = User {
            id: UserId::new(state.allocate_id()),
            email: registration.email.clone(),
            username: registration.username.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            avatar: None,
        };
        state.users.push(StoredUser {
            user: user.clone(),
            password_hash: record.password_hash.clone(),
        });
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.available(UserRepositoryError::connection)?;
        Ok(state.user(id).map(|stored| stored.user.clone()))
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.available(UserRepositoryError::connection)?;
        Ok(state
            .users
            .iter()
            .filter(|stored| ids.contains(&stored.user.id))
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let state = self.available(UserRepositoryError::connection)?;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.email.as_ref() == email)
            .map(|stored| StoredCredentials {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn update_password(
        &self,
        id: UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserRepositoryError> {
        let mut state = self.available(UserRepositoryError::connection)?;
        if let Some(stored) = state.user_mut(id) {
            stored.password_hash = password_hash.clone();
        }
        Ok(())
    }

    async fn update_avatar(
        &self,
        id: UserId,
        avatar: Option<MediaPath>,
    ) -> Result<(), UserRepositoryError> {
        let mut state = self.available(UserRepositoryError::connection)?;
        if let Some(stored) = state.user_mut(id) {
            stored.user.avatar = avatar;
        }
        Ok(())
    }

    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.available(UserRepositoryError::connection)?;
        Ok(window(
            state.users.iter().map(|stored| stored.user.clone()),
            offset,
            limit,
        ))
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let state = self.available(UserRepositoryError::connection)?;
        Ok(count_of(state.users.len()))
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn store(&self, user: UserId, digest: &TokenDigest) -> Result<(), TokenRepositoryError> {
        let mut state = self.available(TokenRepositoryError::connection)?;
        state.tokens.insert(digest.as_ref().to_owned(), user);
        Ok(())
    }

    async fn find_user(&self, digest: &TokenDigest) -> Result<Option<UserId>, TokenRepositoryError> {
        let state = self.available(TokenRepositoryError::connection)?;
        Ok(state.tokens.get(digest.as_ref()).copied())
    }

    async fn revoke(&self, digest: &TokenDigest) -> Result<(), TokenRepositoryError> {
        let mut state = self.available(TokenRepositoryError::connection)?;
        state.tokens.remove(digest.as_ref());
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn add(&self, user: UserId, author: UserId) -> Result<bool, SubscriptionRepositoryError> {
        let mut state = self.available(SubscriptionRepositoryError::connection)?;
        if state.subscriptions.contains(&(user, author)) {
            return Ok(false);
        }
        state.subscriptions.push((user, author));
        Ok(true)
    }

    async fn remove(
        &self,
        user: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut state = self.available(SubscriptionRepositoryError::connection)?;
        let before = state.subscriptions.len();
        state.subscriptions.retain(|pair| *pair != (user, author));
        Ok(state.subscriptions.len() < before)
    }

    async fn subscribed_among(
        &self,
        user: UserId,
        authors: &[UserId],
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError> {
        let state = self.available(SubscriptionRepositoryError::connection)?;
        Ok(state
            .subscriptions
            .iter()
            .filter(|(follower, author)| *follower == user && authors.contains(author))
            .map(|(_, author)| *author)
            .collect())
    }

    async fn authors(
        &self,
        user: UserId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<User>, SubscriptionRepositoryError> {
        let state = self.available(SubscriptionRepositoryError::connection)?;
        let followed = state
            .subscriptions
            .iter()
            .filter(|(follower, _)| *follower == user)
            .filter_map(|(_, author)| state.user(*author).map(|stored| stored.user.clone()));
        Ok(window(followed, offset, limit))
    }

    async fn count_authors(&self, user: UserId) -> Result<u64, SubscriptionRepositoryError> {
        let state = self.available(SubscriptionRepositoryError::connection)?;
        Ok(count_of(
            state
                .subscriptions
                .iter()
                .filter(|(follower, _)| *follower == user)
                .count(),
        ))
    }
}

#[async_trait]
impl IngredientRepository for InMemoryStore {
    async fn search(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let state = self.available(IngredientRepositoryError::connection)?;
        let prefix = name_prefix.map(|prefix| prefix.to_lowercase());
        let mut found: Vec<Ingredient> = state
            .ingredients
            .iter()
            .filter(|ingredient| {
                prefix
                    .as_ref()
                    .is_none_or(|prefix| ingredient.name.to_lowercase().starts_with(prefix))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, IngredientRepositoryError> {
        let state = self.available(IngredientRepositoryError::connection)?;
        Ok(state.ingredient(id).cloned())
    }

    async fn existing_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, IngredientRepositoryError> {
        let state = self.available(IngredientRepositoryError::connection)?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| state.ingredient(*id).is_some())
            .collect())
    }

    async fn insert_missing(
        &self,
        seeds: &[IngredientSeed],
    ) -> Result<usize, IngredientRepositoryError> {
        let mut state = self.available(IngredientRepositoryError::connection)?;
        let mut inserted = 0;
        for seed in seeds {
            let exists = state.ingredients.iter().any(|ingredient| {
                ingredient.name == seed.name && ingredient.measurement_unit == seed.measurement_unit
            });
            if exists {
                continue;
            }
            let id = IngredientId::new(state.allocate_id());
            state.ingredients.push(Ingredient {
                id,
                name: seed.name.clone(),
                measurement_unit: seed.measurement_unit.clone(),
            });
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn count(&self) -> Result<u64, IngredientRepositoryError> {
        let state = self.available(IngredientRepositoryError::connection)?;
        Ok(count_of(state.ingredients.len()))
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(
        &self,
        author: UserId,
        record: &RecipeRecord,
    ) -> Result<RecipeId, RecipeRepositoryError> {
        let mut state = self.available(RecipeRepositoryError::connection)?;
        let id = RecipeId::new(state.allocate_id());
        state.recipes.push(StoredRecipe {
            id,
            author,
            record: record.clone(),
        });
        Ok(id)
    }

    async fn update(&self, id: RecipeId, record: &RecipeRecord) -> Result<(), RecipeRepositoryError> {
        let mut state = self.available(RecipeRepositoryError::connection)?;
        if let Some(stored) = state.recipes.iter_mut().find(|stored| stored.id == id) {
            stored.record = record.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: RecipeId) -> Result<(), RecipeRepositoryError> {
        let mut state = self.available(RecipeRepositoryError::connection)?;
        state.recipes.retain(|stored| stored.id != id);
        state.favorites.retain(|(_, recipe)| *recipe != id);
        state.shopping_cart.retain(|(_, recipe)| *recipe != id);
        Ok(())
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.available(RecipeRepositoryError::connection)?;
        Ok(state
            .recipes
            .iter()
            .find(|stored| stored.id == id)
            .map(|stored| state.recipe(stored)))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let state = self.available(RecipeRepositoryError::connection)?;
        let recipes = state.filtered(filter).map(|stored| state.recipe(stored));
        Ok(window(recipes, offset, limit))
    }

    async fn count(&self, filter: &RecipeFilter) -> Result<u64, RecipeRepositoryError> {
        let state = self.available(RecipeRepositoryError::connection)?;
        Ok(count_of(state.filtered(filter).count()))
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<u32>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        let state = self.available(RecipeRepositoryError::connection)?;
        let filter = RecipeFilter {
            author: Some(author),
            ..RecipeFilter::default()
        };
        let summaries = state
            .filtered(&filter)
            .map(|stored| state.recipe(stored).summary());
        Ok(window(summaries, 0, limit.unwrap_or(u32::MAX)))
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError> {
        let state = self.available(RecipeRepositoryError::connection)?;
        Ok(count_of(
            state
                .recipes
                .iter()
                .filter(|stored| stored.author == author)
                .count(),
        ))
    }

    async fn ingredient_lines(
        &self,
        recipe: RecipeId,
    ) -> Result<Vec<RecipeIngredient>, RecipeRepositoryError> {
        let state = self.available(RecipeRepositoryError::connection)?;
        Ok(state
            .recipes
            .iter()
            .find(|stored| stored.id == recipe)
            .map(|stored| state.lines(&stored.record.ingredients))
            .unwrap_or_default())
    }
}

#[async_trait]
impl RecipeMarkRepository for InMemoryStore {
    async fn add(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeMarkRepositoryError> {
        let mut state = self.available(RecipeMarkRepositoryError::connection)?;
        let marks = state.marks_mut(mark);
        if marks.contains(&(user, recipe)) {
            return Ok(false);
        }
        marks.push((user, recipe));
        Ok(true)
    }

    async fn remove(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeMarkRepositoryError> {
        let mut state = self.available(RecipeMarkRepositoryError::connection)?;
        let marks = state.marks_mut(mark);
        let before = marks.len();
        marks.retain(|pair| *pair != (user, recipe));
        Ok(marks.len() < before)
    }

    async fn marked_among(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipes: &[RecipeId],
    ) -> Result<Vec<RecipeId>, RecipeMarkRepositoryError> {
        let state = self.available(RecipeMarkRepositoryError::connection)?;
        Ok(state
            .marks(mark)
            .iter()
            .filter(|(owner, recipe)| *owner == user && recipes.contains(recipe))
            .map(|(_, recipe)| *recipe)
            .collect())
    }

    async fn recipe_ids(
        &self,
        mark: RecipeMark,
        user: UserId,
    ) -> Result<Vec<RecipeId>, RecipeMarkRepositoryError> {
        let state = self.available(RecipeMarkRepositoryError::connection)?;
        Ok(state
            .marks(mark)
            .iter()
            .filter(|(owner, _)| *owner == user)
            .map(|(_, recipe)| *recipe)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn record(name: &str, lines: &[(IngredientId, u32)]) -> RecipeRecord {
        RecipeRecord {
            name: name.to_owned(),
            text: "Mix.".to_owned(),
            cooking_time: 10,
            image: MediaPath::new("recipes/images/x.png"),
            ingredients: lines
                .iter()
                .map(|(ingredient_id, amount)| IngredientAmount {
                    ingredient_id: *ingredient_id,
                    amount: *amount,
                })
                .collect(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn recipes_list_newest_first_and_resolve_lines() {
        let store = InMemoryStore::new();
        let flour = store.add_ingredient("Flour", "g");
        let author = UserId::new(100);
        let first = RecipeRepository::create(&store, author, &record("Bread", &[(flour, 200)]))
            .await
            .expect("created");
        let second = RecipeRepository::create(&store, author, &record("Cake", &[(flour, 100)]))
            .await
            .expect("created");

        let listed = RecipeRepository::list(&store, &RecipeFilter::default(), 0, 10)
            .await
            .expect("listed");
        let ids: Vec<RecipeId> = listed.iter().map(|recipe| recipe.id).collect();
        assert_eq!(ids, vec![second, first]);
        assert_eq!(listed[1].ingredients[0].ingredient.name, "Flour");
    }

    #[rstest]
    #[tokio::test]
    async fn outage_surfaces_connection_errors() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        let error = RecipeMarkRepository::recipe_ids(
            &store,
            RecipeMark::ShoppingCart,
            UserId::new(1),
        )
        .await
        .expect_err("store unavailable");
        assert!(matches!(error, RecipeMarkRepositoryError::Connection { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_recipe_drops_its_marks() {
        let store = InMemoryStore::new();
        let flour = store.add_ingredient("Flour", "g");
        let user = UserId::new(100);
        let recipe = RecipeRepository::create(&store, user, &record("Bread", &[(flour, 1)]))
            .await
            .expect("created");
        assert!(
            RecipeMarkRepository::add(&store, RecipeMark::Favorite, user, recipe)
                .await
                .expect("marked")
        );

        RecipeRepository::delete(&store, recipe).await.expect("deleted");
        let marked = RecipeMarkRepository::recipe_ids(&store, RecipeMark::Favorite, user)
            .await
            .expect("listed");
        assert!(marked.is_empty());
    }
}
