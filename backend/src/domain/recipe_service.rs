//! Recipe publishing and browsing.
//!
//! Views are assembled in batches: one author lookup, one subscription lookup
//! and one lookup per mark kind for a whole page, never one per recipe.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::{info, warn};

use crate::domain::ports::{
    IngredientRepository, MediaStore, RecipeCommand, RecipeListQuery, RecipeMarkRepository,
    RecipeQuery, RecipeRepository, SubscriptionRepository, UserRepository,
};
use crate::domain::user_service::page_not_found;
use crate::domain::{
    Error, ImageUpload, MediaPath, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeMark,
    RecipeRecord, RecipeValidationError, RecipeView, UserId, UserProfile, subscribed_authors,
};

/// Recipe service implementing [`RecipeCommand`] and [`RecipeQuery`].
#[derive(Clone)]
pub struct RecipeService<R, I, K, U, S> {
    recipes: Arc<R>,
    ingredients: Arc<I>,
    marks: Arc<K>,
    users: Arc<U>,
    subscriptions: Arc<S>,
    media: Arc<dyn MediaStore>,
}

impl<R, I, K, U, S> RecipeService<R, I, K, U, S> {
    pub fn new(
        recipes: Arc<R>,
        ingredients: Arc<I>,
        marks: Arc<K>,
        users: Arc<U>,
        subscriptions: Arc<S>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            recipes,
            ingredients,
            marks,
            users,
            subscriptions,
            media,
        }
    }
}

fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

impl<R, I, K, U, S> RecipeService<R, I, K, U, S>
where
    R: RecipeRepository,
    I: IngredientRepository,
    K: RecipeMarkRepository,
    U: UserRepository,
    S: SubscriptionRepository,
{
    async fn existing_recipe(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find_by_id(id)
            .await?
            .ok_or_else(|| recipe_not_found(id))
    }

    async fn owned_recipe(&self, editor: UserId, id: RecipeId) -> Result<Recipe, Error> {
        let recipe = self.existing_recipe(id).await?;
        if recipe.author_id != editor {
            return Err(Error::forbidden(
                "only the author may change or delete this recipe",
            ));
        }
        Ok(recipe)
    }

    /// Reject drafts that reference ingredients missing from the catalogue.
    async fn ensure_ingredients_exist(&self, draft: &RecipeDraft) -> Result<(), Error> {
        let requested = draft.ingredient_ids();
        let existing: HashSet<_> = self
            .ingredients
            .existing_ids(&requested)
            .await?
            .into_iter()
            .collect();
        let missing: Vec<_> = requested
            .into_iter()
            .filter(|id| !existing.contains(id))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RecipeValidationError::UnknownIngredients { ids: missing }.into())
        }
    }

    async fn store_image(&self, image: &ImageUpload) -> Result<MediaPath, Error> {
        let path = MediaPath::for_recipe_image(image.format());
        self.media.save(&path, image.bytes()).await?;
        Ok(path)
    }

    async fn discard_image(&self, path: &MediaPath) {
        if let Err(err) = self.media.delete(path).await {
            warn!(path = %path, error = %err, "recipe image not removed");
        }
    }

    async fn marked(
        &self,
        mark: RecipeMark,
        viewer: Option<UserId>,
        ids: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, Error> {
        let Some(viewer) = viewer else {
            return Ok(HashSet::new());
        };
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let marked = self.marks.marked_among(mark, viewer, ids).await?;
        Ok(marked.into_iter().collect())
    }

    async fn views(
        &self,
        viewer: Option<UserId>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, Error> {
        let mut author_ids: Vec<UserId> = recipes.iter().map(|recipe| recipe.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: HashMap<UserId, _> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            self.users
                .find_many(&author_ids)
                .await?
                .into_iter()
                .map(|user| (user.id, user))
                .collect()
        };
        let followed =
            subscribed_authors(self.subscriptions.as_ref(), viewer, &author_ids).await?;

        let recipe_ids: Vec<RecipeId> = recipes.iter().map(|recipe| recipe.id).collect();
        let favorited = self.marked(RecipeMark::Favorite, viewer, &recipe_ids).await?;
        let in_cart = self
            .marked(RecipeMark::ShoppingCart, viewer, &recipe_ids)
            .await?;

        recipes
            .into_iter()
            .map(|recipe| {
                let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                    Error::internal(format!(
                        "author {} of recipe {} is missing",
                        recipe.author_id, recipe.id
                    ))
                })?;
                Ok(RecipeView {
                    author: UserProfile {
                        is_subscribed: followed.contains(&recipe.author_id),
                        user: author,
                    },
                    is_favorited: favorited.contains(&recipe.id),
                    is_in_shopping_cart: in_cart.contains(&recipe.id),
                    recipe,
                })
            })
            .collect()
    }

    async fn view(&self, viewer: Option<UserId>, recipe: Recipe) -> Result<RecipeView, Error> {
        let id = recipe.id;
        self.views(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| recipe_not_found(id))
    }
}

#[async_trait]
impl<R, I, K, U, S> RecipeCommand for RecipeService<R, I, K, U, S>
where
    R: RecipeRepository,
    I: IngredientRepository,
    K: RecipeMarkRepository,
    U: UserRepository,
    S: SubscriptionRepository,
{
    async fn create(
        &self,
        author: UserId,
        draft: RecipeDraft,
        image: Option<ImageUpload>,
    ) -> Result<RecipeView, Error> {
        let image = image.ok_or(RecipeValidationError::MissingImage)?;
        self.ensure_ingredients_exist(&draft).await?;

        let path = self.store_image(&image).await?;
        let record = RecipeRecord::from_draft(draft, path.clone());
        let id = match self.recipes.create(author, &record).await {
            Ok(id) => id,
            Err(err) => {
                self.discard_image(&path).await;
                return Err(err.into());
            }
        };
        info!(recipe_id = %id, author_id = %author, "recipe created");

        let recipe = self.existing_recipe(id).await?;
        self.view(Some(author), recipe).await
    }

    async fn update(
        &self,
        editor: UserId,
        id: RecipeId,
        draft: RecipeDraft,
        image: Option<ImageUpload>,
    ) -> Result<RecipeView, Error> {
        let current = self.owned_recipe(editor, id).await?;
        self.ensure_ingredients_exist(&draft).await?;

        let replacement = match &image {
            Some(upload) => Some(self.store_image(upload).await?),
            None => None,
        };
        let path = replacement
            .clone()
            .unwrap_or_else(|| current.image.clone());
        let record = RecipeRecord::from_draft(draft, path);
        if let Err(err) = self.recipes.update(id, &record).await {
            if let Some(fresh) = &replacement {
                self.discard_image(fresh).await;
            }
            return Err(err.into());
        }
        if replacement.is_some() {
            self.discard_image(&current.image).await;
        }
        info!(recipe_id = %id, "recipe updated");

        let recipe = self.existing_recipe(id).await?;
        self.view(Some(editor), recipe).await
    }

    async fn delete(&self, editor: UserId, id: RecipeId) -> Result<(), Error> {
        let recipe = self.owned_recipe(editor, id).await?;
        self.recipes.delete(id).await?;
        self.discard_image(&recipe.image).await;
        info!(recipe_id = %id, "recipe deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, I, K, U, S> RecipeQuery for RecipeService<R, I, K, U, S>
where
    R: RecipeRepository,
    I: IngredientRepository,
    K: RecipeMarkRepository,
    U: UserRepository,
    S: SubscriptionRepository,
{
    async fn recipes(
        &self,
        viewer: Option<UserId>,
        query: RecipeListQuery,
        page: PageRequest,
    ) -> Result<Page<RecipeView>, Error> {
        let needs_viewer = query.only_favorited || query.only_in_shopping_cart;
        if needs_viewer && viewer.is_none() {
            page.ensure_in_range(0).map_err(|_| page_not_found())?;
            return Ok(Page::new(Vec::new(), 0, page));
        }

        let filter = RecipeFilter {
            author: query.author,
            favorited_by: viewer.filter(|_| query.only_favorited),
            in_shopping_cart_of: viewer.filter(|_| query.only_in_shopping_cart),
            name_contains: query.search.filter(|search| !search.is_empty()),
        };
        let total = self.recipes.count(&filter).await?;
        page.ensure_in_range(total).map_err(|_| page_not_found())?;
        let recipes = self
            .recipes
            .list(&filter, page.offset(), page.limit())
            .await?;
        let views = self.views(viewer, recipes).await?;
        Ok(Page::new(views, total, page))
    }

    async fn recipe(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error> {
        let recipe = self.existing_recipe(id).await?;
        self.view(viewer, recipe).await
    }
}
