//! Shopping list aggregation.
//!
//! A user's cart is expanded into the ingredient lines of every recipe in it,
//! the amounts are summed per `(name, unit)` pair in first-seen order, and the
//! totals are rendered as a plain-text report:
//!
//! ```text
//! Flour (g) — 300
//! Sugar (g) — 50
//! Egg (pcs) — 2
//! ```
//!
//! Every call starts from fresh storage reads and a fresh accumulator.
//! Nothing is cached or shared between requests.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, Stream, StreamExt, TryStreamExt};
use tracing::debug;

use crate::domain::ports::{
    RecipeMarkRepository, RecipeMarkRepositoryError, RecipeRepository, RecipeRepositoryError,
    ShoppingListQuery,
};
use crate::domain::{Error, Ingredient, RecipeIngredient, RecipeMark, UserId};

/// File name offered to clients downloading the report.
pub const SHOPPING_LIST_FILE_NAME: &str = "shopping_cart.txt";

/// Grouping key for ingredient amounts.
///
/// Two ingredients share a key only when both name and unit are textually
/// identical. No case folding or trimming is applied, so `Flour (g)` and
/// `flour (g)` stay separate lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngredientUnitKey {
    name: String,
    measurement_unit: String,
}

impl IngredientUnitKey {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
        }
    }

    /// Key of a stored ingredient.
    pub fn of(ingredient: &Ingredient) -> Self {
        Self::new(ingredient.name.as_str(), ingredient.measurement_unit.as_str())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn measurement_unit(&self) -> &str {
        &self.measurement_unit
    }
}

impl fmt::Display for IngredientUnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.measurement_unit)
    }
}

/// Failure while reading the cart or a recipe's ingredient lines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartExpansionError {
    #[error(transparent)]
    Cart(#[from] RecipeMarkRepositoryError),
    #[error(transparent)]
    Recipe(#[from] RecipeRepositoryError),
}

impl From<CartExpansionError> for Error {
    fn from(error: CartExpansionError) -> Self {
        match error {
            CartExpansionError::Cart(RecipeMarkRepositoryError::Connection { message })
            | CartExpansionError::Recipe(RecipeRepositoryError::Connection { message }) => {
                Error::service_unavailable(format!("shopping cart storage unavailable: {message}"))
            }
            CartExpansionError::Cart(RecipeMarkRepositoryError::Query { message })
            | CartExpansionError::Recipe(RecipeRepositoryError::Query { message }) => {
                Error::internal(format!("shopping cart storage error: {message}"))
            }
        }
    }
}

/// Lazily expand a user's cart into `(ingredient, amount)` lines.
///
/// Lines come in cart-entry order, then in each recipe's ingredient order.
/// The first storage error ends the stream.
pub fn expand_cart<'a, K, R>(
    marks: &'a K,
    recipes: &'a R,
    user: UserId,
) -> impl Stream<Item = Result<RecipeIngredient, CartExpansionError>> + 'a
where
    K: RecipeMarkRepository + ?Sized,
    R: RecipeRepository + ?Sized,
{
    stream::once(marks.recipe_ids(RecipeMark::ShoppingCart, user))
        .map_err(CartExpansionError::from)
        .map_ok(move |recipe_ids| {
            stream::iter(recipe_ids)
                .then(move |recipe_id| recipes.ingredient_lines(recipe_id))
                .map_err(CartExpansionError::from)
                .map_ok(|lines| stream::iter(lines).map(Ok::<_, CartExpansionError>))
                .try_flatten()
        })
        .try_flatten()
}

/// Summed amount for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedLine {
    pub key: IngredientUnitKey,
    pub total: u64,
}

/// Running totals keyed by [`IngredientUnitKey`], remembering first-seen
/// order.
#[derive(Debug, Default)]
pub struct Aggregator {
    lines: Vec<AggregatedLine>,
    positions: HashMap<IngredientUnitKey, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the total of the ingredient's key.
    pub fn add(&mut self, ingredient: &Ingredient, amount: u32) {
        let key = IngredientUnitKey::of(ingredient);
        match self.positions.get(&key) {
            Some(&position) => {
                if let Some(line) = self.lines.get_mut(position) {
                    line.total += u64::from(amount);
                }
            }
            None => {
                self.positions.insert(key.clone(), self.lines.len());
                self.lines.push(AggregatedLine {
                    key,
                    total: u64::from(amount),
                });
            }
        }
    }

    /// Totals in first-seen order.
    pub fn into_lines(self) -> Vec<AggregatedLine> {
        self.lines
    }
}

/// Drain an expansion stream into totals.
pub async fn aggregate<S, E>(lines: S) -> Result<Vec<AggregatedLine>, E>
where
    S: Stream<Item = Result<RecipeIngredient, E>>,
{
    let aggregator = lines
        .try_fold(Aggregator::new(), |mut aggregator, line| async move {
            aggregator.add(&line.ingredient, line.amount);
            Ok(aggregator)
        })
        .await?;
    Ok(aggregator.into_lines())
}

/// Render totals as `"<name> (<unit>) — <total>"` lines joined by `\n`,
/// without a trailing newline.
pub fn render(lines: &[AggregatedLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{} — {}", line.key, line.total))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Aggregated shopping list for one user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShoppingList {
    pub lines: Vec<AggregatedLine>,
}

impl ShoppingList {
    /// Plain-text report body.
    pub fn render(&self) -> String {
        render(&self.lines)
    }
}

/// Builds shopping lists from the cart and recipe repositories.
#[derive(Clone)]
pub struct ShoppingListService<K, R> {
    marks: Arc<K>,
    recipes: Arc<R>,
}

impl<K, R> ShoppingListService<K, R> {
    pub fn new(marks: Arc<K>, recipes: Arc<R>) -> Self {
        Self { marks, recipes }
    }
}

#[async_trait]
impl<K, R> ShoppingListQuery for ShoppingListService<K, R>
where
    K: RecipeMarkRepository,
    R: RecipeRepository,
{
    async fn shopping_list(&self, user: UserId) -> Result<ShoppingList, Error> {
        let lines = aggregate(expand_cart(self.marks.as_ref(), self.recipes.as_ref(), user))
            .await
            .map_err(Error::from)?;
        debug!(user_id = %user, lines = lines.len(), "shopping list aggregated");
        Ok(ShoppingList { lines })
    }
}

#[cfg(test)]
mod tests;
