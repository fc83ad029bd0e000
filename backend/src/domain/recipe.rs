//! Recipes, their ingredient lines and the validated write payload.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Ingredient, IngredientId, MediaPath, UserId, UserProfile};

/// Smallest accepted ingredient amount.
pub const MIN_AMOUNT: u32 = 1;
/// Largest accepted ingredient amount.
pub const MAX_AMOUNT: u32 = 32_000;
/// Smallest accepted cooking time in minutes.
pub const MIN_COOKING_TIME: u32 = 1;
/// Largest accepted cooking time in minutes.
pub const MAX_COOKING_TIME: u32 = 32_000;
/// Maximum length of a recipe name.
pub const RECIPE_NAME_MAX: usize = 256;

/// Database identifier of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(i64);

impl RecipeId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for recipe payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    #[error("ingredients must not be empty")]
    NoIngredients,
    #[error("ingredients must not repeat")]
    DuplicateIngredient { id: IngredientId },
    #[error("ingredient amount must be between {min} and {max}")]
    AmountOutOfRange { id: IngredientId, min: u32, max: u32 },
    #[error("ingredients with ids {ids:?} do not exist")]
    UnknownIngredients { ids: Vec<IngredientId> },
    #[error("name must not be blank")]
    BlankName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("text must not be blank")]
    BlankText,
    #[error("cooking time must be between {min} and {max}")]
    CookingTimeOutOfRange { min: u32, max: u32 },
    #[error("image is required")]
    MissingImage,
}

impl RecipeValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NoIngredients
            | Self::DuplicateIngredient { .. }
            | Self::AmountOutOfRange { .. }
            | Self::UnknownIngredients { .. } => "ingredients",
            Self::BlankName | Self::NameTooLong { .. } => "name",
            Self::BlankText => "text",
            Self::CookingTimeOutOfRange { .. } => "cooking_time",
            Self::MissingImage => "image",
        }
    }
}

/// Requested ingredient line of a recipe write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: IngredientId,
    pub amount: u32,
}

/// Validated recipe fields shared by create and update.
///
/// ## Invariants
/// - at least one ingredient, no ingredient listed twice
/// - every amount and the cooking time lie in `[1, 32000]`
/// - `name` and `text` are not blank; `name` has at most 256 characters
///
/// Existence of the referenced ingredients is checked by the recipe service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: String,
    text: String,
    cooking_time: u32,
    ingredients: Vec<IngredientAmount>,
}

impl RecipeDraft {
    /// Validate the raw fields. Ingredients are checked first, matching the
    /// order clients list them in.
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        cooking_time: u32,
        ingredients: Vec<IngredientAmount>,
    ) -> Result<Self, RecipeValidationError> {
        validate_ingredients(&ingredients)?;

        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecipeValidationError::BlankName);
        }
        if name.chars().count() > RECIPE_NAME_MAX {
            return Err(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            });
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RecipeValidationError::BlankText);
        }
        if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&cooking_time) {
            return Err(RecipeValidationError::CookingTimeOutOfRange {
                min: MIN_COOKING_TIME,
                max: MAX_COOKING_TIME,
            });
        }

        Ok(Self {
            name,
            text,
            cooking_time,
            ingredients,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cooking_time(&self) -> u32 {
        self.cooking_time
    }

    pub fn ingredients(&self) -> &[IngredientAmount] {
        &self.ingredients
    }

    /// Referenced ingredient ids in payload order.
    pub fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.ingredients.iter().map(|line| line.ingredient_id).collect()
    }
}

fn validate_ingredients(ingredients: &[IngredientAmount]) -> Result<(), RecipeValidationError> {
    if ingredients.is_empty() {
        return Err(RecipeValidationError::NoIngredients);
    }
    let mut seen = HashSet::with_capacity(ingredients.len());
    for line in ingredients {
        if !seen.insert(line.ingredient_id) {
            return Err(RecipeValidationError::DuplicateIngredient {
                id: line.ingredient_id,
            });
        }
        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&line.amount) {
            return Err(RecipeValidationError::AmountOutOfRange {
                id: line.ingredient_id,
                min: MIN_AMOUNT,
                max: MAX_AMOUNT,
            });
        }
    }
    Ok(())
}

/// Ingredient line of a stored recipe with the ingredient resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub amount: u32,
}

/// Recipe fields written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    pub name: String,
    pub text: String,
    pub cooking_time: u32,
    pub image: MediaPath,
    pub ingredients: Vec<IngredientAmount>,
}

impl RecipeRecord {
    /// Combine a validated draft with the stored image location.
    pub fn from_draft(draft: RecipeDraft, image: MediaPath) -> Self {
        let RecipeDraft {
            name,
            text,
            cooking_time,
            ingredients,
        } = draft;
        Self {
            name,
            text,
            cooking_time,
            image,
            ingredients,
        }
    }
}

/// Stored recipe with its author id and resolved ingredient lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub name: String,
    pub text: String,
    pub cooking_time: u32,
    pub image: MediaPath,
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    /// Short form used by favourites, the cart and subscriptions.
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// Short recipe form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: MediaPath,
    pub cooking_time: u32,
}

/// A recipe as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author: UserProfile,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Criteria for listing recipes. All present criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    pub favorited_by: Option<UserId>,
    pub in_shopping_cart_of: Option<UserId>,
    /// Case-insensitive substring of the recipe name.
    pub name_contains: Option<String>,
}

/// The two per-user recipe marks. Both behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeMark {
    Favorite,
    ShoppingCart,
}

impl RecipeMark {
    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn line(id: i64, amount: u32) -> IngredientAmount {
        IngredientAmount {
            ingredient_id: IngredientId::new(id),
            amount,
        }
    }

    fn draft(ingredients: Vec<IngredientAmount>) -> Result<RecipeDraft, RecipeValidationError> {
        RecipeDraft::new("Pancakes", "Mix and fry.", 20, ingredients)
    }

    #[rstest]
    fn accepts_valid_payload() {
        let draft = draft(vec![line(1, 200), line(2, 32_000)]).expect("valid draft");
        assert_eq!(draft.ingredient_ids(), vec![IngredientId::new(1), IngredientId::new(2)]);
        assert_eq!(draft.cooking_time(), 20);
    }

    #[rstest]
    #[case(vec![], RecipeValidationError::NoIngredients)]
    #[case(
        vec![line(1, 10), line(1, 20)],
        RecipeValidationError::DuplicateIngredient { id: IngredientId::new(1) }
    )]
    #[case(
        vec![line(3, 0)],
        RecipeValidationError::AmountOutOfRange { id: IngredientId::new(3), min: MIN_AMOUNT, max: MAX_AMOUNT }
    )]
    #[case(
        vec![line(3, 32_001)],
        RecipeValidationError::AmountOutOfRange { id: IngredientId::new(3), min: MIN_AMOUNT, max: MAX_AMOUNT }
    )]
    fn rejects_bad_ingredient_lists(
        #[case] ingredients: Vec<IngredientAmount>,
        #[case] expected: RecipeValidationError,
    ) {
        let err = draft(ingredients).expect_err("invalid ingredients");
        assert_eq!(err, expected);
        assert_eq!(err.field(), "ingredients");
    }

    #[rstest]
    #[case("  ", "text", 5, "name")]
    #[case("Soup", "", 5, "text")]
    #[case("Soup", "Boil.", 0, "cooking_time")]
    #[case("Soup", "Boil.", 32_001, "cooking_time")]
    fn rejects_bad_scalar_fields(
        #[case] name: &str,
        #[case] text: &str,
        #[case] cooking_time: u32,
        #[case] field: &str,
    ) {
        let err = RecipeDraft::new(name, text, cooking_time, vec![line(1, 1)])
            .expect_err("invalid field");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn rejects_overlong_name() {
        let err = RecipeDraft::new("x".repeat(RECIPE_NAME_MAX + 1), "text", 1, vec![line(1, 1)])
            .expect_err("name too long");
        assert_eq!(err, RecipeValidationError::NameTooLong { max: RECIPE_NAME_MAX });
    }
}
