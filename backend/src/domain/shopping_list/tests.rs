//! Tests for shopping list expansion, aggregation and rendering.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::stream;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockRecipeMarkRepository, MockRecipeRepository};
use crate::domain::{ErrorCode, IngredientId, RecipeId};

fn ingredient(id: i64, name: &str, unit: &str) -> Ingredient {
    Ingredient {
        id: IngredientId::new(id),
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    }
}

fn line(ingredient: &Ingredient, amount: u32) -> RecipeIngredient {
    RecipeIngredient {
        ingredient: ingredient.clone(),
        amount,
    }
}

/// Two recipes: (Flour/g 200, Sugar/g 50) and (Flour/g 100, Egg/pcs 2).
#[fixture]
fn pantry() -> HashMap<RecipeId, Vec<RecipeIngredient>> {
    let flour = ingredient(1, "Flour", "g");
    let sugar = ingredient(2, "Sugar", "g");
    let egg = ingredient(3, "Egg", "pcs");
    HashMap::from([
        (RecipeId::new(1), vec![line(&flour, 200), line(&sugar, 50)]),
        (RecipeId::new(2), vec![line(&flour, 100), line(&egg, 2)]),
    ])
}

fn service_over(
    cart: Vec<RecipeId>,
    pantry: HashMap<RecipeId, Vec<RecipeIngredient>>,
) -> ShoppingListService<MockRecipeMarkRepository, MockRecipeRepository> {
    let mut marks = MockRecipeMarkRepository::new();
    marks
        .expect_recipe_ids()
        .withf(|mark, _| *mark == RecipeMark::ShoppingCart)
        .returning(move |_, _| Ok(cart.clone()));
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_ingredient_lines()
        .returning(move |id| Ok(pantry.get(&id).cloned().unwrap_or_default()));
    ShoppingListService::new(Arc::new(marks), Arc::new(recipes))
}

#[rstest]
fn key_renders_name_and_unit() {
    let key = IngredientUnitKey::new("Flour", "g");
    assert_eq!(key.to_string(), "Flour (g)");
    assert_eq!(key.name(), "Flour");
    assert_eq!(key.measurement_unit(), "g");
}

#[rstest]
#[case(("Flour", "g"), ("flour", "g"))]
#[case(("Flour", "g"), ("Flour", "kg"))]
#[case(("Flour", "g"), ("Flour ", "g"))]
fn keys_differ_on_any_textual_difference(#[case] a: (&str, &str), #[case] b: (&str, &str)) {
    assert_ne!(IngredientUnitKey::new(a.0, a.1), IngredientUnitKey::new(b.0, b.1));
}

#[rstest]
fn aggregator_sums_in_first_seen_order() {
    let flour = ingredient(1, "Flour", "g");
    let egg = ingredient(3, "Egg", "pcs");
    let mut aggregator = Aggregator::new();
    aggregator.add(&egg, 1);
    aggregator.add(&flour, 900);
    aggregator.add(&egg, 2);

    let lines = aggregator.into_lines();
    let summary: Vec<_> = lines
        .iter()
        .map(|line| (line.key.name(), line.total))
        .collect();
    assert_eq!(summary, vec![("Egg", 3), ("Flour", 900)]);
}

#[rstest]
fn aggregator_merges_distinct_ingredients_with_equal_text() {
    let mut aggregator = Aggregator::new();
    aggregator.add(&ingredient(1, "Salt", "g"), 5);
    aggregator.add(&ingredient(9, "Salt", "g"), 7);
    let lines = aggregator.into_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines.first().map(|line| line.total), Some(12));
}

#[rstest]
fn aggregator_uses_wide_totals() {
    let rice = ingredient(1, "Rice", "g");
    let mut aggregator = Aggregator::new();
    for _ in 0..200_000 {
        aggregator.add(&rice, 32_000);
    }
    let lines = aggregator.into_lines();
    assert_eq!(lines.first().map(|line| line.total), Some(6_400_000_000));
}

#[rstest]
fn render_of_nothing_is_empty() {
    assert_eq!(render(&[]), "");
}

#[rstest]
#[tokio::test]
async fn aggregate_propagates_first_error() {
    let flour = ingredient(1, "Flour", "g");
    let lines = stream::iter(vec![
        Ok(line(&flour, 1)),
        Err("storage down"),
        Ok(line(&flour, 2)),
    ]);
    let result = aggregate(lines).await;
    assert_eq!(result, Err("storage down"));
}

#[rstest]
#[tokio::test]
async fn renders_cart_totals(pantry: HashMap<RecipeId, Vec<RecipeIngredient>>) {
    let service = service_over(vec![RecipeId::new(1), RecipeId::new(2)], pantry);

    let list = service
        .shopping_list(UserId::new(7))
        .await
        .expect("shopping list builds");

    insta::assert_snapshot!(list.render(), @r"
    Flour (g) — 300
    Sugar (g) — 50
    Egg (pcs) — 2
    ");
}

#[rstest]
#[tokio::test]
async fn cart_order_decides_line_order(pantry: HashMap<RecipeId, Vec<RecipeIngredient>>) {
    let service = service_over(vec![RecipeId::new(2), RecipeId::new(1)], pantry);

    let rendered = service
        .shopping_list(UserId::new(7))
        .await
        .expect("shopping list builds")
        .render();

    assert_eq!(rendered, "Flour (g) — 300\nEgg (pcs) — 2\nSugar (g) — 50");
}

#[rstest]
#[tokio::test]
async fn totals_match_every_reachable_amount(pantry: HashMap<RecipeId, Vec<RecipeIngredient>>) {
    let expected: u64 = pantry
        .values()
        .flatten()
        .map(|line| u64::from(line.amount))
        .sum();
    let service = service_over(vec![RecipeId::new(1), RecipeId::new(2)], pantry);

    let first = service.shopping_list(UserId::new(7)).await.expect("first run");
    let second = service.shopping_list(UserId::new(7)).await.expect("second run");

    let total: u64 = first.lines.iter().map(|line| line.total).sum();
    assert_eq!(total, expected);
    assert_eq!(first.render(), second.render());
}

#[rstest]
#[tokio::test]
async fn empty_cart_renders_empty_report() {
    let mut marks = MockRecipeMarkRepository::new();
    marks
        .expect_recipe_ids()
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_ingredient_lines().never();
    let service = ShoppingListService::new(Arc::new(marks), Arc::new(recipes));

    let list = service
        .shopping_list(UserId::new(1))
        .await
        .expect("empty cart is not an error");

    assert!(list.lines.is_empty());
    assert_eq!(list.render(), "");
}

#[rstest]
#[case(RecipeMarkRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(RecipeMarkRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn cart_failures_map_to_domain_errors(
    #[case] failure: RecipeMarkRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut marks = MockRecipeMarkRepository::new();
    marks
        .expect_recipe_ids()
        .times(1)
        .return_once(move |_, _| Err(failure));
    let service = ShoppingListService::new(Arc::new(marks), Arc::new(MockRecipeRepository::new()));

    let error = service
        .shopping_list(UserId::new(1))
        .await
        .expect_err("storage failure propagates");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn recipe_failures_abort_without_partial_result() {
    let mut marks = MockRecipeMarkRepository::new();
    marks
        .expect_recipe_ids()
        .return_once(|_, _| Ok(vec![RecipeId::new(1), RecipeId::new(2)]));
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_ingredient_lines()
        .times(1)
        .return_once(|_| Err(RecipeRepositoryError::connection("pool timed out")));
    let service = ShoppingListService::new(Arc::new(marks), Arc::new(recipes));

    let error = service
        .shopping_list(UserId::new(1))
        .await
        .expect_err("storage failure propagates");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
