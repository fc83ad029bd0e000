//! Startup seeding of ingredients and user accounts from fixture files.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use foodgram::AppSettings;
use foodgram::domain::ports::{IngredientRepository, SubscriptionRepository, UserRepository};
use foodgram::domain::{Error, IngredientService, UserAccountsService};
use foodgram::outbound::fixtures::{FixtureError, read_ingredient_seeds, read_user_seeds};

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// A fixture file could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    /// Ingredient import failed.
    #[error("ingredient seeding failed: {0}")]
    Ingredients(#[source] Error),
    /// Account creation failed.
    #[error("user seeding failed: {0}")]
    Users(#[source] Error),
}

/// What startup seeding did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Ingredients inserted, `None` when the import was skipped.
    pub ingredients: Option<usize>,
    /// Accounts created, `None` when no user fixture was configured.
    pub users: Option<usize>,
}

/// Apply the fixture files named in `settings`.
///
/// Ingredients are only imported into an empty table. Users whose email is
/// already registered are left alone, so restarts are harmless.
pub async fn seed_on_startup<I, U, S>(
    settings: &AppSettings,
    ingredients: &IngredientService<I>,
    accounts: &UserAccountsService<U, S>,
) -> Result<SeedReport, StartupSeedingError>
where
    I: IngredientRepository,
    U: UserRepository,
    S: SubscriptionRepository,
{
    let mut report = SeedReport::default();

    if let Some(path) = settings.ingredients_fixture.as_deref() {
        report.ingredients = seed_ingredients(path, ingredients).await?;
    } else {
        info!(reason = "not configured", "ingredient seeding skipped");
    }

    if let Some(path) = settings.users_fixture.as_deref() {
        let seeds = read_user_seeds(path)?;
        let created = accounts
            .seed_users(seeds)
            .await
            .map_err(StartupSeedingError::Users)?;
        info!(path = %path.display(), created, "user fixture applied");
        report.users = Some(created);
    }

    Ok(report)
}

async fn seed_ingredients<I>(
    path: &Path,
    ingredients: &IngredientService<I>,
) -> Result<Option<usize>, StartupSeedingError>
where
    I: IngredientRepository,
{
    let seeds = read_ingredient_seeds(path)?;
    let summary = ingredients
        .seed_if_empty(seeds)
        .await
        .map_err(StartupSeedingError::Ingredients)?;
    match summary {
        Some(summary) => {
            info!(path = %path.display(), inserted = summary.inserted, "ingredient fixture applied");
            Ok(Some(summary.inserted))
        }
        None => {
            info!(reason = "already populated", "ingredient seeding skipped");
            Ok(None)
        }
    }
}
