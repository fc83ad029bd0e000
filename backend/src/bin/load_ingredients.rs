//! Import ingredients from a JSON file into the database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use foodgram::domain::IngredientService;
use foodgram::outbound::fixtures::read_ingredient_seeds;
use foodgram::outbound::persistence::{
    DbPool, DieselIngredientRepository, PoolConfig, run_pending_migrations,
};
use tokio::runtime::Builder;

const DATABASE_URL_VAR: &str = "FOODGRAM_DATABASE_URL";

/// `load-ingredients` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "load-ingredients",
    about = "Import a JSON array of {name, measurement_unit} objects into the ingredient catalogue",
    version
)]
struct CliArgs {
    /// Path to the ingredients JSON file.
    #[arg(value_name = "path")]
    path: PathBuf,
    /// Database connection URL. Falls back to `FOODGRAM_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let seeds = read_ingredient_seeds(&args.path).map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_VAR).ok())?;

    run_pending_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("migrate database: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let service = IngredientService::new(Arc::new(DieselIngredientRepository::new(pool)));
    let summary = service
        .import(seeds)
        .await
        .map_err(|error| io::Error::other(format!("import failed: {error}")))?;

    println!("read={}", summary.read);
    println!("inserted={}", summary.inserted);
    println!("skipped={}", summary.skipped);
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let value = from_env.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("database URL missing: set --database-url or {DATABASE_URL_VAR}"),
        )
    })?;
    if value.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{DATABASE_URL_VAR} must not be empty"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use clap::Parser;
    use rstest::rstest;

    use super::{CliArgs, resolve_database_url};

    #[rstest]
    fn explicit_url_wins_over_environment() {
        let url = resolve_database_url(
            Some("postgres://cli/foodgram".to_owned()),
            Some("postgres://env/foodgram".to_owned()),
        )
        .expect("url resolves");
        assert_eq!(url, "postgres://cli/foodgram");
    }

    #[rstest]
    fn environment_is_used_when_flag_is_absent() {
        let url = resolve_database_url(None, Some("postgres://env/foodgram".to_owned()))
            .expect("url resolves");
        assert_eq!(url, "postgres://env/foodgram");
    }

    #[rstest]
    #[case(Some("  "), None)]
    #[case(None, Some(" "))]
    #[case(None, None)]
    fn blank_or_missing_urls_are_rejected(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
    ) {
        let error = resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned))
            .expect_err("url should be rejected");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn parses_path_and_flag() {
        let args = CliArgs::try_parse_from([
            "load-ingredients",
            "data/ingredients.json",
            "--database-url",
            "postgres://localhost/foodgram",
        ])
        .expect("arguments parse");
        assert_eq!(args.path, std::path::PathBuf::from("data/ingredients.json"));
        assert_eq!(args.database_url.as_deref(), Some("postgres://localhost/foodgram"));
    }
}
