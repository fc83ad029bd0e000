//! JSON fixture files read through `cap_std`.
//!
//! Fixtures seed ingredients and user accounts at startup and feed the
//! `load-ingredients` tool.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::{IngredientSeed, UserSeed};

/// Errors raised while loading a fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The file could not be opened or read.
    #[error("failed to read fixture at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The contents are not the expected JSON shape.
    #[error("failed to parse fixture at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read `path` and decode it as JSON.
///
/// # Errors
///
/// Returns [`FixtureError::Read`] for I/O failures and
/// [`FixtureError::Parse`] for malformed JSON.
pub fn read_json_fixture<T: DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    let read_error = |source| FixtureError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "fixture path must name a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let payload = dir.read(Path::new(file_name)).map_err(read_error)?;
    serde_json::from_slice(&payload).map_err(|source| FixtureError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Ingredient rows: a JSON array of `{name, measurement_unit}` objects.
///
/// # Errors
///
/// See [`read_json_fixture`].
pub fn read_ingredient_seeds(path: &Path) -> Result<Vec<IngredientSeed>, FixtureError> {
    read_json_fixture(path)
}

/// User accounts: a JSON array of
/// `{email, username, first_name, last_name, password}` objects.
///
/// # Errors
///
/// See [`read_json_fixture`].
pub fn read_user_seeds(path: &Path) -> Result<Vec<UserSeed>, FixtureError> {
    read_json_fixture(path)
}
