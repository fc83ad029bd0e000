//! Ingredient reference data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Database identifier of an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(i64);

impl IngredientId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named ingredient together with the unit its amounts are counted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Ingredient as it appears in an import file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct IngredientSeed {
    pub name: String,
    pub measurement_unit: String,
}

impl IngredientSeed {
    /// Whether both fields carry text. Blank rows are skipped on import.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.measurement_unit.trim().is_empty()
    }
}

/// Outcome of an ingredient import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngredientImportSummary {
    /// Rows read from the source.
    pub read: usize,
    /// Rows that were new and got inserted.
    pub inserted: usize,
    /// Rows skipped because a field was blank or the row repeated an earlier one.
    pub skipped: usize,
}
