//! Domain models for the recipe transformation pipeline.
//!
//! - [`Column`] - The six input columns the pipeline keeps
//! - [`RawRecipe`] - One selected input row, still as text
//! - [`NutritionInfo`] - The four nutrition values kept from the raw field
//! - [`Recipe`] - One cleaned output record

use serde::{Deserialize, Serialize};
use serde_json::Number;

// =============================================================================
// Input Columns
// =============================================================================

/// Input columns retained by column selection.
///
/// Every other column in the input table is discarded at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Ingredients,
    Nutrition,
    Steps,
    Description,
    Minutes,
}

impl Column {
    /// All retained columns, in selection order.
    pub const ALL: [Column; 6] = [
        Column::Name,
        Column::Ingredients,
        Column::Nutrition,
        Column::Steps,
        Column::Description,
        Column::Minutes,
    ];

    /// Header name as it appears in the input file.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Ingredients => "ingredients",
            Column::Nutrition => "nutrition",
            Column::Steps => "steps",
            Column::Description => "description",
            Column::Minutes => "minutes",
        }
    }
}

// =============================================================================
// Raw Row
// =============================================================================

/// A row after column selection. `None` means the cell is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecipe {
    pub name: Option<String>,
    pub ingredients: Option<String>,
    pub nutrition: Option<String>,
    pub steps: Option<String>,
    pub description: Option<String>,
    pub minutes: Option<String>,
}

impl RawRecipe {
    /// Mutable access to the cell for `column`.
    pub fn cell_mut(&mut self, column: Column) -> &mut Option<String> {
        match column {
            Column::Name => &mut self.name,
            Column::Ingredients => &mut self.ingredients,
            Column::Nutrition => &mut self.nutrition,
            Column::Steps => &mut self.steps,
            Column::Description => &mut self.description,
            Column::Minutes => &mut self.minutes,
        }
    }
}

// =============================================================================
// Nutrition
// =============================================================================

/// Nutrition values kept from the raw 7-element nutrition field.
///
/// The raw field is ordered `[calories, fat, sugar, sodium, protein,
/// saturated_fat, carbs]`; sugar, sodium and saturated fat are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub calories: f64,
    pub fat: f64,
    pub protein: f64,
    pub carbs: f64,
}

impl NutritionInfo {
    /// Number of values in the raw nutrition field.
    pub const RAW_LEN: usize = 7;

    /// Build from the full raw sequence, keeping positions 0, 1, 4 and 6.
    pub fn from_raw(values: &[f64; Self::RAW_LEN]) -> Self {
        Self {
            calories: values[0],
            fat: values[1],
            protein: values[4],
            carbs: values[6],
        }
    }

    /// The all-zero value substituted when the raw field cannot be parsed.
    pub fn zero() -> Self {
        Self::default()
    }
}

// =============================================================================
// Recipe (output record)
// =============================================================================

/// One cleaned recipe, as written to the output file.
///
/// Field order here is the key order in the emitted JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub description: String,
    pub minutes: Number,
    pub nutrition_info: NutritionInfo,
}

// =============================================================================
// Tests
// =============================================================================
