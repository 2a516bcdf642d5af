//! JSON Schema validation for output records.
//!
//! The output schema is embedded at compile time from
//! `schemas/recipe.json` (JSON Schema Draft 7). It is used to check that a
//! written file reads back with the declared shape: strings, arrays of
//! strings, a number, and a nested object with four numbers.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use recipe_slim::validation::is_valid_recipe;
//!
//! let record = json!({
//!     "name": "toast",
//!     "ingredients": ["bread"],
//!     "steps": ["toast it"],
//!     "description": "crunchy",
//!     "minutes": 3,
//!     "nutrition_info": { "calories": 80.0, "fat": 1.0, "protein": 3.0, "carbs": 15.0 }
//! });
//! assert!(is_valid_recipe(&record));
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::ValidationError;

static RECIPE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/recipe.json")).expect("Invalid embedded schema")
});

static RECIPE_VALIDATOR: Lazy<jsonschema::Validator> =
    Lazy::new(|| jsonschema::draft7::new(&RECIPE_SCHEMA).expect("Invalid embedded schema"));

/// Validate one output record.
pub fn validate_recipe(data: &Value) -> Result<(), Vec<String>> {
    let errors: Vec<String> = RECIPE_VALIDATOR
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check of one output record.
pub fn is_valid_recipe(data: &Value) -> bool {
    RECIPE_VALIDATOR.is_valid(data)
}

/// Per-document validation outcome.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub valid: usize,
    pub invalid: usize,
    /// First few failures (record index, errors)
    pub errors: Vec<(usize, Vec<String>)>,
}

impl ValidationReport {
    /// Failures kept in [`ValidationReport::errors`].
    pub const MAX_REPORTED: usize = 10;

    pub fn total(&self) -> usize {
        self.valid + self.invalid
    }

    /// `Ok` when every record passed.
    pub fn into_result(self) -> Result<Self, ValidationError> {
        if self.invalid == 0 {
            Ok(self)
        } else {
            Err(ValidationError::SchemaMismatch {
                invalid: self.invalid,
                total: self.total(),
            })
        }
    }
}

/// Validate every record of an output document (a JSON array).
pub fn validate_records(document: &Value) -> Result<ValidationReport, ValidationError> {
    let records = document
        .as_array()
        .ok_or_else(|| ValidationError::NotAnArray(type_name(document).to_string()))?;

    let mut report = ValidationReport::default();
    for (i, record) in records.iter().enumerate() {
        match validate_recipe(record) {
            Ok(()) => report.valid += 1,
            Err(errors) => {
                report.invalid += 1;
                if report.errors.len() < ValidationReport::MAX_REPORTED {
                    report.errors.push((i, errors));
                }
            }
        }
    }

    Ok(report)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "found null",
        Value::Bool(_) => "found a boolean",
        Value::Number(_) => "found a number",
        Value::String(_) => "found a string",
        Value::Array(_) => "found an array",
        Value::Object(_) => "found an object",
    }
}
