//! High-level pipeline API for the recipe CSV to JSON transformation.
//!
//! Combines every step of a run: loading, field parsing, row filtering,
//! truncation, serialization and the optional schema self-check.
//!
//! # Example
//!
//! ```rust,no_run
//! use recipe_slim::{transform_csv, TransformOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = transform_csv(&TransformOptions::default())?;
//!     println!("Wrote {} recipes", summary.stats.written);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::fields::{clean_text_list, parse_minutes, parse_nutrition};
use crate::error::{ConfigError, ConfigResult, LoadResult, OutputError, OutputResult, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{RawRecipe, Recipe};
use crate::parser::{format_delimiter, load_table_bytes, load_table_file};
use crate::validation::{validate_records, ValidationReport};

/// Default input table.
pub const DEFAULT_INPUT_PATH: &str = "RAW_recipes.csv";

/// Default output file.
pub const DEFAULT_OUTPUT_PATH: &str = "hazir_tarifler.json";

/// Default number of records kept.
pub const DEFAULT_LIMIT: usize = 5000;

/// Options for the transformation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Input table
    pub input_path: PathBuf,

    /// Output JSON file
    pub output_path: PathBuf,

    /// Keep at most this many records, in file order
    pub limit: usize,

    /// Indent the output JSON
    pub pretty: bool,

    /// Re-read the written file and check it against the record schema
    pub validate_output: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            limit: DEFAULT_LIMIT,
            pretty: false,
            validate_output: false,
        }
    }
}

impl TransformOptions {
    /// Load options from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Resolve the options of one run.
    ///
    /// Starts from the built-in defaults, replaces them with the `config`
    /// file when one is given, then applies `overrides` on top.
    pub fn resolve(config: Option<&Path>, overrides: OptionOverrides) -> ConfigResult<Self> {
        let base = match config {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(overrides))
    }

    /// Apply explicitly set values. Unset values keep the current ones and
    /// the switches can only be turned on.
    pub fn with_overrides(mut self, overrides: OptionOverrides) -> Self {
        if let Some(input) = overrides.input_path {
            self.input_path = input;
        }
        if let Some(output) = overrides.output_path {
            self.output_path = output;
        }
        if let Some(limit) = overrides.limit {
            self.limit = limit;
        }
        self.pretty |= overrides.pretty;
        self.validate_output |= overrides.validate_output;
        self
    }

    /// Reject option combinations that cannot run.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.input_path == self.output_path {
            return Err(ConfigError::InvalidValue {
                option: "output_path".to_string(),
                message: "must differ from input_path".to_string(),
            });
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                option: "output_path".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Values set on the command line or in the environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionOverrides {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub limit: Option<usize>,
    pub pretty: bool,
    pub validate_output: bool,
}

/// Row counts for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformStats {
    /// Data rows in the input
    pub rows_read: usize,
    /// Nutrition cells replaced with zeros
    pub nutrition_fallbacks: usize,
    /// Ingredient cells replaced with an empty list
    pub ingredient_fallbacks: usize,
    /// Step cells replaced with an empty list
    pub step_fallbacks: usize,
    /// Rows dropped for a missing name, description or minutes
    pub dropped_missing: usize,
    /// Rows dropped for an empty ingredient list
    pub dropped_no_ingredients: usize,
    /// Valid rows beyond the limit
    pub truncated: usize,
    /// Records in the output
    pub written: usize,
}

/// Cleaned records plus their statistics
#[derive(Debug, Clone)]
pub struct CleanResult {
    pub recipes: Vec<Recipe>,
    pub stats: TransformStats,
}

/// Outcome of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: TransformStats,
    /// Input metadata
    pub encoding: String,
    pub delimiter: char,
    /// Where the records were written
    pub output_path: PathBuf,
    /// Present when `validate_output` was set
    pub validation: Option<ValidationReport>,
}

/// Transform the input table into the output JSON file.
///
/// This is the main entry point. It:
/// 1. Loads the table and selects the recipe columns
/// 2. Parses nutrition, ingredients and steps
/// 3. Drops rows with missing values or no ingredients
/// 4. Keeps the first `limit` records
/// 5. Writes them as a JSON array
///
/// Load errors abort the run before anything is written. With
/// `validate_output` set, a schema mismatch aborts it as well.
pub fn transform_csv(options: &TransformOptions) -> PipelineResult<RunSummary> {
    options.validate()?;

    log_info(format!("📖 Reading {}, this may take a while...", options.input_path.display()));
    let parsed = load_table_file(&options.input_path)?;
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Read {} rows, {} columns", parsed.rows.len(), parsed.headers.len()));

    log_info("🧹 Cleaning rows and parsing nutrition values...");
    let result = clean_rows(parsed.rows, options.limit);
    print_stats(&result.stats);

    log_info(format!("💾 Writing {}...", options.output_path.display()));
    let validation = write_checked_records(
        &result.recipes,
        &options.output_path,
        options.pretty,
        options.validate_output,
    )?;

    log_success(format!(
        "Done! '{}' created with {} recipes.",
        options.output_path.display(),
        result.stats.written
    ));
    log_info("Copy this file into your mobile app's assets folder.");

    Ok(RunSummary {
        stats: result.stats,
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        output_path: options.output_path.clone(),
        validation,
    })
}

/// Load and clean raw table bytes without touching the filesystem.
pub fn transform_bytes(bytes: &[u8], limit: usize) -> LoadResult<CleanResult> {
    let parsed = load_table_bytes(bytes)?;
    Ok(clean_rows(parsed.rows, limit))
}

/// Parse, filter and truncate selected rows.
///
/// Every row is parsed and filtered before truncation, so the statistics
/// cover the whole input and the kept records are the first `limit` valid
/// ones in file order.
pub fn clean_rows(rows: Vec<RawRecipe>, limit: usize) -> CleanResult {
    let mut stats = TransformStats {
        rows_read: rows.len(),
        ..TransformStats::default()
    };
    let mut recipes = Vec::new();

    for row in rows {
        let nutrition = parse_nutrition(row.nutrition.as_deref());
        let ingredients = clean_text_list(row.ingredients.as_deref());
        let steps = clean_text_list(row.steps.as_deref());

        stats.nutrition_fallbacks += usize::from(nutrition.is_fallback());
        stats.ingredient_fallbacks += usize::from(ingredients.is_fallback());
        stats.step_fallbacks += usize::from(steps.is_fallback());

        let minutes = row.minutes.as_deref().and_then(parse_minutes);
        let (Some(name), Some(description), Some(minutes)) = (row.name, row.description, minutes)
        else {
            stats.dropped_missing += 1;
            continue;
        };

        let ingredients = ingredients.into_value();
        if ingredients.is_empty() {
            stats.dropped_no_ingredients += 1;
            continue;
        }

        if recipes.len() == limit {
            stats.truncated += 1;
            continue;
        }

        recipes.push(Recipe {
            name,
            ingredients,
            steps: steps.into_value(),
            description,
            minutes,
            nutrition_info: nutrition.into_value(),
        });
    }

    stats.written = recipes.len();
    CleanResult { recipes, stats }
}

/// Serialize records as a JSON array. Non-ASCII text is kept as-is.
pub fn serialize_records(recipes: &[Recipe], pretty: bool) -> OutputResult<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(recipes)?
    } else {
        serde_json::to_vec(recipes)?
    };
    Ok(bytes)
}

/// Serialize records as a JSON array and write them to `path`.
///
/// The file is only created once the whole document has been serialized.
pub fn write_records(recipes: &[Recipe], path: &Path, pretty: bool) -> OutputResult<()> {
    std::fs::write(path, serialize_records(recipes, pretty)?)?;
    Ok(())
}

/// Write records, optionally checking the serialized document against the
/// record schema first. A failed check leaves `path` untouched.
pub fn write_checked_records(
    recipes: &[Recipe],
    path: &Path,
    pretty: bool,
    validate: bool,
) -> PipelineResult<Option<ValidationReport>> {
    let bytes = serialize_records(recipes, pretty)?;

    let validation = if validate {
        log_info("✔️  Validating serialized records...");
        let document: serde_json::Value = serde_json::from_slice(&bytes).map_err(OutputError::from)?;
        let report = validate_records(&document)?.into_result()?;
        log_success(format!("All {} records match the schema", report.valid));
        Some(report)
    } else {
        None
    };

    std::fs::write(path, bytes).map_err(OutputError::from)?;
    Ok(validation)
}

fn print_stats(stats: &TransformStats) {
    log_success(format!("{} rows parsed", stats.rows_read));
    if stats.nutrition_fallbacks > 0 {
        log_info_indent(format!("{} nutrition values defaulted to zero", stats.nutrition_fallbacks), 1);
    }
    if stats.ingredient_fallbacks + stats.step_fallbacks > 0 {
        log_info_indent(
            format!(
                "{} ingredient lists and {} step lists defaulted to empty",
                stats.ingredient_fallbacks, stats.step_fallbacks
            ),
            1,
        );
    }
    if stats.dropped_missing > 0 {
        log_warning(format!("{} rows dropped (missing name, description or minutes)", stats.dropped_missing));
    }
    if stats.dropped_no_ingredients > 0 {
        log_warning(format!("{} rows dropped (no ingredients)", stats.dropped_no_ingredients));
    }
    if stats.truncated > 0 {
        log_info(format!("{} valid rows beyond the limit were left out", stats.truncated));
    }
    log_success(format!("{} recipes kept", stats.written));
}
