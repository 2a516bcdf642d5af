//! # recipe-slim - Trim raw recipe datasets into mobile-friendly JSON
//!
//! recipe-slim reads a large recipe table (such as `RAW_recipes.csv`), keeps
//! the six columns a recipe app needs, parses the serialized list cells and
//! writes the first N usable recipes as a single JSON file.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV table  │────▶│   Parser    │────▶│  Transform  │────▶│  JSON file  │
//! │  (ISO/UTF8) │     │ (6 columns) │     │ parse/filter│     │ (first N)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use recipe_slim::{transform_csv, TransformOptions};
//!
//! let summary = transform_csv(&TransformOptions::default()).unwrap();
//! println!("Kept {} recipes", summary.stats.written);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Recipe, NutritionInfo, RawRecipe)
//! - [`parser`] - Table loading with auto-detection and column selection
//! - [`transform`] - Literal parsing, field parsers and the pipeline
//! - [`validation`] - Output schema validation
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, LoadError, OutputError, PipelineError, ValidationError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Column, NutritionInfo, RawRecipe, Recipe};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    format_delimiter,
    is_missing,
    load_table_bytes,
    load_table_file,
    parse_table,
    ParseResult,
};

// =============================================================================
// Re-exports - Field parsing
// =============================================================================

pub use transform::fields::{clean_text_list, parse_minutes, parse_nutrition, FieldOutcome};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid_recipe, validate_recipe, validate_records, ValidationReport};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    clean_rows,
    serialize_records,
    transform_bytes,
    transform_csv,
    write_checked_records,
    write_records,
    CleanResult,
    OptionOverrides,
    RunSummary,
    TransformOptions,
    TransformStats,
    DEFAULT_INPUT_PATH,
    DEFAULT_LIMIT,
    DEFAULT_OUTPUT_PATH,
};
