//! Error types for the recipe transformation pipeline.
//!
//! Only whole-file problems are errors. Per-field parse failures never reach
//! this module: they are absorbed by [`crate::transform::fields`] and replaced
//! with fallback defaults.
//!
//! - [`LoadError`] - Reading and decoding the input table
//! - [`ConfigError`] - Options file and option values
//! - [`OutputError`] - Writing the JSON output
//! - [`ValidationError`] - Output schema checks
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while loading the input table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Content could not be decoded to text.
    #[error("Failed to decode content as {encoding}")]
    Encoding { encoding: String },

    /// The table structure is broken (tokenizer error, ragged row).
    #[error("Malformed table at line {line}: {message}")]
    Malformed { line: u64, message: String },

    /// Empty file.
    #[error("Input file is empty")]
    EmptyFile,

    /// A required column is not in the header.
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while building [`crate::TransformOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Options file could not be read.
    #[error("Cannot read options file: {0}")]
    Io(#[from] std::io::Error),

    /// Options file is not valid JSON for the options shape.
    #[error("Invalid options file: {0}")]
    Json(#[from] serde_json::Error),

    /// An option has an unusable value.
    #[error("Invalid value for option '{option}': {message}")]
    InvalidValue { option: String, message: String },
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing the output file.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to create or write the file.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failed.
    #[error("Failed to serialize records: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors when checking records against the output schema.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more records do not match the schema.
    #[error("{invalid} of {total} records failed schema validation")]
    SchemaMismatch { invalid: usize, total: usize },

    /// The document is not a JSON array of records.
    #[error("Expected a JSON array of records: {0}")]
    NotAnArray(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the main error type returned by [`crate::transform_csv`].
/// Any of these aborts the run before the output file is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input loading error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Output error.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
