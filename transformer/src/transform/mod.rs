//! Transformation module.
//!
//! This module turns selected raw rows into cleaned recipes:
//! - Literal: Parser for the serialized list cells
//! - Fields: Per-field parsers with fallback defaults
//! - Pipeline: Filtering, truncation, output and the full run

pub mod fields;
pub mod literal;
pub mod pipeline;

pub use fields::{clean_text_list, parse_minutes, parse_nutrition, FieldOutcome};
pub use literal::{parse_literal, Literal, LiteralError};
pub use pipeline::*;
