//! Field parsers for the serialized recipe columns.
//!
//! ## Data-cleaning policy
//!
//! A cell that cannot be parsed into the expected shape is not an error: it
//! is replaced with a fixed default and the row carries on. Every parser
//! returns a [`FieldOutcome`] so callers can tell a value that was actually
//! in the data from a default that was substituted for it.
//!
//! Malformed and absent nutrition cells both fall back to all zeros.

use serde_json::Number;

use super::literal::{parse_number_sequence, parse_string_sequence};
use crate::models::NutritionInfo;

/// Result of parsing one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome<T> {
    /// The cell held a well-formed value.
    Parsed(T),
    /// The cell was malformed or absent; this is the default.
    Fallback(T),
}

impl<T> FieldOutcome<T> {
    /// The value, whether parsed or substituted.
    pub fn into_value(self) -> T {
        match self {
            FieldOutcome::Parsed(v) | FieldOutcome::Fallback(v) => v,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            FieldOutcome::Parsed(v) | FieldOutcome::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FieldOutcome::Fallback(_))
    }
}

/// Parse a raw nutrition cell.
///
/// The cell must be a sequence of exactly 7 finite numbers. Anything else,
/// including an absent cell, yields [`NutritionInfo::zero`].
///
/// # Example
/// ```
/// use recipe_slim::transform::fields::parse_nutrition;
///
/// let info = parse_nutrition(Some("[51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]"));
/// assert!(!info.is_fallback());
/// assert_eq!(info.value().protein, 2.0);
///
/// assert!(parse_nutrition(Some("not a list")).is_fallback());
/// ```
pub fn parse_nutrition(text: Option<&str>) -> FieldOutcome<NutritionInfo> {
    let parsed = text
        .and_then(|t| parse_number_sequence(t).ok())
        .and_then(|values| <[f64; NutritionInfo::RAW_LEN]>::try_from(values).ok())
        .filter(|values| values.iter().all(|v| v.is_finite()));

    match parsed {
        Some(values) => FieldOutcome::Parsed(NutritionInfo::from_raw(&values)),
        None => FieldOutcome::Fallback(NutritionInfo::zero()),
    }
}

/// Parse a raw string-list cell (`ingredients`, `steps`).
///
/// Anything that is not a sequence of strings, including an absent cell,
/// yields an empty list.
pub fn clean_text_list(text: Option<&str>) -> FieldOutcome<Vec<String>> {
    match text.map(parse_string_sequence) {
        Some(Ok(items)) => FieldOutcome::Parsed(items),
        _ => FieldOutcome::Fallback(Vec::new()),
    }
}

/// Parse a raw `minutes` cell. Integers stay integers.
///
/// Returns `None` for a value that is not a finite number; the row is then
/// treated as having a missing value.
pub fn parse_minutes(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nutrition_valid() {
        let outcome = parse_nutrition(Some("[51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]"));
        assert_eq!(
            outcome,
            FieldOutcome::Parsed(NutritionInfo {
                calories: 51.5,
                fat: 0.0,
                protein: 2.0,
                carbs: 4.0,
            })
        );
    }

    #[test]
    fn test_nutrition_integers() {
        let info = parse_nutrition(Some("[100, 1, 2, 3, 4, 5, 6]")).into_value();
        assert_eq!(info.calories, 100.0);
        assert_eq!(info.protein, 4.0);
        assert_eq!(info.carbs, 6.0);
    }

    #[test]
    fn test_nutrition_not_a_list() {
        let outcome = parse_nutrition(Some("not a list"));
        assert_eq!(outcome, FieldOutcome::Fallback(NutritionInfo::zero()));
    }

    #[test]
    fn test_nutrition_wrong_count() {
        assert!(parse_nutrition(Some("[1.0, 2.0, 3.0]")).is_fallback());
        assert!(parse_nutrition(Some("[1, 2, 3, 4, 5, 6, 7, 8]")).is_fallback());
        assert!(parse_nutrition(Some("[]")).is_fallback());
    }

    #[test]
    fn test_nutrition_non_numeric() {
        assert!(parse_nutrition(Some("['a', 0, 0, 0, 0, 0, 0]")).is_fallback());
        assert!(parse_nutrition(Some("[None, 0, 0, 0, 0, 0, 0]")).is_fallback());
    }

    #[test]
    fn test_nutrition_absent_and_empty() {
        assert!(parse_nutrition(None).is_fallback());
        assert!(parse_nutrition(Some("")).is_fallback());
    }

    #[test]
    fn test_nutrition_valid_zero_is_not_fallback() {
        let outcome = parse_nutrition(Some("[0, 0, 0, 0, 0, 0, 0]"));
        assert!(!outcome.is_fallback());
        assert_eq!(*outcome.value(), NutritionInfo::zero());
    }

    #[test]
    fn test_nutrition_non_finite_rejected() {
        assert!(parse_nutrition(Some("[1e400, 0, 0, 0, 0, 0, 0]")).is_fallback());
    }

    #[test]
    fn test_text_list_valid() {
        let outcome = clean_text_list(Some("['flour','salt']"));
        assert_eq!(outcome, FieldOutcome::Parsed(vec!["flour".to_string(), "salt".to_string()]));
    }

    #[test]
    fn test_text_list_invalid() {
        assert_eq!(clean_text_list(Some("flour, salt")), FieldOutcome::Fallback(vec![]));
        assert_eq!(clean_text_list(Some("[1, 2]")), FieldOutcome::Fallback(vec![]));
        assert_eq!(clean_text_list(None), FieldOutcome::Fallback(vec![]));
    }

    #[test]
    fn test_text_list_empty_literal_is_parsed() {
        assert_eq!(clean_text_list(Some("[]")), FieldOutcome::Parsed(vec![]));
    }

    #[test]
    fn test_minutes() {
        assert_eq!(parse_minutes("40"), Some(Number::from(40)));
        assert_eq!(parse_minutes("2.5"), Number::from_f64(2.5));
        assert_eq!(parse_minutes("forty"), None);
        assert_eq!(parse_minutes("inf"), None);
    }
}
