//! String normalisation shared by the entity validators and filter builder.
//!
//! Lengths are counted in Unicode scalar values, never bytes.

use serde::{Deserialize, Deserializer};

use crate::error::ValidationError;

/// Trim leading and trailing whitespace into an owned string.
pub(crate) fn normalize(raw: &str) -> String { raw.trim().to_owned() }

/// `true` if `s` holds between `min` and `max` code points, inclusive.
pub(crate) fn within(s: &str, min: usize, max: usize) -> bool {
  let len = s.chars().count();
  (min..=max).contains(&len)
}

/// Pick the override when it is present and non-empty, else the current
/// value. Overrides are taken raw; the caller re-validates the result.
pub(crate) fn merge<'a>(current: &'a str, patch: Option<&'a str>) -> &'a str {
  match patch {
    Some(p) if !p.is_empty() => p,
    _ => current,
  }
}

/// Deserialize an explicit `null` the same way as a missing field: empty.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a surface identifier: unsigned base-10 digits, greater than zero.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ValidationError> {
  if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
    return Err(ValidationError::InvalidId);
  }
  match raw.parse::<i64>() {
    Ok(id) if id > 0 => Ok(id),
    _ => Err(ValidationError::InvalidId),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn within_counts_code_points() {
    // Four code points, twelve bytes.
    assert!(within("日本語だ", 1, 4));
    assert!(!within("日本語だ", 1, 3));
    assert!(!within("", 1, 4));
  }

  #[test]
  fn merge_ignores_empty_override() {
    assert_eq!(merge("old", None), "old");
    assert_eq!(merge("old", Some("")), "old");
    assert_eq!(merge("old", Some("new")), "new");
    assert_eq!(merge("old", Some("  ")), "  ");
  }

  #[test]
  fn parse_id_rejects_non_positive_and_garbage() {
    assert_eq!(parse_id("42"), Ok(42));
    assert_eq!(parse_id("0"), Err(ValidationError::InvalidId));
    assert_eq!(parse_id("-3"), Err(ValidationError::InvalidId));
    assert_eq!(parse_id("abc"), Err(ValidationError::InvalidId));
    assert_eq!(parse_id(""), Err(ValidationError::InvalidId));
    assert_eq!(parse_id("+5"), Err(ValidationError::InvalidId));
    assert_eq!(parse_id(" 5"), Err(ValidationError::InvalidId));
    assert_eq!(parse_id("99999999999999999999"), Err(ValidationError::InvalidId));
    assert_eq!(parse_id("007"), Ok(7));
  }
}
