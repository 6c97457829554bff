//! User — a named account identified by a unique email address.
//!
//! Email uniqueness only holds among active users; the store enforces it,
//! the validator here only checks shape.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail as _;

use crate::{
  error::ValidationError,
  text::{merge, normalize, null_as_empty, parse_id, within},
};

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned identifier of a user record.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
  /// Wrap a raw row id. Fails for zero and negative values.
  pub fn new(raw: i64) -> Result<Self, ValidationError> {
    if raw > 0 { Ok(Self(raw)) } else { Err(ValidationError::InvalidId) }
  }

  pub fn get(self) -> i64 { self.0 }
}

impl FromStr for UserId {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { parse_id(s).map(Self) }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Validated fields ────────────────────────────────────────────────────────

/// A validated user name and normalised (trimmed, lower-cased) email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFields {
  name:  String,
  email: String,
}

impl UserFields {
  /// Validate name, then email; the first failure is returned.
  pub fn new(name: &str, email: &str) -> Result<Self, ValidationError> {
    let name = normalize(name);
    if name.is_empty() {
      return Err(ValidationError::NameRequired);
    }
    if !within(&name, 1, NAME_MAX_CHARS) {
      return Err(ValidationError::NameTooLong);
    }

    let email = normalize(email).to_lowercase();
    if !is_valid_email(&email) {
      return Err(ValidationError::InvalidEmail);
    }

    Ok(Self { name, email })
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn email(&self) -> &str { &self.email }
}

fn is_valid_email(email: &str) -> bool {
  if !within(email, 1, EMAIL_MAX_CHARS) || !email.validate_email() {
    return false;
  }
  // `validate_email` accepts dotless hosts such as `localhost`.
  email
    .rsplit_once('@')
    .is_some_and(|(_, domain)| domain.contains('.'))
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Raw, unvalidated input to the create use case. Missing or `null` fields
/// read as empty and fail the matching field rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserDraft {
  #[serde(deserialize_with = "null_as_empty")]
  pub name:  String,
  #[serde(deserialize_with = "null_as_empty")]
  pub email: String,
}

impl UserDraft {
  pub fn validate(&self) -> Result<UserFields, ValidationError> {
    UserFields::new(&self.name, &self.email)
  }
}

/// Raw overrides for the update use case. Absent or empty fields keep their
/// current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
  pub name:  Option<String>,
  pub email: Option<String>,
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A persisted, active user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
  pub id:         UserId,
  #[serde(flatten)]
  fields:         UserFields,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn new(
    id: UserId,
    fields: UserFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self { id, fields, created_at, updated_at }
  }

  pub fn fields(&self) -> &UserFields { &self.fields }

  pub fn name(&self) -> &str { &self.fields.name }

  pub fn email(&self) -> &str { &self.fields.email }

  /// Merge `patch` onto the current values and re-validate the whole
  /// result. On error `self` is left untouched.
  pub fn apply(&mut self, patch: &UserPatch) -> Result<(), ValidationError> {
    let merged = UserFields::new(
      merge(&self.fields.name, patch.name.as_deref()),
      merge(&self.fields.email, patch.email.as_deref()),
    )?;
    self.fields = merged;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> User {
    let now = Utc::now();
    User::new(
      UserId::new(3).unwrap(),
      UserFields::new("Taro", "taro@example.com").unwrap(),
      now,
      now,
    )
  }

  #[test]
  fn email_is_trimmed_and_lowercased() {
    let f = UserFields::new("  Taro Tanaka ", "  Taro@Example.COM ").unwrap();
    assert_eq!(f.name(), "Taro Tanaka");
    assert_eq!(f.email(), "taro@example.com");
  }

  #[test]
  fn name_rules() {
    assert_eq!(
      UserFields::new("   ", "a@example.com").unwrap_err(),
      ValidationError::NameRequired
    );

    let max = "田".repeat(NAME_MAX_CHARS);
    assert!(UserFields::new(&max, "a@example.com").is_ok());

    let over = "田".repeat(NAME_MAX_CHARS + 1);
    assert_eq!(
      UserFields::new(&over, "a@example.com").unwrap_err(),
      ValidationError::NameTooLong
    );
  }

  #[test]
  fn malformed_emails_are_rejected() {
    for email in [
      "",
      "   ",
      "plainaddress",
      "no-at.example.com",
      "user@localhost",
      "two@@example.com",
      "spaces in@example.com",
    ] {
      assert_eq!(
        UserFields::new("N", email).unwrap_err(),
        ValidationError::InvalidEmail,
        "{email:?} should be rejected"
      );
    }
  }

  #[test]
  fn overlong_email_is_rejected() {
    let local = "a".repeat(64);
    let domain = format!("{}.com", "b".repeat(EMAIL_MAX_CHARS));
    let email = format!("{local}@{domain}");
    assert_eq!(
      UserFields::new("N", &email).unwrap_err(),
      ValidationError::InvalidEmail
    );
  }

  #[test]
  fn name_is_checked_before_email() {
    assert_eq!(
      UserFields::new("", "nope").unwrap_err(),
      ValidationError::NameRequired
    );
  }

  #[test]
  fn null_draft_fields_fail_their_own_rule() {
    let draft: UserDraft =
      serde_json::from_value(serde_json::json!({ "name": "Taro", "email": null })).unwrap();
    assert_eq!(draft.validate().unwrap_err(), ValidationError::InvalidEmail);
  }

  #[test]
  fn apply_partial_patch() {
    let mut u = sample();
    u.apply(&UserPatch { name: None, email: Some("NEW@example.com".into()) })
      .unwrap();
    assert_eq!(u.name(), "Taro");
    assert_eq!(u.email(), "new@example.com");
  }

  #[test]
  fn failed_apply_leaves_user_untouched() {
    let mut u = sample();
    let before = u.clone();
    let err = u
      .apply(&UserPatch { name: Some("Jiro".into()), email: Some("bad".into()) })
      .unwrap_err();
    assert_eq!(err, ValidationError::InvalidEmail);
    assert_eq!(u, before);
  }
}
