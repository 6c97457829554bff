//! Content — a titled, authored piece of text of one of a fixed set of kinds.
//!
//! [`ContentFields`] is the only way to obtain validated field values, so a
//! [`Content`] can never hold a title, body, type or author that creation
//! would have rejected.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::{
  error::ValidationError,
  text::{merge, normalize, null_as_empty, parse_id, within},
};

pub const TITLE_MAX_CHARS: usize = 200;
pub const AUTHOR_MAX_CHARS: usize = 100;

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned identifier of a content record.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContentId(i64);

impl ContentId {
  /// Wrap a raw row id. Fails for zero and negative values.
  pub fn new(raw: i64) -> Result<Self, ValidationError> {
    if raw > 0 { Ok(Self(raw)) } else { Err(ValidationError::InvalidId) }
  }

  pub fn get(self) -> i64 { self.0 }
}

impl FromStr for ContentId {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { parse_id(s).map(Self) }
}

impl fmt::Display for ContentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── ContentType ─────────────────────────────────────────────────────────────

/// The closed set of content kinds. Parsing is an exact, case-sensitive
/// match against the lowercase names.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentType {
  Article,
  Blog,
  News,
  Page,
}

impl ContentType {
  pub fn as_str(self) -> &'static str { self.into() }

  /// Trim `raw` and look it up in the allowed set.
  pub fn parse(raw: &str) -> Result<Self, ValidationError> {
    raw
      .trim()
      .parse()
      .map_err(|_| ValidationError::InvalidContentType)
  }
}

// ─── Validated fields ────────────────────────────────────────────────────────

/// A validated, trimmed set of content fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentFields {
  title:        String,
  body:         String,
  content_type: ContentType,
  author:       String,
}

impl ContentFields {
  /// Trim every input and validate it.
  ///
  /// Fields are checked in the order title, body, content type, author; the
  /// first failing field decides the error.
  pub fn new(
    title: &str,
    body: &str,
    content_type: &str,
    author: &str,
  ) -> Result<Self, ValidationError> {
    let title = normalize(title);
    if !within(&title, 1, TITLE_MAX_CHARS) {
      return Err(ValidationError::InvalidTitle);
    }

    let body = normalize(body);
    if body.is_empty() {
      return Err(ValidationError::InvalidBody);
    }

    let content_type = ContentType::parse(content_type)?;

    let author = normalize(author);
    if !within(&author, 1, AUTHOR_MAX_CHARS) {
      return Err(ValidationError::InvalidAuthor);
    }

    Ok(Self { title, body, content_type, author })
  }

  pub fn title(&self) -> &str { &self.title }

  pub fn body(&self) -> &str { &self.body }

  pub fn content_type(&self) -> ContentType { self.content_type }

  pub fn author(&self) -> &str { &self.author }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Raw, unvalidated input to the create use case. Missing or `null` fields
/// read as empty and fail the matching field rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentDraft {
  #[serde(deserialize_with = "null_as_empty")]
  pub title:        String,
  #[serde(deserialize_with = "null_as_empty")]
  pub body:         String,
  #[serde(deserialize_with = "null_as_empty")]
  pub content_type: String,
  #[serde(deserialize_with = "null_as_empty")]
  pub author:       String,
}

impl ContentDraft {
  pub fn validate(&self) -> Result<ContentFields, ValidationError> {
    ContentFields::new(&self.title, &self.body, &self.content_type, &self.author)
  }
}

/// Raw overrides for the update use case. Absent or empty fields keep their
/// current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPatch {
  pub title:        Option<String>,
  pub body:         Option<String>,
  pub content_type: Option<String>,
  pub author:       Option<String>,
}

// ─── Content ─────────────────────────────────────────────────────────────────

/// A persisted, active content record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
  pub id:         ContentId,
  #[serde(flatten)]
  fields:         ContentFields,
  /// Set once by the store at insertion.
  pub created_at: DateTime<Utc>,
  /// Refreshed by the store on every write; never earlier than `created_at`.
  pub updated_at: DateTime<Utc>,
}

impl Content {
  pub fn new(
    id: ContentId,
    fields: ContentFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self { id, fields, created_at, updated_at }
  }

  pub fn fields(&self) -> &ContentFields { &self.fields }

  pub fn title(&self) -> &str { &self.fields.title }

  pub fn body(&self) -> &str { &self.fields.body }

  pub fn content_type(&self) -> ContentType { self.fields.content_type }

  pub fn author(&self) -> &str { &self.fields.author }

  /// Merge `patch` onto the current values and re-validate the whole
  /// result. On error `self` is left untouched.
  pub fn apply(&mut self, patch: &ContentPatch) -> Result<(), ValidationError> {
    let merged = ContentFields::new(
      merge(&self.fields.title, patch.title.as_deref()),
      merge(&self.fields.body, patch.body.as_deref()),
      merge(self.fields.content_type.as_str(), patch.content_type.as_deref()),
      merge(&self.fields.author, patch.author.as_deref()),
    )?;
    self.fields = merged;
    Ok(())
  }
}
