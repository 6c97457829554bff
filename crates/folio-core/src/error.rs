//! Error types for `folio-core`.
//!
//! [`ValidationError`] covers everything a caller can fix by changing its
//! input. [`Error`] adds the lookup, conflict and backend failures that the
//! services surface.

use thiserror::Error;

use crate::{content::ContentId, user::UserId};

/// A field rule that rejected caller input. Deterministic for a given input,
/// so never worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("title must be between 1 and 200 characters")]
  InvalidTitle,

  #[error("body must not be empty")]
  InvalidBody,

  #[error("content type must be one of: article, blog, news, page")]
  InvalidContentType,

  #[error("author must be between 1 and 100 characters")]
  InvalidAuthor,

  #[error("invalid email format")]
  InvalidEmail,

  #[error("user name is required")]
  NameRequired,

  #[error("user name must be at most 100 characters")]
  NameTooLong,

  /// Identifiers are positive integers; zero, negatives and non-numeric
  /// strings are rejected before any store access.
  #[error("invalid id")]
  InvalidId,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("content not found: {0}")]
  ContentNotFound(ContentId),

  #[error("user not found: {0}")]
  UserNotFound(UserId),

  #[error("user email already exists: {0}")]
  EmailAlreadyExists(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend failure as an opaque store error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
