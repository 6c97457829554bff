//! Error type for `folio-store-sqlite`.

use folio_core::{ValidationError, store::BackendError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored row no longer passes domain validation.
  #[error("corrupt {table} row {id}: {reason}")]
  Corrupt {
    table:  &'static str,
    id:     i64,
    reason: ValidationError,
  },
}

impl BackendError for Error {
  fn is_unique_violation(&self) -> bool {
    matches!(
      self,
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _)
      )) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
