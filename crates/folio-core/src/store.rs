//! The `Repository` trait — the persistence seam every use case depends on.
//!
//! Implemented by storage backends (e.g. `folio-store-sqlite`). Soft-deleted
//! rows are invisible through every method: reads return `None`, writes
//! report that nothing was touched.

use std::future::Future;

use chrono::{DateTime, SubsecRound as _, TimeDelta, Utc};

use crate::{
  content::{Content, ContentFields, ContentId},
  filter::{ContentFilter, Page, Pagination},
  user::{User, UserFields, UserId},
};

/// Classification the service layer needs from a backend failure.
pub trait BackendError: std::error::Error + Send + Sync + 'static {
  /// `true` if the failure is a uniqueness-constraint violation.
  fn is_unique_violation(&self) -> bool;
}

/// Abstraction over a Folio store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait Repository: Send + Sync {
  type Error: BackendError;

  // ── Contents ──────────────────────────────────────────────────────────

  /// Insert a new content record. The store assigns the id and sets
  /// `created_at == updated_at`.
  fn create_content(
    &self,
    fields: ContentFields,
  ) -> impl Future<Output = Result<Content, Self::Error>> + Send + '_;

  /// Fetch an active content record.
  fn get_content(
    &self,
    id: ContentId,
  ) -> impl Future<Output = Result<Option<Content>, Self::Error>> + Send + '_;

  /// Return the active records matching `filter`, newest first, plus the
  /// total number of matches.
  fn list_contents<'a>(
    &'a self,
    filter: &'a ContentFilter,
  ) -> impl Future<Output = Result<Page<Content>, Self::Error>> + Send + 'a;

  /// Persist the fields of `content` and refresh `updated_at`. Returns the
  /// stored record, or `None` if it is no longer active.
  fn update_content<'a>(
    &'a self,
    content: &'a Content,
  ) -> impl Future<Output = Result<Option<Content>, Self::Error>> + Send + 'a;

  /// Soft-delete an active record. Returns `false` if there was none.
  fn delete_content(
    &self,
    id: ContentId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Insert a new user. Fails with a unique violation if an active user
  /// already holds the email.
  fn create_user(
    &self,
    fields: UserFields,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn list_users<'a>(
    &'a self,
    page: &'a Pagination,
  ) -> impl Future<Output = Result<Page<User>, Self::Error>> + Send + 'a;

  fn update_user<'a>(
    &'a self,
    user: &'a User,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn delete_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// `true` if an active user other than `excluding` holds `email`.
  fn email_taken<'a>(
    &'a self,
    email: &'a str,
    excluding: Option<UserId>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Health ────────────────────────────────────────────────────────────

  /// Round-trip to the backend to prove it is reachable.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// The current time, truncated to the microsecond precision stores keep.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

/// The `updated_at` to stamp on a write that follows one made at `previous`.
///
/// Strictly later than `previous` even if the wall clock has not moved on.
pub fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
  advance(previous, now())
}

fn advance(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
  if now > previous { now } else { previous + TimeDelta::microseconds(1) }
}
