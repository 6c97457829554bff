//! Use cases — thin orchestration of validation, filter building and
//! repository calls, translating "nothing there" into domain errors.
//!
//! Each service is cheap to clone and holds no mutable state; every call
//! works on locally-scoped values only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  Error, Result,
  content::{Content, ContentDraft, ContentId, ContentPatch},
  filter::{ContentFilter, ContentQuery, Listing, PageLimits, UserQuery},
  store::{BackendError, Repository},
  user::{User, UserDraft, UserId, UserPatch},
};

// ─── Contents ────────────────────────────────────────────────────────────────

pub struct ContentService<R> {
  repo:   Arc<R>,
  limits: PageLimits,
}

impl<R> Clone for ContentService<R> {
  fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo), limits: self.limits } }
}

impl<R: Repository> ContentService<R> {
  pub fn new(repo: Arc<R>, limits: PageLimits) -> Self { Self { repo, limits } }

  pub async fn create(&self, draft: &ContentDraft) -> Result<Content> {
    let fields = draft.validate()?;
    let content = self
      .repo
      .create_content(fields)
      .await
      .map_err(Error::store)?;
    tracing::info!(id = %content.id, kind = %content.content_type(), "content created");
    Ok(content)
  }

  pub async fn get(&self, id: ContentId) -> Result<Content> {
    tracing::debug!(%id, "fetching content");
    self
      .repo
      .get_content(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ContentNotFound(id))
  }

  pub async fn list(&self, query: &ContentQuery) -> Result<Listing<Content>> {
    let filter = ContentFilter::build(query, &self.limits)?;
    tracing::debug!(?filter, "listing contents");
    let page = self
      .repo
      .list_contents(&filter)
      .await
      .map_err(Error::store)?;
    Ok(Listing::new(page, filter.page))
  }

  /// Fetch, merge `patch`, re-validate the whole record, then persist.
  pub async fn update(&self, id: ContentId, patch: &ContentPatch) -> Result<Content> {
    let mut content = self.get(id).await?;
    content.apply(patch)?;

    let stored = self
      .repo
      .update_content(&content)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ContentNotFound(id))?;
    tracing::info!(%id, "content updated");
    Ok(stored)
  }

  pub async fn delete(&self, id: ContentId) -> Result<()> {
    if !self.repo.delete_content(id).await.map_err(Error::store)? {
      return Err(Error::ContentNotFound(id));
    }
    tracing::info!(%id, "content deleted");
    Ok(())
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub struct UserService<R> {
  repo:   Arc<R>,
  limits: PageLimits,
}

impl<R> Clone for UserService<R> {
  fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo), limits: self.limits } }
}

impl<R: Repository> UserService<R> {
  pub fn new(repo: Arc<R>, limits: PageLimits) -> Self { Self { repo, limits } }

  /// Create a user. The email is checked against active users first; a
  /// concurrent writer that wins the race still surfaces as
  /// [`Error::EmailAlreadyExists`] through the store's unique index.
  pub async fn create(&self, draft: &UserDraft) -> Result<User> {
    let fields = draft.validate()?;
    let email = fields.email().to_owned();
    self.ensure_email_free(&email, None).await?;

    let user = self
      .repo
      .create_user(fields)
      .await
      .map_err(|e| conflict_or_store(e, &email))?;
    tracing::info!(id = %user.id, "user created");
    Ok(user)
  }

  pub async fn get(&self, id: UserId) -> Result<User> {
    tracing::debug!(%id, "fetching user");
    self
      .repo
      .get_user(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UserNotFound(id))
  }

  pub async fn list(&self, query: &UserQuery) -> Result<Listing<User>> {
    let page = query.pagination(&self.limits);
    tracing::debug!(?page, "listing users");
    let users = self.repo.list_users(&page).await.map_err(Error::store)?;
    Ok(Listing::new(users, page))
  }

  pub async fn update(&self, id: UserId, patch: &UserPatch) -> Result<User> {
    let mut user = self.get(id).await?;
    user.apply(patch)?;
    self.ensure_email_free(user.email(), Some(id)).await?;

    let stored = self
      .repo
      .update_user(&user)
      .await
      .map_err(|e| conflict_or_store(e, user.email()))?
      .ok_or(Error::UserNotFound(id))?;
    tracing::info!(%id, "user updated");
    Ok(stored)
  }

  pub async fn delete(&self, id: UserId) -> Result<()> {
    if !self.repo.delete_user(id).await.map_err(Error::store)? {
      return Err(Error::UserNotFound(id));
    }
    tracing::info!(%id, "user deleted");
    Ok(())
  }

  async fn ensure_email_free(&self, email: &str, excluding: Option<UserId>) -> Result<()> {
    if self
      .repo
      .email_taken(email, excluding)
      .await
      .map_err(Error::store)?
    {
      return Err(Error::EmailAlreadyExists(email.to_owned()));
    }
    Ok(())
  }
}

fn conflict_or_store<E: BackendError>(e: E, email: &str) -> Error {
  if e.is_unique_violation() {
    Error::EmailAlreadyExists(email.to_owned())
  } else {
    Error::store(e)
  }
}

// ─── Health ──────────────────────────────────────────────────────────────────

/// Reachability of the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
  Connected,
  Disconnected,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
  pub database:   DatabaseStatus,
  pub checked_at: DateTime<Utc>,
}

impl HealthReport {
  pub fn is_healthy(&self) -> bool { self.database == DatabaseStatus::Connected }
}

pub struct HealthService<R> {
  repo: Arc<R>,
}

impl<R> Clone for HealthService<R> {
  fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: Repository> HealthService<R> {
  pub fn new(repo: Arc<R>) -> Self { Self { repo } }

  /// Ping the store. Failures are logged here and reported as
  /// `Disconnected`, never returned.
  pub async fn check(&self) -> HealthReport {
    let database = match self.repo.ping().await {
      Ok(()) => DatabaseStatus::Connected,
      Err(e) => {
        tracing::warn!(error = %e, "store ping failed");
        DatabaseStatus::Disconnected
      }
    };
    HealthReport { database, checked_at: Utc::now() }
  }
}
