//! JSON REST API for Folio.
//!
//! Exposes axum [`Router`]s backed by any [`folio_core::store::Repository`].
//! Transport concerns (binding, body limits, request tracing) are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! Router::new()
//!   .nest("/api/v1", folio_api::api_router(state.clone()))
//!   .merge(folio_api::health_router(state))
//! ```

pub mod contents;
pub mod error;
pub mod health;
pub mod users;

use std::sync::Arc;

use axum::{Router, routing::get};
use folio_core::{
  filter::PageLimits,
  service::{ContentService, HealthService, UserService},
  store::Repository,
};

pub use error::ApiError;

/// The use cases shared by every handler.
pub struct AppState<R> {
  pub contents: ContentService<R>,
  pub users:    UserService<R>,
  pub health:   HealthService<R>,
}

impl<R> Clone for AppState<R> {
  fn clone(&self) -> Self {
    Self {
      contents: self.contents.clone(),
      users:    self.users.clone(),
      health:   self.health.clone(),
    }
  }
}

impl<R: Repository> AppState<R> {
  /// Wire all services to the same repository.
  pub fn new(repo: Arc<R>, limits: PageLimits) -> Self {
    Self {
      contents: ContentService::new(Arc::clone(&repo), limits),
      users:    UserService::new(Arc::clone(&repo), limits),
      health:   HealthService::new(repo),
    }
  }
}

/// Build the resource router. Mount it under a versioned prefix.
pub fn api_router<R>(state: AppState<R>) -> Router<()>
where
  R: Repository + 'static,
{
  Router::new()
    // Contents
    .route("/contents", get(contents::list::<R>).post(contents::create::<R>))
    .route(
      "/contents/{id}",
      get(contents::get_one::<R>)
        .put(contents::update_one::<R>)
        .delete(contents::delete_one::<R>),
    )
    // Users
    .route("/users", get(users::list::<R>).post(users::create::<R>))
    .route(
      "/users/{id}",
      get(users::get_one::<R>)
        .put(users::update_one::<R>)
        .delete(users::delete_one::<R>),
    )
    .with_state(state)
}

/// Build the unversioned `/health` router.
pub fn health_router<R>(state: AppState<R>) -> Router<()>
where
  R: Repository + 'static,
{
  Router::new()
    .route("/health", get(health::handler::<R>))
    .with_state(state)
}
