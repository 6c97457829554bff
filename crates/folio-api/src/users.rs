//! Handlers for `/users` endpoints.
//!
//! Same shape as [`crate::contents`]; the list takes only `limit` and
//! `offset`. Emails are unique among active users (409 on conflict).

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use folio_core::{
  filter::{Listing, UserQuery},
  store::Repository,
  user::{User, UserDraft, UserId, UserPatch},
};

use crate::{AppState, error::ApiError};

/// `GET /users[?limit=&offset=]`
pub async fn list<R: Repository>(
  State(state): State<AppState<R>>,
  query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Listing<User>>, ApiError> {
  let Query(query) = query?;
  Ok(Json(state.users.list(&query).await?))
}

/// `POST /users` — body: `{"name":"...","email":"..."}`
pub async fn create<R: Repository>(
  State(state): State<AppState<R>>,
  body: Result<Json<UserDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(draft) = body?;
  let user = state.users.create(&draft).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}`
pub async fn get_one<R: Repository>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
  let id: UserId = id.parse()?;
  Ok(Json(state.users.get(id).await?))
}

/// `PUT /users/{id}`
pub async fn update_one<R: Repository>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
  body: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
  let id: UserId = id.parse()?;
  let Json(patch) = body?;
  Ok(Json(state.users.update(id, &patch).await?))
}

/// `DELETE /users/{id}`
pub async fn delete_one<R: Repository>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let id: UserId = id.parse()?;
  state.users.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
