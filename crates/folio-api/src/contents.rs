//! Handlers for `/contents` endpoints.
//!
//! | Method   | Path             | Notes |
//! |----------|------------------|-------|
//! | `GET`    | `/contents`      | Optional `?content_type=&author=&limit=&offset=` |
//! | `POST`   | `/contents`      | Body: `{"title","body","content_type","author"}` |
//! | `GET`    | `/contents/{id}` | 404 if not found |
//! | `PUT`    | `/contents/{id}` | Partial: absent or empty fields are kept |
//! | `DELETE` | `/contents/{id}` | 204 on success |

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
  content::{Content, ContentDraft, ContentId, ContentPatch},
  filter::{ContentQuery, Listing},
  store::Repository,
};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /contents`
pub async fn list<R: Repository>(
  State(state): State<AppState<R>>,
  query: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<Json<Listing<Content>>, ApiError> {
  let Query(query) = query?;
  Ok(Json(state.contents.list(&query).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contents`
pub async fn create<R: Repository>(
  State(state): State<AppState<R>>,
  body: Result<Json<ContentDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(draft) = body?;
  let content = state.contents.create(&draft).await?;
  Ok((StatusCode::CREATED, Json(content)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contents/{id}`
pub async fn get_one<R: Repository>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
) -> Result<Json<Content>, ApiError> {
  let id: ContentId = id.parse()?;
  Ok(Json(state.contents.get(id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /contents/{id}`
pub async fn update_one<R: Repository>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
  body: Result<Json<ContentPatch>, JsonRejection>,
) -> Result<Json<Content>, ApiError> {
  let id: ContentId = id.parse()?;
  let Json(patch) = body?;
  Ok(Json(state.contents.update(id, &patch).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contents/{id}`
pub async fn delete_one<R: Repository>(
  State(state): State<AppState<R>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let id: ContentId = id.parse()?;
  state.contents.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
