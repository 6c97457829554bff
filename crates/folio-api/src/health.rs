//! Handler for `GET /health`.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use folio_core::{service::DatabaseStatus, store::Repository};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Healthy,
  Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
  pub status:    Status,
  pub database:  DatabaseStatus,
  pub timestamp: DateTime<Utc>,
}

/// `GET /health` — 200 when the store answers, 503 otherwise.
pub async fn handler<R: Repository>(
  State(state): State<AppState<R>>,
) -> (StatusCode, Json<HealthBody>) {
  let report = state.health.check().await;
  let (code, status) = if report.is_healthy() {
    (StatusCode::OK, Status::Healthy)
  } else {
    (StatusCode::SERVICE_UNAVAILABLE, Status::Unhealthy)
  };

  (code, Json(HealthBody {
    status,
    database: report.database,
    timestamp: report.checked_at,
  }))
}
