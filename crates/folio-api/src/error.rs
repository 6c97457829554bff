//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body has the shape `{"code": "...", "message": "..."}`.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use folio_core::{Error, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Message sent for every failure the caller cannot act on.
const INTERNAL_MESSAGE: &str = "internal server error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Domain(#[from] Error),

  #[error(transparent)]
  Json(#[from] JsonRejection),

  #[error(transparent)]
  Query(#[from] QueryRejection),
}

impl From<ValidationError> for ApiError {
  fn from(e: ValidationError) -> Self { Self::Domain(e.into()) }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
  code:    &'static str,
  message: String,
}

fn validation_code(e: ValidationError) -> &'static str {
  match e {
    ValidationError::InvalidTitle => "INVALID_TITLE",
    ValidationError::InvalidBody => "INVALID_BODY",
    ValidationError::InvalidContentType => "INVALID_CONTENT_TYPE",
    ValidationError::InvalidAuthor => "INVALID_AUTHOR",
    ValidationError::InvalidEmail => "INVALID_EMAIL",
    ValidationError::NameRequired => "NAME_REQUIRED",
    ValidationError::NameTooLong => "NAME_TOO_LONG",
    ValidationError::InvalidId => "INVALID_ID",
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, code, message) = match &self {
      ApiError::Domain(Error::Validation(e)) => {
        (StatusCode::BAD_REQUEST, validation_code(*e), e.to_string())
      }
      ApiError::Domain(Error::ContentNotFound(_)) => {
        (StatusCode::NOT_FOUND, "CONTENT_NOT_FOUND", "content not found".to_owned())
      }
      ApiError::Domain(Error::UserNotFound(_)) => {
        (StatusCode::NOT_FOUND, "USER_NOT_FOUND", "user not found".to_owned())
      }
      ApiError::Domain(Error::EmailAlreadyExists(_)) => (
        StatusCode::CONFLICT,
        "EMAIL_ALREADY_EXISTS",
        "user email already exists".to_owned(),
      ),
      ApiError::Domain(Error::Store(e)) => {
        tracing::error!(error = %e, detail = ?e, "request failed on store error");
        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", INTERNAL_MESSAGE.to_owned())
      }
      // Oversized bodies keep their 413; every other decode failure is a 400.
      ApiError::Json(rejection) => {
        let status = match rejection.status() {
          StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
          _ => StatusCode::BAD_REQUEST,
        };
        (status, "VALIDATION_ERROR", rejection.body_text())
      }
      ApiError::Query(rejection) => {
        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", rejection.body_text())
      }
    };

    (status, Json(ErrorBody { code, message })).into_response()
  }
}
