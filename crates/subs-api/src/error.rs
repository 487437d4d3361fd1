//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use subs_core::store::StoreError;
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
  /// The HTTP status code.
  #[schema(example = 404)]
  pub cod:   u16,
  #[schema(example = "no such row")]
  pub error: String,
}

/// An error returned by an API handler.
///
/// Store failures are logged with their cause but answered with a generic
/// message.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("no such row")]
  NotFound,

  #[error("invalid request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Split a store error into "not found" and everything else.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    if e.is_no_such_row() {
      ApiError::NotFound
    } else {
      ApiError::Store(Box::new(e))
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<subs_core::Error> for ApiError {
  fn from(e: subs_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      ApiError::NotFound => {
        tracing::warn!("no such row");
        self.to_string()
      }
      ApiError::BadRequest(m) => {
        tracing::warn!(error = %m, "rejected request");
        m.clone()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        "internal error".to_owned()
      }
    };
    let body = ErrorBody { cod: status.as_u16(), error: message };
    (status, Json(body)).into_response()
  }
}
