//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Fixed message returned for every rejected credential.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access";

/// An error returned by an API handler.
///
/// Absent users and contacts are not errors; handlers answer those with
/// `null` or zero-count update reports.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing, malformed, expired or forged bearer token.
  #[error("unauthorized")]
  Unauthorized,

  #[error("token error: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_owned())
      }
      ApiError::Token(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": true, "message": message }))).into_response()
  }
}
