//! Errors surfaced by the HTTP layer. The puzzle itself never errors: bad input is a no-op.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unknown puzzle: {0}")]
  UnknownPuzzle(Uuid),
  #[error("daily limit reached, come back tomorrow")]
  LimitReached,
  #[error("no new headlines available")]
  NoHeadline,
  #[error("bad request: {0}")]
  BadRequest(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::UnknownPuzzle(_) => StatusCode::NOT_FOUND,
      ApiError::LimitReached => StatusCode::TOO_MANY_REQUESTS,
      ApiError::NoHeadline => StatusCode::NO_CONTENT,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    // 204 must not carry a body
    if status == StatusCode::NO_CONTENT {
      return status.into_response();
    }
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}
