//! Handler errors and their JSON rendering.
//!
//! Every error body is `{"error": <message>, "param": <name>?}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// A required query parameter is absent or blank.
  #[error("missing query parameter `{0}`")]
  MissingParam(&'static str),

  /// A query parameter is present but out of range.
  #[error("invalid `{param}`: {reason}")]
  InvalidParam { param: &'static str, reason: String },

  #[error("no food carries barcode {0}")]
  UnknownBarcode(String),

  /// The store failed; its text is not sent to the client.
  #[error("storage error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  pub(crate) fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
    Self::InvalidParam { param, reason: reason.into() }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::MissingParam(_) | Self::InvalidParam { .. } => StatusCode::BAD_REQUEST,
      Self::UnknownBarcode(_) => StatusCode::NOT_FOUND,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let body = match &self {
      Self::MissingParam(param) | Self::InvalidParam { param, .. } => {
        json!({ "error": self.to_string(), "param": param })
      }
      Self::UnknownBarcode(_) => json!({ "error": self.to_string() }),
      Self::Store(_) => json!({ "error": "internal storage error" }),
    };
    (self.status(), Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parameter_errors_name_the_parameter() {
    let err = ApiError::invalid("page_size", "must be between 1 and 100");
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "invalid `page_size`: must be between 1 and 100");
    assert_eq!(ApiError::MissingParam("barcode").to_string(), "missing query parameter `barcode`");
  }

  #[test]
  fn store_errors_are_internal() {
    let err = ApiError::store(std::io::Error::other("disk on fire"));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
