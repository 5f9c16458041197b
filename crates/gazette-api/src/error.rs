//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body has the shape `{"error": {"kind": "...", "message": "..."}}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use gazette_core::{ErrorKind, WorkflowFailure};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The identity headers were missing or unreadable.
  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error(transparent)]
  Workflow(#[from] gazette_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Split a backend error into its workflow failure or an opaque storage
  /// failure.
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + WorkflowFailure + Send + Sync + 'static,
  {
    match e.workflow_error() {
      Some(workflow) => Self::Workflow(workflow.clone()),
      None => Self::Store(Box::new(e)),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      Self::Workflow(e) => match e.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
      },
      Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
  }

  fn kind(&self) -> &'static str {
    match self {
      Self::Unauthorized(_) => "unauthorized",
      Self::Workflow(e) => e.kind().into(),
      Self::Store(_) => "unavailable",
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = match &self {
      // Storage details stay in the log.
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        "storage is temporarily unavailable".to_owned()
      }
      other => other.to_string(),
    };
    let body = json!({ "error": { "kind": self.kind(), "message": message } });
    (self.status(), Json(body)).into_response()
  }
}
