//! Error types for `gazette-core`.
//!
//! Every workflow failure is one of four kinds, so the presentation layer can
//! always choose between "not found", "not allowed", "already changed" and
//! "invalid input".

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: String },

  #[error("forbidden: {reason}")]
  Forbidden { reason: String },

  #[error("conflict: {reason}")]
  Conflict { reason: String },

  #[error("invalid {field}: {message}")]
  Validation { field: &'static str, message: String },
}

impl Error {
  pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
    Self::NotFound { entity, id: id.to_string() }
  }

  pub fn forbidden(reason: impl Into<String>) -> Self {
    Self::Forbidden { reason: reason.into() }
  }

  pub fn conflict(reason: impl Into<String>) -> Self {
    Self::Conflict { reason: reason.into() }
  }

  pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
    Self::Validation { field, message: message.into() }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound { .. } => ErrorKind::NotFound,
      Self::Forbidden { .. } => ErrorKind::Forbidden,
      Self::Conflict { .. } => ErrorKind::Conflict,
      Self::Validation { .. } => ErrorKind::Validation,
    }
  }
}

/// The closed set of failure kinds a caller has to distinguish.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  Forbidden,
  Conflict,
  Validation,
}

/// Implemented by backend error types so higher layers can recover the
/// workflow failure embedded in them. `None` means a storage failure.
pub trait WorkflowFailure {
  fn workflow_error(&self) -> Option<&Error>;
}

impl WorkflowFailure for Error {
  fn workflow_error(&self) -> Option<&Error> { Some(self) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
