//! Error type for `gazette-store-sqlite`.

use gazette_core::WorkflowFailure;
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A typed workflow failure; never retried.
  #[error(transparent)]
  Workflow(#[from] gazette_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("decode error: {0}")]
  Decode(String),
}

impl Error {
  /// Busy or locked database: the only failures worth retrying.
  pub fn is_transient(&self) -> bool {
    let sqlite = match self {
      Self::Sqlite(e) => e,
      Self::Database(tokio_rusqlite::Error::Rusqlite(e)) => e,
      _ => return false,
    };
    matches!(
      sqlite.sqlite_error_code(),
      Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
  }
}

impl WorkflowFailure for Error {
  fn workflow_error(&self) -> Option<&gazette_core::Error> {
    match self {
      Self::Workflow(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
