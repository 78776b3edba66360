//! Error type for `newsdesk-store-sqlite`.

use newsdesk_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A UNIQUE, FOREIGN KEY or CHECK constraint rejected the statement.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The timestamp cannot be stored in the fixed-width column format.
  #[error("timestamp out of range: {0}")]
  TimestampOutOfRange(String),

  #[error("article not found: {0}")]
  ArticleNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, message)) = &e
      && failure.code == rusqlite::ErrorCode::ConstraintViolation
    {
      let detail = message.clone().unwrap_or_else(|| failure.to_string());
      return Error::ConstraintViolation(detail);
    }
    Error::Database(e)
  }
}

impl StoreError for Error {
  fn is_constraint_violation(&self) -> bool {
    matches!(self, Error::ConstraintViolation(_))
  }

  fn is_not_found(&self) -> bool { matches!(self, Error::ArticleNotFound(_)) }
}
