//! Error types for `newsdesk-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown ordering: {0:?}")]
  UnknownOrdering(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Classification every [`NewsStore`](crate::store::NewsStore) backend error
/// must expose, so callers can tell a uniqueness race apart from an I/O
/// failure without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// A uniqueness or referential constraint rejected the write.
  fn is_constraint_violation(&self) -> bool;

  /// The row an operation addressed does not exist.
  fn is_not_found(&self) -> bool { false }
}
