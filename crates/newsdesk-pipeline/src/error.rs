//! Error types for `newsdesk-pipeline`.

use newsdesk_core::StoreError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure talking to the article feed. Always fatal for the batch.
#[derive(Debug, Error)]
pub enum FeedFetchError {
  #[error("feed request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("feed returned HTTP {status}: {body}")]
  Status { status: u16, body: String },

  #[error("feed response is not valid JSON: {0}")]
  Malformed(#[source] serde_json::Error),

  #[error("feed reported an error ({code}): {message}")]
  Api { code: String, message: String },
}

/// Failure of the text generation service. The summarizer always recovers
/// from these by falling back to the extractive summary.
#[derive(Debug, Error)]
pub enum GenerationServiceError {
  #[error("generation service rate limit reached")]
  RateLimited,

  #[error("generation service returned HTTP {status}: {message}")]
  Api { status: u16, message: String },

  #[error("generation request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("could not decode generation response: {0}")]
  Parse(String),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  FeedFetch(#[from] FeedFetchError),

  /// A uniqueness or referential constraint rejected a store write.
  #[error("constraint violation: {0}")]
  ConstraintViolation(#[source] BoxError),

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

impl Error {
  /// Wrap a backend error, keeping constraint violations distinguishable.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    if e.is_constraint_violation() {
      Error::ConstraintViolation(Box::new(e))
    } else {
      Error::Store(Box::new(e))
    }
  }

  pub fn is_constraint_violation(&self) -> bool {
    matches!(self, Error::ConstraintViolation(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
