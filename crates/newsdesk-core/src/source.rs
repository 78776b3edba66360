//! The publication an article was fetched from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news publication, created lazily the first time ingestion sees its name.
///
/// `name`, `slug` and `homepage` are each unique across the store. The
/// homepage is recorded once, from the first article seen for the source, and
/// is never overwritten afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
  pub id:         i64,
  pub name:       String,
  pub slug:       String,
  pub homepage:   Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Name used when a feed record carries no source name.
pub const UNKNOWN_SOURCE: &str = "Unknown";
