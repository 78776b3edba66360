//! Canonical categories attached to articles by the tagger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
  pub id:         i64,
  pub name:       String,
  pub slug:       String,
  pub created_at: DateTime<Utc>,
}
