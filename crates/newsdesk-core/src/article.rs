//! Article types and the read-side query shape.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, source::Source, summary::SummaryView, topic::Topic};

// ─── Stored article ──────────────────────────────────────────────────────────

/// A persisted article. `url` is globally unique and is the upsert identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
  pub id:           i64,
  pub title:        String,
  pub url:          String,
  pub source_id:    i64,
  /// `None` when the feed timestamp was absent or unparseable.
  pub published_at: Option<DateTime<Utc>>,
  pub author:       String,
  pub body:         String,
  pub created_at:   DateTime<Utc>,
}

/// The mutable fields written by an upsert. Everything here is replaced
/// wholesale when the url already exists; topics and summary are not part of
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleInput {
  pub title:        String,
  pub url:          String,
  pub published_at: Option<DateTime<Utc>>,
  pub author:       String,
  pub body:         String,
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// An article with its source, topics and summary resolved, as served by the
/// read API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleView {
  pub id:           i64,
  pub title:        String,
  pub url:          String,
  pub source:       Source,
  pub topics:       Vec<Topic>,
  pub summary:      Option<SummaryView>,
  pub published_at: Option<DateTime<Utc>>,
  pub author:       String,
  pub body:         String,
}

/// One page of [`ArticleView`]s plus the total number of matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticlePage {
  pub count:   u64,
  pub results: Vec<ArticleView>,
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Sort order for article listings. Articles without a publish date always
/// sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleOrder {
  #[default]
  NewestFirst,
  OldestFirst,
}

impl FromStr for ArticleOrder {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "-published_at" => Ok(Self::NewestFirst),
      "published_at" => Ok(Self::OldestFirst),
      other => Err(Error::UnknownOrdering(other.to_owned())),
    }
  }
}

/// Parameters for [`NewsStore::list_articles`](crate::store::NewsStore::list_articles).
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
  /// Keep articles tagged with any of these topic ids.
  pub topic_ids:   Vec<i64>,
  /// Keep articles tagged with any of these topic slugs.
  pub topic_slugs: Vec<String>,
  pub order:       ArticleOrder,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ordering_parses_both_directions() {
    assert_eq!("-published_at".parse::<ArticleOrder>().unwrap(), ArticleOrder::NewestFirst);
    assert_eq!("published_at".parse::<ArticleOrder>().unwrap(), ArticleOrder::OldestFirst);
  }

  #[test]
  fn ordering_rejects_other_fields() {
    let err = "title".parse::<ArticleOrder>().unwrap_err();
    assert!(matches!(err, Error::UnknownOrdering(ref f) if f == "title"));
  }
}
