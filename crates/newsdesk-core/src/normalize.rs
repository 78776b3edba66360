//! Normalization of raw feed records.
//!
//! Feed items arrive as untyped JSON. Each one is turned into a
//! [`NormalizedArticle`] or skipped; nothing in here can fail a batch.

use chrono::{DateTime, Datelike as _, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{article::ArticleInput, source::UNKNOWN_SOURCE};

// ─── Types ───────────────────────────────────────────────────────────────────

/// One item of a feed response, kept untyped so that a single odd record
/// cannot fail deserialization of the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawArticle(pub Value);

/// A validated feed record, ready for the source registry and the upserter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedArticle {
  pub article:         ArticleInput,
  pub source_name:     String,
  /// `scheme://authority` of the article url, or empty.
  pub source_homepage: String,
}

/// Why a record was not turned into an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
  /// The record is not a JSON object.
  NotAnObject,
  /// The record has no usable `url`.
  MissingUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
  Article(NormalizedArticle),
  Skipped(SkipReason),
}

// ─── Normalizer ──────────────────────────────────────────────────────────────

/// Normalize one raw feed record.
pub fn normalize(raw: &RawArticle) -> Normalized {
  let Some(item) = raw.0.as_object() else {
    return Normalized::Skipped(SkipReason::NotAnObject);
  };

  let field = |key: &str| item.get(key).and_then(Value::as_str).unwrap_or("");

  let url = field("url").trim();
  if url.is_empty() {
    return Normalized::Skipped(SkipReason::MissingUrl);
  }

  let body = match field("content") {
    "" => field("description"),
    content => content,
  };

  let source_name = item
    .get("source")
    .and_then(|s| s.get("name"))
    .and_then(Value::as_str)
    .filter(|n| !n.is_empty())
    .unwrap_or(UNKNOWN_SOURCE);

  Normalized::Article(NormalizedArticle {
    article:         ArticleInput {
      title:        field("title").to_owned(),
      url:          url.to_owned(),
      published_at: parse_published_at(field("publishedAt")),
      author:       field("author").to_owned(),
      body:         body.to_owned(),
    },
    source_name:     source_name.to_owned(),
    source_homepage: homepage_of(url),
  })
}

/// `scheme://authority` of `url`, or an empty string when the url has no
/// scheme and authority. The scheme is lowercased; the authority is kept as
/// written, including any userinfo and explicit port.
pub fn homepage_of(url: &str) -> String {
  let Ok(parsed) = Url::parse(url) else {
    return String::new();
  };
  if !parsed.has_authority() {
    return String::new();
  }
  let scheme = parsed.scheme();
  let Some(rest) = url
    .get(scheme.len() + 1..)
    .and_then(|rest| rest.strip_prefix("//"))
  else {
    return String::new();
  };
  let authority = rest
    .split(['/', '?', '#'])
    .next()
    .unwrap_or_default();
  if authority.is_empty() {
    return String::new();
  }
  format!("{scheme}://{authority}")
}

/// Years a timestamp may fall in once converted to UTC. Values outside this
/// range have no four-digit RFC 3339 form.
pub const PUBLISHED_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Parse an ISO-8601-like timestamp. Offset-less values are taken as UTC.
/// Returns `None` for anything unrecognised, including values whose UTC year
/// falls outside [`PUBLISHED_YEARS`].
pub fn parse_published_at(s: &str) -> Option<DateTime<Utc>> {
  parse_timestamp(s.trim()).filter(|dt| PUBLISHED_YEARS.contains(&dt.year()))
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
  if s.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
    if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
      return Some(dt.with_timezone(&Utc));
    }
  }
  for fmt in [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
  ] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
      return Some(naive.and_utc());
    }
  }
  None
}
