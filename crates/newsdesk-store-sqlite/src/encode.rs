//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings
//! (`2024-01-02T03:04:05.000000Z`) so that lexicographic order in SQL equals
//! chronological order.

use chrono::{DateTime, Datelike as _, SecondsFormat, Utc};
use newsdesk_core::{
  article::{Article, ArticleView},
  source::Source,
  summary::Summary,
  topic::Topic,
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Encode an article's publish date. Years outside `0..=9999` have no
/// fixed-width form and are rejected before anything is written.
pub fn encode_published_at(dt: DateTime<Utc>) -> Result<String> {
  if !(0..=9999).contains(&dt.year()) {
    return Err(Error::TimestampOutOfRange(dt.to_rfc3339()));
  }
  Ok(encode_dt(dt))
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Column lists ────────────────────────────────────────────────────────────

/// Column list matching [`RawArticle::from_row`], qualified with alias `a`.
pub const ARTICLE_COLUMNS: &str =
  "a.article_id, a.title, a.url, a.source_id, a.published_at, a.author, a.body, a.created_at";

/// Column list matching [`RawSource::from_row`].
pub const SOURCE_COLUMNS: &str = "source_id, name, slug, homepage, created_at";

/// Column list matching [`RawTopic::from_row`], qualified with alias `t`.
pub const TOPIC_COLUMNS: &str = "t.topic_id, t.name, t.slug, t.created_at";

/// Column list matching [`RawSummary::from_row`].
pub const SUMMARY_COLUMNS: &str = "article_id, text, model_name, created_at";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `sources` row.
pub struct RawSource {
  pub source_id:  i64,
  pub name:       String,
  pub slug:       String,
  pub homepage:   Option<String>,
  pub created_at: String,
}

impl RawSource {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      source_id:  row.get(0)?,
      name:       row.get(1)?,
      slug:       row.get(2)?,
      homepage:   row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_source(self) -> Result<Source> {
    Ok(Source {
      id:         self.source_id,
      name:       self.name,
      slug:       self.slug,
      homepage:   self.homepage,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `topics` row.
pub struct RawTopic {
  pub topic_id:   i64,
  pub name:       String,
  pub slug:       String,
  pub created_at: String,
}

impl RawTopic {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      topic_id:   row.get(0)?,
      name:       row.get(1)?,
      slug:       row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_topic(self) -> Result<Topic> {
    Ok(Topic {
      id:         self.topic_id,
      name:       self.name,
      slug:       self.slug,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `articles` row.
pub struct RawArticle {
  pub article_id:   i64,
  pub title:        String,
  pub url:          String,
  pub source_id:    i64,
  pub published_at: Option<String>,
  pub author:       String,
  pub body:         String,
  pub created_at:   String,
}

impl RawArticle {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      article_id:   row.get(0)?,
      title:        row.get(1)?,
      url:          row.get(2)?,
      source_id:    row.get(3)?,
      published_at: row.get(4)?,
      author:       row.get(5)?,
      body:         row.get(6)?,
      created_at:   row.get(7)?,
    })
  }

  pub fn into_article(self) -> Result<Article> {
    Ok(Article {
      id:           self.article_id,
      title:        self.title,
      url:          self.url,
      source_id:    self.source_id,
      published_at: self.published_at.as_deref().map(decode_dt).transpose()?,
      author:       self.author,
      body:         self.body,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `summaries` row.
pub struct RawSummary {
  pub article_id: i64,
  pub text:       String,
  pub model_name: String,
  pub created_at: String,
}

impl RawSummary {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      article_id: row.get(0)?,
      text:       row.get(1)?,
      model_name: row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_summary(self) -> Result<Summary> {
    Ok(Summary {
      article_id: self.article_id,
      text:       self.text,
      model_name: self.model_name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// An article row joined with everything the read model needs.
pub struct RawArticleView {
  pub article: RawArticle,
  pub source:  RawSource,
  pub topics:  Vec<RawTopic>,
  pub summary: Option<RawSummary>,
}

impl RawArticleView {
  pub fn into_view(self) -> Result<ArticleView> {
    let article = self.article.into_article()?;
    let topics = self
      .topics
      .into_iter()
      .map(RawTopic::into_topic)
      .collect::<Result<Vec<_>>>()?;
    let summary = self
      .summary
      .map(RawSummary::into_summary)
      .transpose()?
      .map(Into::into);

    Ok(ArticleView {
      id: article.id,
      title: article.title,
      url: article.url,
      source: self.source.into_source()?,
      topics,
      summary,
      published_at: article.published_at,
      author: article.author,
      body: article.body,
    })
  }
}
