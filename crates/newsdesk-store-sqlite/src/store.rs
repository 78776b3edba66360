//! The SQLite implementation of [`NewsStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use newsdesk_core::{
  article::{Article, ArticleInput, ArticleOrder, ArticlePage, ArticleQuery, ArticleView},
  slug::slugify,
  source::Source,
  store::NewsStore,
  summary::{NewSummary, Summary},
  topic::Topic,
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};

use crate::{
  Error, Result,
  encode::{
    ARTICLE_COLUMNS, RawArticle, RawArticleView, RawSource, RawSummary, RawTopic,
    SOURCE_COLUMNS, SUMMARY_COLUMNS, TOPIC_COLUMNS, decode_dt, encode_dt, encode_published_at,
  },
  schema::SCHEMA,
};

/// Article filter shared by the count and page queries of
/// [`SqliteStore::list_articles`]. `?1` is a JSON array of topic ids and `?2`
/// a JSON array of topic slugs; either may be NULL to disable that filter.
const ARTICLE_FILTER: &str = "
  (?1 IS NULL OR EXISTS (
     SELECT 1 FROM article_topics x
     WHERE x.article_id = a.article_id
       AND x.topic_id IN (SELECT value FROM json_each(?1))))
  AND
  (?2 IS NULL OR EXISTS (
     SELECT 1 FROM article_topics x
     JOIN topics t ON t.topic_id = x.topic_id
     WHERE x.article_id = a.article_id
       AND t.slug IN (SELECT value FROM json_each(?2))))";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A newsdesk store backed by a single SQLite file.
///
/// Clones share one background connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a private in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Synchronous helpers (run inside `call`) ─────────────────────────────────

fn article_exists(conn: &Connection, article_id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM articles WHERE article_id = ?1",
        params![article_id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

fn select_topics(conn: &Connection, article_id: i64) -> rusqlite::Result<Vec<RawTopic>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {TOPIC_COLUMNS}
     FROM topics t
     JOIN article_topics x ON x.topic_id = t.topic_id
     WHERE x.article_id = ?1
     ORDER BY t.name"
  ))?;
  let rows = stmt
    .query_map(params![article_id], RawTopic::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn select_summary(conn: &Connection, article_id: i64) -> rusqlite::Result<Option<RawSummary>> {
  conn
    .query_row(
      &format!("SELECT {SUMMARY_COLUMNS} FROM summaries WHERE article_id = ?1"),
      params![article_id],
      RawSummary::from_row,
    )
    .optional()
}

fn load_view(conn: &Connection, article: RawArticle) -> rusqlite::Result<RawArticleView> {
  let source = conn.query_row(
    &format!("SELECT {SOURCE_COLUMNS} FROM sources WHERE source_id = ?1"),
    params![article.source_id],
    RawSource::from_row,
  )?;
  let topics = select_topics(conn, article.article_id)?;
  let summary = select_summary(conn, article.article_id)?;
  Ok(RawArticleView { article, source, topics, summary })
}

fn decode_articles(raws: Vec<RawArticle>) -> Result<Vec<Article>> {
  raws.into_iter().map(RawArticle::into_article).collect()
}

// ─── NewsStore impl ──────────────────────────────────────────────────────────

impl NewsStore for SqliteStore {
  type Error = Error;

  // ── Sources ───────────────────────────────────────────────────────────────

  async fn get_or_create_source(
    &self,
    name:     String,
    homepage: Option<String>,
  ) -> Result<(Source, bool)> {
    let slug       = slugify(&name);
    let created_at = encode_dt(Utc::now());

    let (raw, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing = tx
          .query_row(
            &format!("SELECT {SOURCE_COLUMNS} FROM sources WHERE name = ?1"),
            params![name],
            RawSource::from_row,
          )
          .optional()?;

        let out = match existing {
          Some(raw) => (raw, false),
          None => {
            tx.execute(
              "INSERT INTO sources (name, slug, homepage, created_at) VALUES (?1, ?2, ?3, ?4)",
              params![name, slug, homepage, created_at],
            )?;
            let source_id = tx.last_insert_rowid();
            (RawSource { source_id, name, slug, homepage, created_at }, true)
          }
        };
        tx.commit()?;
        Ok(out)
      })
      .await?;

    if created {
      tracing::debug!(name = %raw.name, id = raw.source_id, "created source");
    }
    Ok((raw.into_source()?, created))
  }

  async fn get_source(&self, id: i64) -> Result<Option<Source>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SOURCE_COLUMNS} FROM sources WHERE source_id = ?1"),
              params![id],
              RawSource::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSource::into_source).transpose()
  }

  async fn list_sources(&self) -> Result<Vec<Source>> {
    let raws: Vec<RawSource> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {SOURCE_COLUMNS} FROM sources ORDER BY name"))?;
        let rows = stmt
          .query_map([], RawSource::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSource::into_source).collect()
  }

  async fn delete_source(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM sources WHERE source_id = ?1", params![id])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Articles ──────────────────────────────────────────────────────────────

  async fn upsert_article(
    &self,
    source_id: i64,
    input:     ArticleInput,
  ) -> Result<(Article, bool)> {
    let now          = Utc::now().trunc_subsecs(6);
    let published_at = input.published_at.map(encode_published_at).transpose()?;
    let encoded_now  = encode_dt(now);
    let fields       = input.clone();

    let (article_id, stored_created_at) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing: Option<(i64, String)> = tx
          .query_row(
            "SELECT article_id, created_at FROM articles WHERE url = ?1",
            params![fields.url],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        let outcome = match existing {
          Some((article_id, created_at)) => {
            tx.execute(
              "UPDATE articles
               SET title = ?1, source_id = ?2, published_at = ?3, author = ?4, body = ?5
               WHERE article_id = ?6",
              params![
                fields.title,
                source_id,
                published_at,
                fields.author,
                fields.body,
                article_id,
              ],
            )?;
            (article_id, Some(created_at))
          }
          None => {
            tx.execute(
              "INSERT INTO articles (title, url, source_id, published_at, author, body, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
              params![
                fields.title,
                fields.url,
                source_id,
                published_at,
                fields.author,
                fields.body,
                encoded_now,
              ],
            )?;
            (tx.last_insert_rowid(), None)
          }
        };
        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    let created = stored_created_at.is_none();
    let created_at = match stored_created_at {
      Some(s) => decode_dt(&s)?,
      None => now,
    };
    let article = Article {
      id: article_id,
      title: input.title,
      url: input.url,
      source_id,
      published_at: input.published_at,
      author: input.author,
      body: input.body,
      created_at,
    };
    Ok((article, created))
  }

  async fn get_article(&self, id: i64) -> Result<Option<Article>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.article_id = ?1"),
              params![id],
              RawArticle::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawArticle::into_article).transpose()
  }

  async fn get_article_by_url(&self, url: String) -> Result<Option<Article>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.url = ?1"),
              params![url],
              RawArticle::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawArticle::into_article).transpose()
  }

  async fn count_articles(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?))
      .await?;
    Ok(count as u64)
  }

  async fn list_articles_for_tagging(&self, only_untagged: bool) -> Result<Vec<Article>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ARTICLE_COLUMNS}
           FROM articles a
           WHERE ?1 = 0
              OR NOT EXISTS (SELECT 1 FROM article_topics x WHERE x.article_id = a.article_id)
           ORDER BY a.article_id"
        ))?;
        let rows = stmt
          .query_map(params![only_untagged], RawArticle::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    decode_articles(raws)
  }

  async fn list_articles_without_summary(&self, limit: usize) -> Result<Vec<Article>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ARTICLE_COLUMNS}
           FROM articles a
           WHERE NOT EXISTS (SELECT 1 FROM summaries s WHERE s.article_id = a.article_id)
             AND trim(a.body, ' ' || char(9, 10, 11, 12, 13)) <> ''
           ORDER BY a.published_at IS NULL, a.published_at DESC, a.article_id DESC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(params![limit], RawArticle::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    decode_articles(raws)
  }

  async fn delete_article(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM articles WHERE article_id = ?1", params![id])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Topics ────────────────────────────────────────────────────────────────

  async fn get_or_create_topic(&self, name: String) -> Result<(Topic, bool)> {
    let slug       = slugify(&name);
    let created_at = encode_dt(Utc::now());

    let (raw, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing = tx
          .query_row(
            &format!("SELECT {TOPIC_COLUMNS} FROM topics t WHERE t.name = ?1"),
            params![name],
            RawTopic::from_row,
          )
          .optional()?;

        let out = match existing {
          Some(raw) => (raw, false),
          None => {
            tx.execute(
              "INSERT INTO topics (name, slug, created_at) VALUES (?1, ?2, ?3)",
              params![name, slug, created_at],
            )?;
            let topic_id = tx.last_insert_rowid();
            (RawTopic { topic_id, name, slug, created_at }, true)
          }
        };
        tx.commit()?;
        Ok(out)
      })
      .await?;

    if created {
      tracing::debug!(name = %raw.name, id = raw.topic_id, "created topic");
    }
    Ok((raw.into_topic()?, created))
  }

  async fn list_topics(&self) -> Result<Vec<Topic>> {
    let raws: Vec<RawTopic> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {TOPIC_COLUMNS} FROM topics t ORDER BY t.name"))?;
        let rows = stmt
          .query_map([], RawTopic::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTopic::into_topic).collect()
  }

  async fn attach_topics(&self, article_id: i64, topic_ids: Vec<i64>) -> Result<usize> {
    let linked: Option<usize> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !article_exists(&tx, article_id)? {
          return Ok(None);
        }
        let mut linked = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO article_topics (article_id, topic_id) VALUES (?1, ?2)",
          )?;
          for topic_id in topic_ids {
            linked += stmt.execute(params![article_id, topic_id])?;
          }
        }
        tx.commit()?;
        Ok(Some(linked))
      })
      .await?;

    linked.ok_or(Error::ArticleNotFound(article_id))
  }

  async fn topics_for_article(&self, article_id: i64) -> Result<Vec<Topic>> {
    let raws = self
      .conn
      .call(move |conn| Ok(select_topics(conn, article_id)?))
      .await?;

    raws.into_iter().map(RawTopic::into_topic).collect()
  }

  // ── Summaries ─────────────────────────────────────────────────────────────

  async fn get_or_create_summary(
    &self,
    article_id: i64,
    input:      NewSummary,
  ) -> Result<(Summary, bool)> {
    let created_at = encode_dt(Utc::now());

    let result: Option<(RawSummary, bool)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !article_exists(&tx, article_id)? {
          return Ok(None);
        }

        let out = match select_summary(&tx, article_id)? {
          Some(raw) => (raw, false),
          None => {
            tx.execute(
              "INSERT INTO summaries (article_id, text, model_name, created_at)
               VALUES (?1, ?2, ?3, ?4)",
              params![article_id, input.text, input.model_name, created_at],
            )?;
            let raw = RawSummary {
              article_id,
              text: input.text,
              model_name: input.model_name,
              created_at,
            };
            (raw, true)
          }
        };
        tx.commit()?;
        Ok(Some(out))
      })
      .await?;

    let (raw, created) = result.ok_or(Error::ArticleNotFound(article_id))?;
    Ok((raw.into_summary()?, created))
  }

  async fn get_summary(&self, article_id: i64) -> Result<Option<Summary>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_summary(conn, article_id)?))
      .await?;

    raw.map(RawSummary::into_summary).transpose()
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_articles<'a>(&'a self, query: &'a ArticleQuery) -> Result<ArticlePage> {
    let topic_ids = if query.topic_ids.is_empty() {
      None
    } else {
      Some(serde_json::to_string(&query.topic_ids)?)
    };
    let topic_slugs = if query.topic_slugs.is_empty() {
      None
    } else {
      Some(serde_json::to_string(&query.topic_slugs)?)
    };
    let direction = match query.order {
      ArticleOrder::NewestFirst => "DESC",
      ArticleOrder::OldestFirst => "ASC",
    };
    // SQLite treats a negative LIMIT as "no limit".
    let limit  = query.limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
    let offset = query.offset.map_or(0, |o| i64::try_from(o).unwrap_or(i64::MAX));

    let (count, raws): (i64, Vec<RawArticleView>) = self
      .conn
      .call(move |conn| {
        let conn: &Connection = conn;

        let count: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM articles a WHERE {ARTICLE_FILTER}"),
          params![topic_ids, topic_slugs],
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {ARTICLE_COLUMNS}
           FROM articles a
           WHERE {ARTICLE_FILTER}
           ORDER BY a.published_at IS NULL, a.published_at {direction}, a.article_id {direction}
           LIMIT ?3 OFFSET ?4"
        ))?;
        let articles = stmt
          .query_map(params![topic_ids, topic_slugs, limit, offset], RawArticle::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let views = articles
          .into_iter()
          .map(|article| load_view(conn, article))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((count, views))
      })
      .await?;

    let results = raws
      .into_iter()
      .map(RawArticleView::into_view)
      .collect::<Result<Vec<_>>>()?;

    Ok(ArticlePage { count: count as u64, results })
  }

  async fn get_article_view(&self, id: i64) -> Result<Option<ArticleView>> {
    let raw = self
      .conn
      .call(move |conn| {
        let conn: &Connection = conn;
        let article = conn
          .query_row(
            &format!("SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.article_id = ?1"),
            params![id],
            RawArticle::from_row,
          )
          .optional()?;
        Ok(article.map(|a| load_view(conn, a)).transpose()?)
      })
      .await?;

    raw.map(RawArticleView::into_view).transpose()
  }
}
