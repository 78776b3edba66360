//! The `NewsStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `newsdesk-store-sqlite`). The pipeline and the read API depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  StoreError,
  article::{Article, ArticleInput, ArticlePage, ArticleQuery, ArticleView},
  source::Source,
  summary::{NewSummary, Summary},
  topic::Topic,
};

/// Abstraction over a newsdesk store backend.
///
/// Every create path is guarded by the backend's uniqueness constraints. A
/// get-or-create that loses a race with a concurrent writer fails with an
/// error for which [`StoreError::is_constraint_violation`] is `true`; it never
/// produces a duplicate.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait NewsStore: Send + Sync {
  type Error: StoreError;

  // ── Sources ───────────────────────────────────────────────────────────

  /// Return the source called `name`, creating it with `homepage` if it does
  /// not exist. An existing source's homepage is never changed. The boolean
  /// is `true` when the source was created by this call.
  fn get_or_create_source(
    &self,
    name: String,
    homepage: Option<String>,
  ) -> impl Future<Output = Result<(Source, bool), Self::Error>> + Send + '_;

  fn get_source(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Source>, Self::Error>> + Send + '_;

  /// All sources, ordered by name.
  fn list_sources(
    &self,
  ) -> impl Future<Output = Result<Vec<Source>, Self::Error>> + Send + '_;

  /// Delete a source. Fails with a constraint violation while any article
  /// still references it. Returns `false` if no such source existed.
  fn delete_source(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Articles ──────────────────────────────────────────────────────────

  /// Insert an article, or replace the mutable fields of the article that
  /// already has `input.url`. Topics and summary are left alone. The boolean
  /// is `true` when a new row was created.
  fn upsert_article(
    &self,
    source_id: i64,
    input: ArticleInput,
  ) -> impl Future<Output = Result<(Article, bool), Self::Error>> + Send + '_;

  fn get_article(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  fn get_article_by_url(
    &self,
    url: String,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  fn count_articles(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Articles to feed the tagger: all of them, or only those with no topic
  /// attached. Ordered by id.
  fn list_articles_for_tagging(
    &self,
    only_untagged: bool,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + '_;

  /// Up to `limit` articles without a summary and with a non-blank body,
  /// newest first.
  fn list_articles_without_summary(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + '_;

  /// Delete an article together with its topic links and summary. Returns
  /// `false` if no such article existed.
  fn delete_article(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Topics ────────────────────────────────────────────────────────────

  /// Return the topic called `name`, creating it if needed. The boolean is
  /// `true` when the topic was created by this call.
  fn get_or_create_topic(
    &self,
    name: String,
  ) -> impl Future<Output = Result<(Topic, bool), Self::Error>> + Send + '_;

  /// All topics, ordered by name.
  fn list_topics(
    &self,
  ) -> impl Future<Output = Result<Vec<Topic>, Self::Error>> + Send + '_;

  /// Link `topic_ids` to an article. Existing links are kept and re-linking
  /// is a no-op. Returns the number of links that did not exist before.
  ///
  /// Fails with a not-found error if the article does not exist.
  fn attach_topics(
    &self,
    article_id: i64,
    topic_ids: Vec<i64>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Topics attached to an article, ordered by name.
  fn topics_for_article(
    &self,
    article_id: i64,
  ) -> impl Future<Output = Result<Vec<Topic>, Self::Error>> + Send + '_;

  // ── Summaries ─────────────────────────────────────────────────────────

  /// Return the article's summary, creating it from `input` only if none
  /// exists. An existing summary is never overwritten. The boolean is `true`
  /// when the summary was created by this call.
  ///
  /// Fails with a not-found error if the article does not exist.
  fn get_or_create_summary(
    &self,
    article_id: i64,
    input: NewSummary,
  ) -> impl Future<Output = Result<(Summary, bool), Self::Error>> + Send + '_;

  fn get_summary(
    &self,
    article_id: i64,
  ) -> impl Future<Output = Result<Option<Summary>, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// One page of articles matching `query`, with source, topics and summary
  /// resolved.
  fn list_articles<'a>(
    &'a self,
    query: &'a ArticleQuery,
  ) -> impl Future<Output = Result<ArticlePage, Self::Error>> + Send + 'a;

  /// A single article with source, topics and summary resolved.
  fn get_article_view(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ArticleView>, Self::Error>> + Send + '_;
}
