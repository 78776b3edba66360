//! Ingestion: feed page → normalized records → sources and articles.

use newsdesk_core::{
  article::{Article, ArticleInput},
  normalize::{Normalized, NormalizedArticle, normalize},
  source::Source,
  store::NewsStore,
};

use crate::{Error, Result, feed::FeedClient};

/// Resolves source names to stored sources, creating them on first sight.
pub struct SourceRegistry<'a, S> {
  store: &'a S,
}

impl<'a, S: NewsStore> SourceRegistry<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Get or create the source called `name`. `homepage` is only recorded
  /// when the source is created; an empty homepage is stored as absent.
  pub async fn resolve(&self, name: &str, homepage: &str) -> Result<Source> {
    let homepage = (!homepage.is_empty()).then(|| homepage.to_owned());
    let (source, _) = self
      .store
      .get_or_create_source(name.to_owned(), homepage)
      .await
      .map_err(Error::from_store)?;
    Ok(source)
  }
}

/// Writes normalized articles, keyed on their url.
pub struct ArticleUpserter<'a, S> {
  store: &'a S,
}

impl<'a, S: NewsStore> ArticleUpserter<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Insert the article or replace the stored one with the same url. The
  /// boolean is `true` when a new article was created.
  pub async fn upsert(
    &self,
    article: ArticleInput,
    source: &Source,
  ) -> Result<(Article, bool)> {
    self
      .store
      .upsert_article(source.id, article)
      .await
      .map_err(Error::from_store)
  }
}

/// Outcome counts of one ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
  pub created: usize,
  pub updated: usize,
  /// Records without a url, or not objects at all.
  pub skipped: usize,
  /// Records whose store write failed.
  pub failed:  usize,
}

/// Runs one fetch-and-store batch.
pub struct IngestCoordinator<'a, S, F> {
  store: &'a S,
  feed:  &'a F,
}

impl<'a, S: NewsStore, F: FeedClient> IngestCoordinator<'a, S, F> {
  pub fn new(store: &'a S, feed: &'a F) -> Self { Self { store, feed } }

  /// Fetch one page for `keyword` and store every usable record in feed
  /// order.
  ///
  /// A fetch failure aborts the run before anything is written. Failures of
  /// individual records are logged and counted, and do not stop the batch.
  pub async fn run(&self, keyword: &str, page_size: u32) -> Result<IngestReport> {
    let items = self.feed.fetch(keyword.to_owned(), page_size).await?;

    let registry = SourceRegistry::new(self.store);
    let upserter = ArticleUpserter::new(self.store);
    let mut report = IngestReport::default();

    for (index, raw) in items.iter().enumerate() {
      let normalized = match normalize(raw) {
        Normalized::Article(a) => a,
        Normalized::Skipped(reason) => {
          tracing::debug!(index, ?reason, "skipping feed item");
          report.skipped += 1;
          continue;
        }
      };

      let url = normalized.article.url.clone();
      match store_one(&registry, &upserter, normalized).await {
        Ok(true) => report.created += 1,
        Ok(false) => report.updated += 1,
        Err(e) => {
          tracing::warn!(%url, error = %e, "failed to store feed item");
          report.failed += 1;
        }
      }
    }

    tracing::info!(
      keyword,
      created = report.created,
      updated = report.updated,
      skipped = report.skipped,
      failed = report.failed,
      "ingest finished"
    );
    Ok(report)
  }
}

async fn store_one<S: NewsStore>(
  registry: &SourceRegistry<'_, S>,
  upserter: &ArticleUpserter<'_, S>,
  normalized: NormalizedArticle,
) -> Result<bool> {
  let source = registry
    .resolve(&normalized.source_name, &normalized.source_homepage)
    .await?;
  let (article, created) = upserter.upsert(normalized.article, &source).await?;
  tracing::debug!(article_id = article.id, created, "stored article");
  Ok(created)
}
