//! Keyword topic tagging.

use newsdesk_core::{
  article::Article,
  store::NewsStore,
  taxonomy::{guess_topics, topic_blob},
};

use crate::{Error, Result};

/// Attach up to `max_topics` canonical topics matched in the article's title
/// and body. Existing topics are kept. Returns the number of topics matched
/// and attached in this call.
pub async fn tag<S: NewsStore>(store: &S, article: &Article, max_topics: usize) -> Result<usize> {
  let blob = topic_blob(&article.title, &article.body);
  let mut names = guess_topics(&blob);
  names.truncate(max_topics);
  if names.is_empty() {
    return Ok(0);
  }

  let mut topic_ids = Vec::with_capacity(names.len());
  for name in &names {
    let (topic, _) = store
      .get_or_create_topic((*name).to_owned())
      .await
      .map_err(Error::from_store)?;
    topic_ids.push(topic.id);
  }
  store
    .attach_topics(article.id, topic_ids)
    .await
    .map_err(Error::from_store)?;

  tracing::debug!(article_id = article.id, topics = ?names, "tagged article");
  Ok(names.len())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagReport {
  pub processed: usize,
  pub attached:  usize,
}

/// Tag every article, or only those without any topic.
pub async fn tag_articles<S: NewsStore>(
  store: &S,
  only_untagged: bool,
  max_topics: usize,
) -> Result<TagReport> {
  let articles = store
    .list_articles_for_tagging(only_untagged)
    .await
    .map_err(Error::from_store)?;

  let mut report = TagReport::default();
  for article in &articles {
    report.processed += 1;
    report.attached += tag(store, article, max_topics).await?;
  }

  tracing::info!(
    processed = report.processed,
    attached = report.attached,
    "tagging finished"
  );
  Ok(report)
}
