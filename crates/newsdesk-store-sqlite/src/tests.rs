//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use newsdesk_core::{
  StoreError as _,
  article::{ArticleInput, ArticleOrder, ArticleQuery},
  store::NewsStore,
  summary::NewSummary,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn input(url: &str, title: &str) -> ArticleInput {
  ArticleInput {
    title:        title.into(),
    url:          url.into(),
    published_at: None,
    author:       "Staff".into(),
    body:         "Body text.".into(),
  }
}

fn dated(url: &str, title: &str, day: u32) -> ArticleInput {
  ArticleInput {
    published_at: Some(Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()),
    ..input(url, title)
  }
}

// ─── Sources ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_or_create_source_creates_once() {
  let s = store().await;

  let (first, created) = s
    .get_or_create_source("Hacker News".into(), Some("https://news.ycombinator.com".into()))
    .await
    .unwrap();
  assert!(created);
  assert_eq!(first.slug, "hacker-news");
  assert_eq!(first.homepage.as_deref(), Some("https://news.ycombinator.com"));

  let (second, created) = s
    .get_or_create_source("Hacker News".into(), Some("https://other.example".into()))
    .await
    .unwrap();
  assert!(!created);
  assert_eq!(second.id, first.id);
  // First-seen homepage wins.
  assert_eq!(second.homepage.as_deref(), Some("https://news.ycombinator.com"));

  assert_eq!(s.list_sources().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sources_without_homepage_coexist() {
  let s = store().await;
  s.get_or_create_source("A".into(), None).await.unwrap();
  s.get_or_create_source("B".into(), None).await.unwrap();

  let names: Vec<_> = s
    .list_sources()
    .await
    .unwrap()
    .into_iter()
    .map(|src| src.name)
    .collect();
  assert_eq!(names, ["A", "B"]);
}

#[tokio::test]
async fn duplicate_homepage_is_a_constraint_violation() {
  let s = store().await;
  s.get_or_create_source("Wire".into(), Some("https://wire.example".into()))
    .await
    .unwrap();

  let err = s
    .get_or_create_source("Wire Mirror".into(), Some("https://wire.example".into()))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ConstraintViolation(_)));
  assert!(err.is_constraint_violation());
}

#[tokio::test]
async fn duplicate_slug_is_a_constraint_violation() {
  let s = store().await;
  s.get_or_create_source("The Verge".into(), None).await.unwrap();

  let err = s
    .get_or_create_source("the  verge!".into(), None)
    .await
    .unwrap_err();
  assert!(err.is_constraint_violation());
}

#[tokio::test]
async fn source_with_articles_cannot_be_deleted() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("Wire".into(), None).await.unwrap();
  let (article, _) = s
    .upsert_article(src.id, input("https://wire.example/1", "One"))
    .await
    .unwrap();

  let err = s.delete_source(src.id).await.unwrap_err();
  assert!(err.is_constraint_violation());
  assert!(s.get_source(src.id).await.unwrap().is_some());

  assert!(s.delete_article(article.id).await.unwrap());
  assert!(s.delete_source(src.id).await.unwrap());
  assert!(s.get_source(src.id).await.unwrap().is_none());
}

// ─── Articles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_inserts_then_updates_by_url() {
  let s = store().await;
  let (a, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (b, _) = s.get_or_create_source("B".into(), None).await.unwrap();

  let (first, created) = s
    .upsert_article(a.id, input("https://a.example/x", "Draft"))
    .await
    .unwrap();
  assert!(created);

  let mut replacement = dated("https://a.example/x", "Final", 3);
  replacement.author = String::new();
  replacement.body = "Rewritten.".into();
  let (second, created) = s.upsert_article(b.id, replacement).await.unwrap();
  assert!(!created);
  assert_eq!(second.id, first.id);
  assert_eq!(second.created_at, first.created_at);

  let stored = s.get_article(first.id).await.unwrap().unwrap();
  assert_eq!(stored.title, "Final");
  assert_eq!(stored.source_id, b.id);
  assert_eq!(stored.author, "");
  assert_eq!(stored.body, "Rewritten.");
  assert_eq!(stored.published_at, Some(Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap()));
  assert_eq!(s.count_articles().await.unwrap(), 1);
}

#[tokio::test]
async fn upsert_leaves_topics_and_summary_alone() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (article, _) = s
    .upsert_article(src.id, input("https://a.example/y", "Old"))
    .await
    .unwrap();
  let (topic, _) = s.get_or_create_topic("AI".into()).await.unwrap();
  s.attach_topics(article.id, vec![topic.id]).await.unwrap();
  s.get_or_create_summary(
    article.id,
    NewSummary { text: "Old summary.".into(), model_name: "baseline".into() },
  )
  .await
  .unwrap();

  s.upsert_article(src.id, input("https://a.example/y", "New"))
    .await
    .unwrap();

  assert_eq!(s.topics_for_article(article.id).await.unwrap().len(), 1);
  let summary = s.get_summary(article.id).await.unwrap().unwrap();
  assert_eq!(summary.text, "Old summary.");
}

#[tokio::test]
async fn upsert_with_unknown_source_is_a_constraint_violation() {
  let s = store().await;
  let err = s
    .upsert_article(999, input("https://a.example/z", "Orphan"))
    .await
    .unwrap_err();
  assert!(err.is_constraint_violation());
}

#[tokio::test]
async fn returned_article_matches_stored_row() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (article, _) = s
    .upsert_article(src.id, dated("https://a.example/same", "Same", 4))
    .await
    .unwrap();
  assert_eq!(s.get_article(article.id).await.unwrap(), Some(article));
}

#[tokio::test]
async fn five_digit_year_is_rejected_before_writing() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let far = ArticleInput {
    published_at: Some(Utc.with_ymd_and_hms(10000, 1, 1, 1, 0, 0).unwrap()),
    ..input("https://a.example/far", "Far")
  };

  let err = s.upsert_article(src.id, far).await.unwrap_err();
  assert!(matches!(err, Error::TimestampOutOfRange(_)));
  assert_eq!(s.count_articles().await.unwrap(), 0);
  assert!(s.list_articles_for_tagging(false).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_article_by_url_roundtrip() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (article, _) = s
    .upsert_article(src.id, input("https://a.example/find-me", "Found"))
    .await
    .unwrap();

  let found = s
    .get_article_by_url("https://a.example/find-me".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found, article);
  assert!(s.get_article_by_url("https://nope".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_article_cascades_to_summary_and_links() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (article, _) = s
    .upsert_article(src.id, input("https://a.example/gone", "Gone"))
    .await
    .unwrap();
  let (topic, _) = s.get_or_create_topic("Web".into()).await.unwrap();
  s.attach_topics(article.id, vec![topic.id]).await.unwrap();
  s.get_or_create_summary(
    article.id,
    NewSummary { text: "x".into(), model_name: "baseline".into() },
  )
  .await
  .unwrap();

  assert!(s.delete_article(article.id).await.unwrap());
  assert!(!s.delete_article(article.id).await.unwrap());
  assert!(s.get_summary(article.id).await.unwrap().is_none());
  assert!(s.topics_for_article(article.id).await.unwrap().is_empty());
  // The topic itself survives.
  assert_eq!(s.list_topics().await.unwrap().len(), 1);
}

// ─── Topics ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn attach_topics_is_additive_and_idempotent() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (article, _) = s
    .upsert_article(src.id, input("https://a.example/t", "T"))
    .await
    .unwrap();
  let (ai, created) = s.get_or_create_topic("AI".into()).await.unwrap();
  assert!(created);
  assert_eq!(ai.slug, "ai");
  let (web, _) = s.get_or_create_topic("Web".into()).await.unwrap();

  assert_eq!(s.attach_topics(article.id, vec![ai.id]).await.unwrap(), 1);
  assert_eq!(s.attach_topics(article.id, vec![ai.id, web.id]).await.unwrap(), 1);
  assert_eq!(s.attach_topics(article.id, vec![ai.id, web.id]).await.unwrap(), 0);

  let names: Vec<_> = s
    .topics_for_article(article.id)
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.name)
    .collect();
  assert_eq!(names, ["AI", "Web"]);
}

#[tokio::test]
async fn attach_topics_to_missing_article_is_not_found() {
  let s = store().await;
  let (topic, _) = s.get_or_create_topic("AI".into()).await.unwrap();
  let err = s.attach_topics(42, vec![topic.id]).await.unwrap_err();
  assert!(matches!(err, Error::ArticleNotFound(42)));
  assert!(err.is_not_found());
}

#[tokio::test]
async fn get_or_create_topic_returns_existing() {
  let s = store().await;
  let (a, _) = s.get_or_create_topic("Cloud".into()).await.unwrap();
  let (b, created) = s.get_or_create_topic("Cloud".into()).await.unwrap();
  assert!(!created);
  assert_eq!(a.id, b.id);
}

#[tokio::test]
async fn list_articles_for_tagging_filters_untagged() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (tagged, _) = s
    .upsert_article(src.id, input("https://a.example/1", "Tagged"))
    .await
    .unwrap();
  let (untagged, _) = s
    .upsert_article(src.id, input("https://a.example/2", "Untagged"))
    .await
    .unwrap();
  let (topic, _) = s.get_or_create_topic("AI".into()).await.unwrap();
  s.attach_topics(tagged.id, vec![topic.id]).await.unwrap();

  let only_untagged = s.list_articles_for_tagging(true).await.unwrap();
  assert_eq!(only_untagged.len(), 1);
  assert_eq!(only_untagged[0].id, untagged.id);

  assert_eq!(s.list_articles_for_tagging(false).await.unwrap().len(), 2);
}

// ─── Summaries ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn summary_is_created_once_and_never_overwritten() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (article, _) = s
    .upsert_article(src.id, input("https://a.example/s", "S"))
    .await
    .unwrap();

  let (first, created) = s
    .get_or_create_summary(
      article.id,
      NewSummary { text: "First.".into(), model_name: "gpt-4o-mini".into() },
    )
    .await
    .unwrap();
  assert!(created);

  let (second, created) = s
    .get_or_create_summary(
      article.id,
      NewSummary { text: "Second.".into(), model_name: "baseline".into() },
    )
    .await
    .unwrap();
  assert!(!created);
  assert_eq!(second, first);
  assert_eq!(s.get_summary(article.id).await.unwrap().unwrap().text, "First.");
}

#[tokio::test]
async fn summary_for_missing_article_is_not_found() {
  let s = store().await;
  let err = s
    .get_or_create_summary(7, NewSummary { text: "x".into(), model_name: "baseline".into() })
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn articles_without_summary_newest_first_and_limited() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (old, _) = s.upsert_article(src.id, dated("https://a.example/old", "Old", 1)).await.unwrap();
  let (mid, _) = s.upsert_article(src.id, dated("https://a.example/mid", "Mid", 2)).await.unwrap();
  let (new, _) = s.upsert_article(src.id, dated("https://a.example/new", "New", 3)).await.unwrap();
  let (undated, _) = s.upsert_article(src.id, input("https://a.example/undated", "Undated")).await.unwrap();

  s.get_or_create_summary(mid.id, NewSummary { text: "m".into(), model_name: "baseline".into() })
    .await
    .unwrap();

  let ids: Vec<_> = s
    .list_articles_without_summary(10)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.id)
    .collect();
  assert_eq!(ids, [new.id, old.id, undated.id]);

  assert_eq!(s.list_articles_without_summary(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn articles_without_summary_exclude_blank_bodies() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (dated_old, _) = s.upsert_article(src.id, dated("https://a.example/old", "Old", 1)).await.unwrap();
  for (i, body) in ["", "  \t\n ", "\r\n"].into_iter().enumerate() {
    let blank = ArticleInput {
      body: body.into(),
      ..dated(&format!("https://a.example/blank-{i}"), "Blank", 5)
    };
    s.upsert_article(src.id, blank).await.unwrap();
  }

  let listed = s.list_articles_without_summary(1).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, dated_old.id);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_articles_orders_and_paginates() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  s.upsert_article(src.id, dated("https://a.example/1", "One", 1)).await.unwrap();
  s.upsert_article(src.id, dated("https://a.example/2", "Two", 2)).await.unwrap();
  s.upsert_article(src.id, input("https://a.example/3", "Undated")).await.unwrap();

  let page = s.list_articles(&ArticleQuery::default()).await.unwrap();
  assert_eq!(page.count, 3);
  let titles: Vec<_> = page.results.iter().map(|a| a.title.as_str()).collect();
  assert_eq!(titles, ["Two", "One", "Undated"]);

  let oldest = ArticleQuery { order: ArticleOrder::OldestFirst, ..Default::default() };
  let page = s.list_articles(&oldest).await.unwrap();
  let titles: Vec<_> = page.results.iter().map(|a| a.title.as_str()).collect();
  assert_eq!(titles, ["One", "Two", "Undated"]);

  let paged = ArticleQuery { limit: Some(1), offset: Some(1), ..Default::default() };
  let page = s.list_articles(&paged).await.unwrap();
  assert_eq!(page.count, 3);
  assert_eq!(page.results.len(), 1);
  assert_eq!(page.results[0].title, "One");
}

#[tokio::test]
async fn list_articles_filters_by_topic_id_and_slug() {
  let s = store().await;
  let (src, _) = s.get_or_create_source("A".into(), None).await.unwrap();
  let (one, _) = s.upsert_article(src.id, dated("https://a.example/1", "One", 1)).await.unwrap();
  let (two, _) = s.upsert_article(src.id, dated("https://a.example/2", "Two", 2)).await.unwrap();
  s.upsert_article(src.id, dated("https://a.example/3", "Three", 3)).await.unwrap();

  let (ai, _) = s.get_or_create_topic("AI".into()).await.unwrap();
  let (web, _) = s.get_or_create_topic("Web".into()).await.unwrap();
  s.attach_topics(one.id, vec![ai.id, web.id]).await.unwrap();
  s.attach_topics(two.id, vec![web.id]).await.unwrap();

  let by_id = ArticleQuery { topic_ids: vec![ai.id], ..Default::default() };
  let page = s.list_articles(&by_id).await.unwrap();
  assert_eq!(page.count, 1);
  assert_eq!(page.results[0].id, one.id);

  // An article matching several requested topics is listed once.
  let by_slug = ArticleQuery { topic_slugs: vec!["ai".into(), "web".into()], ..Default::default() };
  let page = s.list_articles(&by_slug).await.unwrap();
  let ids: Vec<_> = page.results.iter().map(|a| a.id).collect();
  assert_eq!(ids, [two.id, one.id]);

  let none = ArticleQuery { topic_slugs: vec!["cloud".into()], ..Default::default() };
  assert_eq!(s.list_articles(&none).await.unwrap().count, 0);
}

#[tokio::test]
async fn article_view_resolves_relations() {
  let s = store().await;
  let (src, _) = s
    .get_or_create_source("Wire".into(), Some("https://wire.example".into()))
    .await
    .unwrap();
  let (article, _) = s
    .upsert_article(src.id, input("https://wire.example/v", "View"))
    .await
    .unwrap();

  let view = s.get_article_view(article.id).await.unwrap().unwrap();
  assert_eq!(view.source.name, "Wire");
  assert!(view.topics.is_empty());
  assert!(view.summary.is_none());

  let (topic, _) = s.get_or_create_topic("Security".into()).await.unwrap();
  s.attach_topics(article.id, vec![topic.id]).await.unwrap();
  s.get_or_create_summary(
    article.id,
    NewSummary { text: "Sum.".into(), model_name: "baseline".into() },
  )
  .await
  .unwrap();

  let view = s.get_article_view(article.id).await.unwrap().unwrap();
  assert_eq!(view.topics[0].slug, "security");
  assert_eq!(view.summary.unwrap().text, "Sum.");

  assert!(s.get_article_view(article.id + 100).await.unwrap().is_none());
}
