//! Handlers for `/articles` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/articles` | `?topic_ids=1,2&topic_slugs=ai,web&ordering=-published_at&limit=&offset=&page=` |
//! | `GET`  | `/articles/{id}` | 404 if not found |
//! | `GET`  | `/articles/{id}/summary` | 404 if the article has no summary |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use newsdesk_core::{
  article::{ArticleOrder, ArticlePage, ArticleQuery, ArticleView},
  store::NewsStore,
  summary::SummaryView,
};
use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Comma-separated topic ids.
  pub topic_ids:   Option<String>,
  /// Comma-separated topic slugs, matched case-insensitively.
  pub topic_slugs: Option<String>,
  pub ordering:    Option<String>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
  /// 1-based page number, used when `offset` is absent.
  pub page:        Option<usize>,
}

fn split_csv(value: Option<&str>) -> impl Iterator<Item = &str> {
  value
    .unwrap_or("")
    .split(',')
    .map(str::trim)
    .filter(|v| !v.is_empty())
}

impl ListParams {
  /// Build the store query. `Ok(None)` means the filter can match nothing,
  /// which is the case for a non-integer topic id.
  pub fn into_query(self) -> Result<Option<ArticleQuery>, ApiError> {
    let Ok(topic_ids) = split_csv(self.topic_ids.as_deref())
      .map(str::parse::<i64>)
      .collect::<Result<Vec<_>, _>>()
    else {
      return Ok(None);
    };
    let topic_slugs = split_csv(self.topic_slugs.as_deref())
      .map(str::to_lowercase)
      .collect();

    let order = match self.ordering.as_deref().map(str::trim) {
      None | Some("") => ArticleOrder::default(),
      Some(o) => o
        .parse::<ArticleOrder>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };

    let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = match (self.offset, self.page) {
      (Some(offset), _) => offset,
      (None, Some(page)) => page.saturating_sub(1).saturating_mul(limit),
      (None, None) => 0,
    };

    Ok(Some(ArticleQuery {
      topic_ids,
      topic_slugs,
      order,
      limit: Some(limit),
      offset: Some(offset),
    }))
  }
}

/// `GET /articles`
pub async fn list<S: NewsStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<ArticlePage>, ApiError> {
  let Some(query) = params.into_query()? else {
    return Ok(Json(ArticlePage { count: 0, results: Vec::new() }));
  };
  let page = store.list_articles(&query).await.map_err(ApiError::store)?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /articles/{id}`
pub async fn get_one<S: NewsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ArticleView>, ApiError> {
  let view = store
    .get_article_view(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(view))
}

// ─── Summary ──────────────────────────────────────────────────────────────────

/// `GET /articles/{id}/summary`
pub async fn summary<S: NewsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<SummaryView>, ApiError> {
  let summary = store
    .get_summary(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(summary.into()))
}
