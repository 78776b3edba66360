//! Handlers for the `/topics` and `/sources` listings.

use std::sync::Arc;

use axum::{Json, extract::State};
use newsdesk_core::{source::Source, store::NewsStore, topic::Topic};

use crate::error::ApiError;

/// `GET /topics`, ordered by name.
pub async fn topics<S: NewsStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Topic>>, ApiError> {
  let topics = store.list_topics().await.map_err(ApiError::store)?;
  Ok(Json(topics))
}

/// `GET /sources`, ordered by name.
pub async fn sources<S: NewsStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Source>>, ApiError> {
  let sources = store.list_sources().await.map_err(ApiError::store)?;
  Ok(Json(sources))
}
