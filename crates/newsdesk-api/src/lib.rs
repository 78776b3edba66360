//! Read-only JSON API over a newsdesk store.
//!
//! Exposes an axum [`Router`] backed by any [`newsdesk_core::store::NewsStore`].
//! Transport, tracing and auth layers are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", newsdesk_api::api_router(store.clone()))
//! ```

pub mod articles;
pub mod catalog;
pub mod error;

use std::sync::Arc;

use axum::{Router, routing::get};
use newsdesk_core::store::NewsStore;

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: NewsStore + 'static,
{
  Router::new()
    .route("/articles", get(articles::list::<S>))
    .route("/articles/{id}", get(articles::get_one::<S>))
    .route("/articles/{id}/summary", get(articles::summary::<S>))
    .route("/topics", get(catalog::topics::<S>))
    .route("/sources", get(catalog::sources::<S>))
    .with_state(store)
}
