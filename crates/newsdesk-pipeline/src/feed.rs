//! The article feed: a trait for the ingest job plus a NewsAPI client.

use std::{future::Future, time::Duration};

use newsdesk_core::normalize::RawArticle;
use reqwest::Client;
use serde::Deserialize;

use crate::error::FeedFetchError;

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/everything";

const FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// NewsAPI rejects page sizes outside this range.
const MAX_PAGE_SIZE: u32 = 100;

/// A source of raw article records.
pub trait FeedClient: Send + Sync {
  /// Fetch one page of articles matching `keyword`, in feed order.
  fn fetch(
    &self,
    keyword: String,
    page_size: u32,
  ) -> impl Future<Output = Result<Vec<RawArticle>, FeedFetchError>> + Send + '_;
}

/// Client for the NewsAPI `everything` endpoint.
#[derive(Clone)]
pub struct NewsApiClient {
  client:   Client,
  api_key:  String,
  endpoint: String,
}

impl NewsApiClient {
  pub fn new(api_key: impl Into<String>) -> Result<Self, FeedFetchError> {
    Self::with_endpoint(api_key, DEFAULT_NEWS_API_URL)
  }

  /// Build a client against a custom endpoint, e.g. a mirror or a test
  /// server.
  pub fn with_endpoint(
    api_key: impl Into<String>,
    endpoint: impl Into<String>,
  ) -> Result<Self, FeedFetchError> {
    let client = Client::builder().timeout(FEED_TIMEOUT).build()?;
    Ok(Self {
      client,
      api_key: api_key.into(),
      endpoint: endpoint.into(),
    })
  }
}

/// The NewsAPI response envelope. Items stay untyped.
#[derive(Debug, Deserialize)]
struct Envelope {
  #[serde(default)]
  status:   Option<String>,
  #[serde(default)]
  code:     Option<String>,
  #[serde(default)]
  message:  Option<String>,
  #[serde(default)]
  articles: Vec<RawArticle>,
}

impl FeedClient for NewsApiClient {
  async fn fetch(
    &self,
    keyword: String,
    page_size: u32,
  ) -> Result<Vec<RawArticle>, FeedFetchError> {
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE).to_string();

    let response = self
      .client
      .get(&self.endpoint)
      .header("X-Api-Key", &self.api_key)
      .query(&[
        ("q", keyword.as_str()),
        ("pageSize", page_size.as_str()),
        ("language", "en"),
        ("sortBy", "publishedAt"),
      ])
      .send()
      .await?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
      return Err(FeedFetchError::Status { status: status.as_u16(), body: text });
    }

    let envelope: Envelope =
      serde_json::from_str(&text).map_err(FeedFetchError::Malformed)?;
    if envelope.status.as_deref() == Some("error") {
      return Err(FeedFetchError::Api {
        code:    envelope.code.unwrap_or_default(),
        message: envelope.message.unwrap_or_default(),
      });
    }

    tracing::debug!(count = envelope.articles.len(), "fetched feed page");
    Ok(envelope.articles)
  }
}
