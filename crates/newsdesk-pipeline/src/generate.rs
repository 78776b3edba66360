//! Text generation: a trait for the summarizer plus an OpenAI Responses API
//! client.

use std::{future::Future, time::Duration};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::GenerationServiceError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// A service that turns a prompt into text.
pub trait GenerationClient: Send + Sync {
  fn generate(
    &self,
    prompt: String,
    model: String,
  ) -> impl Future<Output = Result<String, GenerationServiceError>> + Send + '_;
}

/// Client for `POST {base_url}/responses`.
#[derive(Clone)]
pub struct OpenAiClient {
  client:   Client,
  api_key:  String,
  base_url: String,
}

impl OpenAiClient {
  pub fn new(api_key: impl Into<String>) -> Result<Self, GenerationServiceError> {
    Self::with_base_url(api_key, DEFAULT_OPENAI_BASE_URL)
  }

  pub fn with_base_url(
    api_key: impl Into<String>,
    base_url: impl Into<String>,
  ) -> Result<Self, GenerationServiceError> {
    let client = Client::builder().timeout(GENERATION_TIMEOUT).build()?;
    Ok(Self {
      client,
      api_key: api_key.into(),
      base_url: base_url.into().trim_end_matches('/').to_owned(),
    })
  }
}

#[derive(Debug, Serialize)]
struct ResponseRequest<'a> {
  model: &'a str,
  input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
  #[serde(default)]
  output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
  #[serde(default)]
  content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
  #[serde(rename = "type")]
  kind: String,
  #[serde(default)]
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
  message: String,
}

impl ResponseBody {
  /// Concatenation of every `output_text` part, like the SDKs'
  /// `output_text` convenience property.
  fn output_text(self) -> String {
    self
      .output
      .into_iter()
      .flat_map(|item| item.content)
      .filter(|part| part.kind == "output_text")
      .filter_map(|part| part.text)
      .collect()
  }
}

impl GenerationClient for OpenAiClient {
  async fn generate(
    &self,
    prompt: String,
    model: String,
  ) -> Result<String, GenerationServiceError> {
    let response = self
      .client
      .post(format!("{}/responses", self.base_url))
      .bearer_auth(&self.api_key)
      .json(&ResponseRequest { model: &model, input: &prompt })
      .send()
      .await?;

    let status = response.status();
    let text = response.text().await?;

    if status == StatusCode::TOO_MANY_REQUESTS {
      return Err(GenerationServiceError::RateLimited);
    }
    if !status.is_success() {
      let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error.message)
        .unwrap_or(text);
      return Err(GenerationServiceError::Api { status: status.as_u16(), message });
    }

    let body: ResponseBody = serde_json::from_str(&text)
      .map_err(|e| GenerationServiceError::Parse(e.to_string()))?;
    Ok(body.output_text())
  }
}
