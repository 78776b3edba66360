//! Article summarization with an offline fallback.

use std::collections::BTreeMap;

use newsdesk_core::{
  store::NewsStore,
  summary::{FALLBACK_MODEL_NAME, NewSummary, extractive_summary},
};

use crate::{Error, GenerationServiceError, Result, generate::GenerationClient};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SUMMARY_INSTRUCTION: &str = "Summarize the following news article in 4-6 sentences. \
                                   Keep it factual and neutral, no bullet points:\n\n";

/// Summary text and the generation path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSummary {
  pub text:       String,
  pub model_name: String,
}

/// Produces summaries with a generation service when one is configured and
/// falls back to [`extractive_summary`] otherwise.
pub struct Summarizer<G> {
  client: Option<G>,
  model:  String,
}

impl<G: GenerationClient> Summarizer<G> {
  /// `client` is `None` when no API key is configured.
  pub fn new(client: Option<G>, model: impl Into<String>) -> Self {
    Self { client, model: model.into() }
  }

  /// The model name recorded for summaries from the generation service.
  pub fn model(&self) -> &str { &self.model }

  /// Summarize `body`. Never fails: any generation problem yields the
  /// extractive summary, recorded under [`FALLBACK_MODEL_NAME`].
  pub async fn summarize(&self, body: &str) -> GeneratedSummary {
    if let Some(client) = &self.client {
      let prompt = format!("{SUMMARY_INSTRUCTION}{body}");
      match client.generate(prompt, self.model.clone()).await {
        Ok(text) if !text.trim().is_empty() => {
          return GeneratedSummary {
            text:       text.trim().to_owned(),
            model_name: self.model.clone(),
          };
        }
        Ok(_) => tracing::warn!("generation returned no text, using extractive summary"),
        Err(GenerationServiceError::RateLimited) => {
          tracing::warn!("generation rate limited, using extractive summary")
        }
        Err(e) => {
          tracing::warn!(error = %e, "generation failed, using extractive summary")
        }
      }
    }

    GeneratedSummary {
      text:       extractive_summary(body),
      model_name: FALLBACK_MODEL_NAME.to_owned(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummarizeReport {
  pub summarized:    usize,
  /// Listed articles passed over because their body trims to nothing, such
  /// as one made only of non-ASCII whitespace.
  pub skipped_empty: usize,
  /// Summaries written per model name.
  pub by_model:      BTreeMap<String, usize>,
}

/// Summarize up to `limit` articles that have no summary yet, newest first.
/// Articles with a blank body are never listed, so they do not use up the
/// limit.
pub async fn summarize_articles<S, G>(
  store: &S,
  summarizer: &Summarizer<G>,
  limit: usize,
) -> Result<SummarizeReport>
where
  S: NewsStore,
  G: GenerationClient,
{
  let articles = store
    .list_articles_without_summary(limit)
    .await
    .map_err(Error::from_store)?;

  let mut report = SummarizeReport::default();
  for article in articles {
    let body = article.body.trim();
    if body.is_empty() {
      report.skipped_empty += 1;
      continue;
    }

    let generated = summarizer.summarize(body).await;
    let (summary, created) = store
      .get_or_create_summary(article.id, NewSummary {
        text:       generated.text,
        model_name: generated.model_name,
      })
      .await
      .map_err(Error::from_store)?;

    if created {
      report.summarized += 1;
      *report.by_model.entry(summary.model_name).or_default() += 1;
    }
  }

  tracing::info!(
    summarized = report.summarized,
    skipped_empty = report.skipped_empty,
    "summarization finished"
  );
  Ok(report)
}
