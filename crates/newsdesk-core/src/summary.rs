//! Summary records and the offline extractive summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Model name recorded for summaries produced by [`extractive_summary`].
pub const FALLBACK_MODEL_NAME: &str = "baseline";

/// Number of leading sentences kept by [`extractive_summary`].
const FALLBACK_SENTENCES: usize = 5;

/// The single summary owned by an article. At most one exists per article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
  pub article_id: i64,
  pub text:       String,
  /// Which generation path produced `text`: a model identifier, or
  /// [`FALLBACK_MODEL_NAME`].
  pub model_name: String,
  pub created_at: DateTime<Utc>,
}

/// Input for creating a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSummary {
  pub text:       String,
  pub model_name: String,
}

/// The public projection of a [`Summary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryView {
  pub text:       String,
  pub model_name: String,
}

impl From<Summary> for SummaryView {
  fn from(s: Summary) -> Self {
    Self { text: s.text, model_name: s.model_name }
  }
}

/// Deterministic summary: the first five period-delimited fragments of
/// `text`, trimmed, rejoined with `". "` and terminated with a period.
///
/// Returns an empty string when `text` has no non-blank fragment.
pub fn extractive_summary(text: &str) -> String {
  let sentences: Vec<&str> = text
    .split('.')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .take(FALLBACK_SENTENCES)
    .collect();

  if sentences.is_empty() {
    return String::new();
  }
  format!("{}.", sentences.join(". "))
}

#[cfg(test)]
mod tests {
  use super::extractive_summary;

  #[test]
  fn keeps_first_five_fragments() {
    assert_eq!(extractive_summary("A. B. C. D. E. F."), "A. B. C. D. E.");
  }

  #[test]
  fn fewer_than_five_fragments() {
    assert_eq!(
      extractive_summary("Markets rallied.  Bonds fell"),
      "Markets rallied. Bonds fell."
    );
  }

  #[test]
  fn blank_fragments_are_dropped() {
    assert_eq!(extractive_summary("One... Two. . Three"), "One. Two. Three.");
  }

  #[test]
  fn empty_or_only_periods_yields_empty() {
    assert_eq!(extractive_summary(""), "");
    assert_eq!(extractive_summary(" . .. "), "");
  }
}
