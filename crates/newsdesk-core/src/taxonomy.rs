//! Keyword taxonomy used by the topic tagger.
//!
//! The table is ordered: a topic's position is its priority when the number of
//! matches exceeds the caller's limit.

/// Default cap on topics attached to one article.
pub const DEFAULT_MAX_TOPICS: usize = 5;

/// Canonical topic name → lowercase trigger keywords, in priority order.
pub const TAXONOMY: &[(&str, &[&str])] = &[
  ("AI", &["ai", "artificial intelligence", "machine learning", "ml", "llm"]),
  ("Python", &["python"]),
  ("Django", &["django", "rest framework", "drf"]),
  ("Docker", &["docker", "container", "kubernetes", "k8s"]),
  ("AWS", &["aws", "amazon web services", "ec2", "s3", "lambda"]),
  ("Security", &["security", "vulnerability", "breach", "cyber", "ransomware"]),
  ("Databases", &["postgres", "mysql", "sqlite", "database", "sql", "nosql"]),
  ("Web", &["frontend", "backend", "api", "microservice", "http", "rest"]),
  ("Cloud", &["cloud", "gcp", "azure", "cloudflare"]),
];

/// The text the tagger classifies: title and body, lowercased.
pub fn topic_blob(title: &str, body: &str) -> String {
  format!("{title}\n{body}").to_lowercase()
}

/// Canonical topics whose keywords occur as substrings of `blob`, in table
/// order. `blob` is expected to be lowercase already.
pub fn guess_topics(blob: &str) -> Vec<&'static str> {
  TAXONOMY
    .iter()
    .filter(|(_, keywords)| keywords.iter().any(|kw| blob.contains(kw)))
    .map(|(name, _)| *name)
    .collect()
}
