//! Runtime settings.
//!
//! Precedence, highest first: `NEWSDESK_*` environment variables, the TOML
//! file, the conventional `NEWS_API_KEY` / `OPENAI_API_KEY` / `OPENAI_MODEL`
//! variables, built-in defaults.

use std::path::{Path, PathBuf};

use newsdesk_pipeline::{
  feed::DEFAULT_NEWS_API_URL, generate::DEFAULT_OPENAI_BASE_URL, summarizer::DEFAULT_MODEL,
};
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8000;

/// Conventional variables honoured below the `NEWSDESK_` ones.
const ENV_FALLBACKS: &[(&str, &str)] = &[
  ("news_api_key", "NEWS_API_KEY"),
  ("openai_api_key", "OPENAI_API_KEY"),
  ("openai_model", "OPENAI_MODEL"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub store_path:      PathBuf,
  pub news_api_key:    Option<String>,
  pub news_api_url:    String,
  pub openai_api_key:  Option<String>,
  pub openai_model:    String,
  pub openai_base_url: String,
  pub host:            String,
  pub port:            u16,
}

impl Settings {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder()
      .set_default("store_path", "newsdesk.db")?
      .set_default("news_api_url", DEFAULT_NEWS_API_URL)?
      .set_default("openai_model", DEFAULT_MODEL)?
      .set_default("openai_base_url", DEFAULT_OPENAI_BASE_URL)?
      .set_default("host", "127.0.0.1")?
      .set_default("port", i64::from(DEFAULT_PORT))?;

    for (key, var) in ENV_FALLBACKS {
      if let Ok(value) = std::env::var(var) {
        builder = builder.set_default(*key, value)?;
      }
    }

    let mut settings: Settings = builder
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("NEWSDESK"))
      .build()?
      .try_deserialize()?;

    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }

  pub fn news_api_key(&self) -> Option<&str> {
    self.news_api_key.as_deref().filter(|k| !k.is_empty())
  }

  pub fn openai_api_key(&self) -> Option<&str> {
    self.openai_api_key.as_deref().filter(|k| !k.is_empty())
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
