//! newsdesk command-line entry point.
//!
//! Reads `newsdesk.toml` (or the path given with `--config`), opens the
//! SQLite store and runs one batch job, or serves the read API.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use clap::{Parser, Subcommand};
use newsdesk_core::{summary::FALLBACK_MODEL_NAME, taxonomy::DEFAULT_MAX_TOPICS};
use newsdesk_pipeline::{
  feed::NewsApiClient,
  generate::OpenAiClient,
  ingest::IngestCoordinator,
  summarizer::{Summarizer, summarize_articles},
  tagger::tag_articles,
};
use newsdesk_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[derive(Parser)]
#[command(author, version, about = "News ingestion, tagging and summarization")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "newsdesk.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Fetch articles from NewsAPI and upsert them by URL.
  FetchArticles {
    /// Search keyword.
    #[arg(long, default_value = "technology")]
    q:         String,
    #[arg(long, default_value_t = 50)]
    page_size: u32,
  },

  /// Assign topics to articles by keyword matching.
  TagArticles {
    /// Retag all articles instead of only those without topics.
    #[arg(long)]
    all: bool,
  },

  /// Create summaries for articles that have none.
  SummarizeArticles {
    #[arg(long, default_value_t = 25)]
    limit: usize,
  },

  /// Serve the read-only JSON API under `/api`.
  Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(&cli.config).context("failed to read configuration")?;

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  match cli.command {
    Command::FetchArticles { q, page_size } => fetch_articles(&settings, &store, &q, page_size).await,
    Command::TagArticles { all } => {
      let report = tag_articles(&store, !all, DEFAULT_MAX_TOPICS)
        .await
        .context("failed to tag articles")?;
      println!(
        "Processed {} article(s); attached {} topic(s).",
        report.processed, report.attached
      );
      Ok(())
    }
    Command::SummarizeArticles { limit } => summarize(&settings, &store, limit).await,
    Command::Serve => serve(&settings, store).await,
  }
}

async fn fetch_articles(
  settings: &Settings,
  store: &SqliteStore,
  keyword: &str,
  page_size: u32,
) -> anyhow::Result<()> {
  let api_key = settings
    .news_api_key()
    .context("no NewsAPI key configured (set NEWS_API_KEY or NEWSDESK_NEWS_API_KEY)")?;
  let feed = NewsApiClient::with_endpoint(api_key, &settings.news_api_url)
    .context("failed to build the NewsAPI client")?;

  let report = IngestCoordinator::new(store, &feed)
    .run(keyword, page_size)
    .await
    .context("failed to fetch or store articles")?;

  println!("Created: {}, Updated: {}", report.created, report.updated);
  Ok(())
}

async fn summarize(settings: &Settings, store: &SqliteStore, limit: usize) -> anyhow::Result<()> {
  let client = settings
    .openai_api_key()
    .map(|key| OpenAiClient::with_base_url(key, &settings.openai_base_url))
    .transpose()
    .context("failed to build the OpenAI client")?;
  let headline_model = if client.is_some() {
    settings.openai_model.as_str()
  } else {
    FALLBACK_MODEL_NAME
  };
  let summarizer = Summarizer::new(client, &settings.openai_model);

  let report = summarize_articles(store, &summarizer, limit)
    .await
    .context("failed to summarize articles")?;

  if report.by_model.is_empty() {
    println!("Summarized 0 article(s) using model '{headline_model}'.");
  }
  for (model, count) in &report.by_model {
    println!("Summarized {count} article(s) using model '{model}'.");
  }
  Ok(())
}

async fn serve(settings: &Settings, store: SqliteStore) -> anyhow::Result<()> {
  let app = Router::new()
    .nest("/api", newsdesk_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", settings.host, settings.port);

  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
