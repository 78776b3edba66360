//! The newsdesk batch pipeline.
//!
//! Ingestion pulls a page of articles from a [`feed::FeedClient`], normalizes
//! each record and upserts it through a [`newsdesk_core::store::NewsStore`].
//! Tagging and summarization are separate jobs that enrich stored articles.
//! All external calls sit behind traits so the jobs can run against stubs.

pub mod error;
pub mod feed;
pub mod generate;
pub mod ingest;
pub mod summarizer;
pub mod tagger;

pub use error::{Error, FeedFetchError, GenerationServiceError, Result};
