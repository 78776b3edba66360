//! Core types and trait definitions for newsdesk.
//!
//! This crate is free of HTTP and database dependencies. It holds the domain
//! types, the [`store::NewsStore`] abstraction, and the pure parts of the
//! pipeline: record normalization, the keyword taxonomy, slug derivation and
//! the extractive fallback summary.

// Store backends implement the trait with native `async fn`.
#![allow(async_fn_in_trait)]

pub mod article;
pub mod error;
pub mod normalize;
pub mod slug;
pub mod source;
pub mod store;
pub mod summary;
pub mod taxonomy;
pub mod topic;

pub use error::{Error, Result, StoreError};
