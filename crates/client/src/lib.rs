//! `catalog-client`
//!
//! **Responsibility:** getting the product snapshot from the catalog API and
//! holding it for one view.
//!
//! This crate provides:
//! - An HTTP fetcher with timeout, retry and typed failures
//! - An explicit retry/backoff policy
//! - A store that allows one fetch in flight and swaps snapshots wholesale
//!
//! Filtering and sorting live in `catalog-products`; this crate only feeds it.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod retry;
pub mod store;
pub mod view;

pub use config::{ConfigError, FetcherConfig};
pub use error::FetchError;
pub use fetcher::{HttpProductFetcher, ProductSource};
pub use retry::{BackoffStrategy, RetryPolicy};
pub use store::{CatalogStore, LoadOutcome, RequestState};
pub use view::{EmptyReason, ViewState};
