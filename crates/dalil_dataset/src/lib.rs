//! # dalil_dataset
//!
//! Fetch-once access to the published tool dataset.
//!
//! This crate provides:
//! - The [`Fetcher`] capability and its HTTP implementation, [`HttpFetcher`]
//! - [`DatasetCache`], which collapses concurrent loads into one fetch and
//!   keeps the result for the lifetime of the process
//! - Typed [`ToolRecord`]s and [`ToolQuery`] paging over a resident dataset
//!
//! ## Example
//!
//! ```rust,ignore
//! use dalil_dataset::{DatasetCache, HttpFetcher, ToolQuery};
//!
//! let fetcher = HttpFetcher::builder().build()?;
//! let cache: DatasetCache<_> = DatasetCache::for_dataset(fetcher, "https://dalil.example", "tools")?;
//!
//! let tools = cache.load().await?;
//! let page = ToolQuery::new().search("chat").run(&tools);
//! ```

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod query;
pub mod record;
pub mod security;

pub use cache::{Dataset, DatasetCache};
pub use error::FetchError;
pub use fetcher::{DEFAULT_TIMEOUT, Fetcher, HttpFetcher, dataset_url};
pub use query::{PAGE_SIZE, ToolPage, ToolQuery};
pub use record::{ToolRecord, find_by_ids};
pub use security::{HostScope, SecurityError, host_scope, validate_url};
