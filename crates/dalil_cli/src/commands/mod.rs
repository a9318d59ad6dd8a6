//! Command implementations

pub mod compare;
pub mod init;
pub mod recent;
pub mod tools;

use dalil_dataset::{Dataset, DatasetCache, FetchError, HttpFetcher, ToolRecord, find_by_ids};
use dalil_storage::FileStore;
use miette::{Diagnostic, IntoDiagnostic, Result};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::DalilConfig;
use crate::runtime;

#[derive(Debug, Error, Diagnostic)]
pub enum CommandError {
    #[error("Failed to load the tool dataset from {url}")]
    #[diagnostic(
        code(dalil::dataset::unavailable),
        help("check `base_url` and `dataset` in your config")
    )]
    DatasetUnavailable {
        url: String,
        #[source]
        source: FetchError,
    },
}

/// Opens the file store for the persisted lists.
pub(crate) fn open_store(config: &DalilConfig) -> Result<FileStore> {
    let store = match config.resolved_storage_dir() {
        Some(dir) => FileStore::with_dir(dir),
        None => FileStore::new().into_diagnostic()?,
    };
    debug!("Using storage at {}", store.dir().display());
    Ok(store)
}

/// Fetches the dataset described by `config`.
pub(crate) fn load_dataset(config: &DalilConfig) -> Result<Dataset<ToolRecord>> {
    let fetcher = HttpFetcher::builder()
        .timeout(config.timeout())
        .allow_local(config.allow_local)
        .build()
        .into_diagnostic()?;
    let cache: DatasetCache<_> =
        DatasetCache::for_dataset(fetcher, &config.base_url, &config.dataset)
            .into_diagnostic()?;
    let url = cache.url().to_string();

    runtime::block_on(cache.load())?
        .map_err(|source| CommandError::DatasetUnavailable { url, source }.into())
}

/// Prints ids one per line, or with titles when `details` is set.
pub(crate) fn print_ids(config: &DalilConfig, ids: &[String], details: bool) -> Result<()> {
    if !details {
        for id in ids {
            println!("{}", id);
        }
        return Ok(());
    }

    let dataset = load_dataset(config)?;
    let records = find_by_ids(&dataset, ids);
    if records.len() < ids.len() {
        warn!(
            "{} stored id(s) are no longer in the dataset",
            ids.len() - records.len()
        );
    }
    for record in records {
        println!("{}\t{}", record.id, record.title);
    }
    Ok(())
}
