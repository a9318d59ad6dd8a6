//! Single-flight, memoize-forever dataset cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::FetchError;
use crate::fetcher::{Fetcher, dataset_url};
use crate::record::ToolRecord;

/// A resident dataset snapshot. Cloning is cheap and every caller sees the
/// same allocation.
pub type Dataset<T> = Arc<Vec<T>>;

type PendingLoad<T> = Shared<BoxFuture<'static, Result<Dataset<T>, FetchError>>>;

struct Slot<T> {
    resident: Option<Dataset<T>>,
    in_flight: Option<PendingLoad<T>>,
}

struct Inner<F, T> {
    fetcher: F,
    url: Url,
    slot: Mutex<Slot<T>>,
    fetches: AtomicU64,
}

/// Fetch-once cache for a shared, immutable dataset.
///
/// - A resident snapshot is returned without touching the fetcher.
/// - Concurrent callers while a fetch is pending join that fetch and receive
///   the same value or the same error.
/// - Failures are not cached; the next call starts a fresh fetch.
///
/// The check for a pending fetch and the registration of a new one happen
/// under one lock, before any await point. The fetch itself runs on its own
/// task, so it completes and fills the cache even if every caller gives up.
pub struct DatasetCache<F, T = ToolRecord> {
    inner: Arc<Inner<F, T>>,
}

impl<F, T> Clone for DatasetCache<F, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F, T> DatasetCache<F, T>
where
    F: Fetcher,
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Creates an empty cache reading from `url`.
    pub fn new(fetcher: F, url: Url) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                url,
                slot: Mutex::new(Slot {
                    resident: None,
                    in_flight: None,
                }),
                fetches: AtomicU64::new(0),
            }),
        }
    }

    /// Creates an empty cache for `<base>/data/<dataset>.json`.
    pub fn for_dataset(fetcher: F, base: &str, dataset: &str) -> Result<Self, FetchError> {
        Ok(Self::new(fetcher, dataset_url(base, dataset)?))
    }

    /// URL the dataset is read from.
    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// The resident snapshot, if a load has completed successfully.
    pub fn resident(&self) -> Option<Dataset<T>> {
        self.inner.slot.lock().resident.clone()
    }

    /// Number of underlying fetches started so far.
    pub fn fetch_count(&self) -> u64 {
        self.inner.fetches.load(Ordering::Relaxed)
    }

    /// Returns the dataset, fetching it at most once across concurrent callers.
    ///
    /// # Panics
    ///
    /// Panics when a fetch must be started outside a tokio runtime.
    pub async fn load(&self) -> Result<Dataset<T>, FetchError> {
        let pending = {
            let mut slot = self.inner.slot.lock();

            if let Some(data) = &slot.resident {
                debug!(url = %self.inner.url, "dataset cache hit");
                return Ok(Arc::clone(data));
            }

            match &slot.in_flight {
                Some(pending) => {
                    debug!(url = %self.inner.url, "joining in-flight dataset fetch");
                    pending.clone()
                }
                None => {
                    let pending = Self::spawn_fetch(&self.inner);
                    slot.in_flight = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Starts the fetch on a detached task and returns a joinable handle to
    /// its result.
    fn spawn_fetch(inner: &Arc<Inner<F, T>>) -> PendingLoad<T> {
        let task = tokio::spawn(Self::fetch_and_store(Arc::clone(inner)));
        let inner = Arc::clone(inner);

        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    // The task died before it could release the slot.
                    inner.slot.lock().in_flight = None;
                    warn!(url = %inner.url, "dataset fetch task failed: {}", e);
                    Err(FetchError::Interrupted(e.to_string()))
                }
            }
        }
        .boxed()
        .shared()
    }

    async fn fetch_and_store(inner: Arc<Inner<F, T>>) -> Result<Dataset<T>, FetchError> {
        inner.fetches.fetch_add(1, Ordering::Relaxed);
        debug!(url = %inner.url, "starting dataset fetch");

        let result = match inner.fetcher.fetch(&inner.url).await {
            Ok(bytes) => serde_json::from_slice::<Vec<T>>(&bytes)
                .map(Arc::new)
                .map_err(|e| FetchError::InvalidBody(e.to_string())),
            Err(e) => Err(e),
        };

        // Clear the marker before any joined caller observes the result so a
        // failed attempt never blocks the next one.
        let mut slot = inner.slot.lock();
        slot.in_flight = None;
        match &result {
            Ok(data) => {
                info!(url = %inner.url, records = data.len(), "dataset loaded");
                slot.resident = Some(Arc::clone(data));
            }
            Err(e) => warn!(url = %inner.url, "dataset fetch failed: {}", e),
        }

        result
    }
}
