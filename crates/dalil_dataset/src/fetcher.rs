//! Dataset source capability and its HTTP implementation.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tracing::debug;
use url::Url;

use crate::error::FetchError;
use crate::security::validate_url;

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Relative directory that holds published datasets.
pub const DATA_DIR: &str = "data";

/// Builds the URL of `<base>/data/<dataset>.json`.
///
/// A single trailing slash on `base` is ignored so that both `https://host/app`
/// and `https://host/app/` resolve to the same location.
pub fn dataset_url(base: &str, dataset: &str) -> Result<Url, FetchError> {
    if dataset.is_empty() || dataset.contains(['/', '\\', '?', '#']) || dataset == ".." {
        return Err(FetchError::InvalidUrl(format!(
            "invalid dataset name: {dataset:?}"
        )));
    }

    let base = base.strip_suffix('/').unwrap_or(base);
    let raw = format!("{base}/{DATA_DIR}/{dataset}.json");
    Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))
}

/// Something that can read the raw bytes behind a dataset URL.
///
/// Implemented by [`HttpFetcher`] for real deployments and by in-memory fakes
/// in tests.
pub trait Fetcher: Send + Sync + 'static {
    /// Reads the full body at `url`. Non-2xx responses must be reported as
    /// [`FetchError::Status`].
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// HTTP dataset source.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    allow_local: bool,
}

/// Builder for [`HttpFetcher`].
#[derive(Debug)]
pub struct HttpFetcherBuilder {
    timeout: Duration,
    allow_local: bool,
}

impl HttpFetcher {
    /// Create a new builder for HttpFetcher.
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder {
            timeout: DEFAULT_TIMEOUT,
            allow_local: false,
        }
    }

    /// Whether loopback and private hosts are reachable through this fetcher.
    pub fn allows_local(&self) -> bool {
        self.allow_local
    }
}

impl HttpFetcherBuilder {
    /// Set timeout for HTTP requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Allow fetching from local network addresses.
    pub fn allow_local(mut self, allow: bool) -> Self {
        self.allow_local = allow;
        self
    }

    /// Build the HttpFetcher.
    pub fn build(self) -> Result<HttpFetcher, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(HttpFetcher {
            client,
            allow_local: self.allow_local,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        validate_url(url, self.allow_local)?;

        debug!(%url, "GET dataset");
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            // Any cached copy is good enough; the dataset is immutable per deploy.
            .header(CACHE_CONTROL, "max-stale")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
