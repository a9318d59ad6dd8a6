//! Concurrency behavior of the dataset cache.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dalil_dataset::{DatasetCache, FetchError, Fetcher, HttpFetcher, ToolRecord};
use futures_util::future::join_all;
use parking_lot::Mutex;
use reqwest::StatusCode;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOOLS_JSON: &str = r#"[
    {"id": 1, "title": "ChatGPT", "category": "نصوص", "is_featured": true},
    {"id": "2", "title": "Midjourney", "category": "صور"}
]"#;

/// Fetcher that takes a while to answer and replays scripted responses.
struct SlowFetcher {
    calls: AtomicUsize,
    responses: Mutex<VecDeque<Result<Vec<u8>, FetchError>>>,
}

impl SlowFetcher {
    fn new(responses: Vec<Result<Vec<u8>, FetchError>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(responses.into()),
        }
    }
}

/// Handle given to the cache while the test keeps its own reference.
struct SharedFetcher(Arc<SlowFetcher>);

impl Fetcher for SharedFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.0.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let next = self.0.responses.lock().pop_front();
        next.unwrap_or_else(|| {
            Err(FetchError::Status {
                status: StatusCode::NOT_FOUND,
                url: url.to_string(),
            })
        })
    }
}

fn server_error() -> FetchError {
    FetchError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        url: "https://example.com/data/tools.json".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_loads_share_one_fetch() {
    let fetcher = Arc::new(SlowFetcher::new(vec![Ok(TOOLS_JSON.as_bytes().to_vec())]));
    let cache: DatasetCache<_> = DatasetCache::for_dataset(
        SharedFetcher(Arc::clone(&fetcher)),
        "https://example.com",
        "tools",
    )
    .unwrap();

    let results = join_all((0..8).map(|_| cache.load())).await;

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    let first = results[0].as_ref().unwrap();
    for result in &results {
        assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
    }
    assert_eq!(first.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_loads_share_one_failure_and_retry_afterwards() {
    let fetcher = Arc::new(SlowFetcher::new(vec![
        Err(server_error()),
        Ok(TOOLS_JSON.as_bytes().to_vec()),
    ]));
    let cache: DatasetCache<_> = DatasetCache::for_dataset(
        SharedFetcher(Arc::clone(&fetcher)),
        "https://example.com",
        "tools",
    )
    .unwrap();

    let results = join_all((0..4).map(|_| cache.load())).await;
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    for result in &results {
        let err = result.as_ref().unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
    assert!(cache.resident().is_none());

    // The failure was not cached: the next call fetches again.
    let data = cache.load().await.unwrap();
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

    // And the success is.
    let again = cache.load().await.unwrap();
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert!(Arc::ptr_eq(&data, &again));
}

#[tokio::test(start_paused = true)]
async fn clones_share_the_same_slot() {
    let fetcher = Arc::new(SlowFetcher::new(vec![Ok(TOOLS_JSON.as_bytes().to_vec())]));
    let cache: DatasetCache<_> = DatasetCache::for_dataset(
        SharedFetcher(Arc::clone(&fetcher)),
        "https://example.com",
        "tools",
    )
    .unwrap();
    let other = cache.clone();

    let (a, b) = tokio::join!(cache.load(), other.load());

    assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    assert_eq!(cache.fetch_count(), 1);
    assert_eq!(other.fetch_count(), 1);
}

#[tokio::test]
async fn http_source_is_hit_once_for_many_callers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/data/tools.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(TOOLS_JSON)
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::builder().allow_local(true).build().unwrap();
    let base = format!("{}/app/", server.uri());
    let cache: DatasetCache<HttpFetcher, ToolRecord> =
        DatasetCache::for_dataset(fetcher, &base, "tools").unwrap();

    let results = join_all((0..5).map(|_| cache.load())).await;
    for result in results {
        let tools = result.unwrap();
        assert_eq!(tools[0].id, "1");
        assert_eq!(tools[1].title, "Midjourney");
    }

    // Served from memory; the mock's expect(1) is verified on drop.
    let _ = cache.load().await.unwrap();
}

#[tokio::test]
async fn http_error_status_reaches_every_caller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/tools.json"))
        .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_millis(50)))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::builder().allow_local(true).build().unwrap();
    let cache: DatasetCache<HttpFetcher> =
        DatasetCache::for_dataset(fetcher, &server.uri(), "tools").unwrap();

    let (a, b) = tokio::join!(cache.load(), cache.load());

    assert_eq!(a.unwrap_err().status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(b.unwrap_err().status(), Some(StatusCode::NOT_FOUND));
}
