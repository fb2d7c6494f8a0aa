//! Background loader that walks every upstream page into the cache.
//!
//! ```text
//!            ┌──────── failure: skip page ────────┐
//!            ▼                                    │
//!   ──▶ Fetching ── non-empty ──▶ Appending ──────┤ page += 1
//!            │                   (publish,        │
//!            │                    throttle)  ─────┘
//!            └── empty list ──▶ Done
//! ```
//!
//! A failing page is abandoned for good and the walk moves on; the only
//! way out of the loop is an empty, well-formed page.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::BreedCache;
use crate::config::LoaderConfig;
use crate::domain::Breed;
use crate::http_client::HttpClient;
use crate::upstream::{FetchFailure, PageFetch, UpstreamClient};
use crate::validator;

/// Summary of one finished load cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Upstream pages requested, including the final empty one.
    pub pages_fetched: u32,
    /// Pages abandoned after the client gave up on them.
    pub pages_skipped: u32,
    /// Records in the cache at completion.
    pub records: usize,
}

enum LoaderState {
    Fetching,
    Appending(Vec<Value>),
    Skipping(FetchFailure),
    Done,
}

/// Drives the page-by-page fetch loop for one load cycle.
pub struct BackgroundLoader {
    client: UpstreamClient,
    cache: Arc<BreedCache>,
    throttle: Duration,
}

impl BackgroundLoader {
    pub fn new(client: UpstreamClient, cache: Arc<BreedCache>) -> Self {
        let throttle = client.config().throttle;
        Self {
            client,
            cache,
            throttle,
        }
    }

    pub fn from_config(
        http: Arc<dyn HttpClient>,
        config: LoaderConfig,
        cache: Arc<BreedCache>,
    ) -> Self {
        Self::new(UpstreamClient::new(http, config), cache)
    }

    /// Run the load cycle to end-of-data.
    ///
    /// If another cycle is already active on the cache this returns an
    /// empty report without fetching anything.
    pub async fn run(self) -> LoadReport {
        if !self.claim() {
            return LoadReport::default();
        }
        self.load().await
    }

    /// Start the load cycle on the tokio runtime.
    ///
    /// The cache is marked as loading before this returns, so a request
    /// served right after sees "not ready" rather than "out of range".
    pub fn spawn(self) -> LoaderHandle {
        let task = if self.claim() {
            tokio::spawn(self.load())
        } else {
            tokio::spawn(async { LoadReport::default() })
        };
        LoaderHandle { task }
    }

    fn claim(&self) -> bool {
        if !self.cache.begin_load() {
            warn!("a load cycle is already running; not starting another");
            return false;
        }
        true
    }

    async fn load(self) -> LoadReport {
        info!("starting background breed loading from upstream");

        let mut report = LoadReport::default();
        let mut accumulated: Vec<Breed> = Vec::new();
        let mut page: u32 = 1;
        let mut state = LoaderState::Fetching;

        loop {
            state = match state {
                LoaderState::Fetching => {
                    report.pages_fetched += 1;
                    match self.client.fetch_page(page).await {
                        PageFetch::Failed(failure) => LoaderState::Skipping(failure),
                        PageFetch::Records(raw) if raw.is_empty() => {
                            info!(page, "end of upstream data reached");
                            LoaderState::Done
                        }
                        PageFetch::Records(raw) => LoaderState::Appending(raw),
                    }
                }
                LoaderState::Skipping(failure) => {
                    warn!(page, reason = %failure, "skipping failed page, continuing to next page");
                    report.pages_skipped += 1;
                    page += 1;
                    LoaderState::Fetching
                }
                LoaderState::Appending(raw) => {
                    let cleaned = validator::clean(&raw);
                    let dropped = raw.len() - cleaned.len();
                    accumulated.extend(cleaned);

                    self.cache.publish(Arc::new(accumulated.clone()));
                    info!(page, dropped, total = accumulated.len(), "loaded page into cache");

                    page += 1;
                    if !self.throttle.is_zero() {
                        tokio::time::sleep(self.throttle).await;
                    }
                    LoaderState::Fetching
                }
                LoaderState::Done => break,
            };
        }

        report.records = accumulated.len();
        self.cache.complete(Arc::new(accumulated));
        info!(
            records = report.records,
            pages_fetched = report.pages_fetched,
            pages_skipped = report.pages_skipped,
            "background loading complete"
        );
        report
    }
}

/// Handle to a spawned loader.
///
/// Dropping the handle leaves the loader running.
#[derive(Debug)]
pub struct LoaderHandle {
    task: JoinHandle<LoadReport>,
}

impl LoaderHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the loader. Records published so far stay in the cache.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Wait for the loader; `None` if it was aborted or panicked.
    pub async fn join(self) -> Option<LoadReport> {
        self.task.await.ok()
    }
}
