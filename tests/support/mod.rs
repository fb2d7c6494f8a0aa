//! Shared fixtures for the kennel-core behavior tests.
#![allow(dead_code)]

use std::num::{NonZeroU32, NonZeroUsize};
use std::sync::Arc;

use kennel_core::{Breed, BreedCache, LoaderConfig, RetryConfig, ScriptedHttpClient, UpstreamClient};

pub const BASE: &str = "https://catalog.example/breeds";

pub fn page_url(page: u32) -> String {
    format!("{BASE}?page={page}")
}

pub fn config() -> LoaderConfig {
    LoaderConfig::parse(BASE).expect("valid base url")
}

pub fn config_with_retry(retry: RetryConfig) -> LoaderConfig {
    config().with_retry(retry).expect("valid retry config")
}

pub fn upstream(http: &ScriptedHttpClient) -> UpstreamClient {
    UpstreamClient::new(Arc::new(http.clone()), config())
}

/// JSON body for one upstream page with `count` valid records named
/// `{prefix}-{i}`.
pub fn catalog_page(prefix: &str, count: usize) -> String {
    let records: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "breed": format!("{prefix}-{i}"),
                "image": format!("https://images.example/{prefix}/{i}.jpg"),
            })
        })
        .collect();
    serde_json::Value::Array(records).to_string()
}

pub fn breeds(count: usize) -> Arc<Vec<Breed>> {
    Arc::new(
        (0..count)
            .map(|i| Breed::new(&format!("breed-{i}"), None).expect("valid breed"))
            .collect(),
    )
}

/// Cache holding `count` records, still loading.
pub fn loading_cache(count: usize) -> Arc<BreedCache> {
    let cache = Arc::new(BreedCache::new());
    cache.begin_load();
    cache.publish(breeds(count));
    cache
}

/// Cache holding `count` records after loading finished.
pub fn loaded_cache(count: usize) -> Arc<BreedCache> {
    let cache = Arc::new(BreedCache::new());
    cache.begin_load();
    cache.complete(breeds(count));
    cache
}

pub fn page(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).expect("page numbers start at 1")
}

pub fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("page size must be positive")
}
