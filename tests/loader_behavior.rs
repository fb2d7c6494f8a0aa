//! Behavior-driven tests for the background loader
//!
//! These tests verify HOW the cache fills up while the loader walks the
//! upstream catalog, and what request handlers see along the way.

mod support;

use std::sync::Arc;
use std::time::Duration;

use kennel_core::{
    BackgroundLoader, BreedCache, LoadReport, PageResponse, PaginationView, RetryConfig,
    ScriptedHttpClient,
};
use support::{catalog_page, config, config_with_retry, page, page_url, size};

fn loader(http: &ScriptedHttpClient, cache: &Arc<BreedCache>) -> BackgroundLoader {
    BackgroundLoader::from_config(Arc::new(http.clone()), config(), Arc::clone(cache))
}

fn names(cache: &BreedCache) -> Vec<String> {
    cache
        .records()
        .iter()
        .map(|breed| breed.breed().to_string())
        .collect()
}

// =============================================================================
// Loader: Happy Paths
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_upstream_has_one_record_loader_fetches_two_pages_and_completes() {
    // Given: One record on page 1 and an empty page 2
    let http = ScriptedHttpClient::new();
    http.push_response(page_url(1), 200, r#"[{"breed":"akita","image":"http://x/1.jpg"}]"#);
    http.push_response(page_url(2), 200, "[]");
    let cache = Arc::new(BreedCache::new());

    // When: The loader runs to completion
    let report = loader(&http, &cache).run().await;

    // Then: Exactly two fetches were made and one record is cached
    assert_eq!(http.requests(), vec![page_url(1), page_url(2)]);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(cache.status().loaded_count, 1);
    assert!(cache.is_loading_complete());

    // And: Page 1 holds that single record
    match PaginationView::new(Arc::clone(&cache)).page(page(1), size(10)) {
        PageResponse::Page(window) => {
            assert_eq!(window.items.len(), 1);
            assert_eq!(window.total_pages, 1);
            assert_eq!(window.total_items, 1);
            assert!(window.loading_complete);
        }
        other => panic!("expected a page, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn when_first_page_fails_transiently_loader_retries_then_caches_records() {
    // Given: Page 1 answers 500 three times before returning two records
    let http = ScriptedHttpClient::new();
    http.push_response(page_url(1), 500, "");
    http.push_response(page_url(1), 500, "");
    http.push_response(page_url(1), 500, "");
    http.push_response(page_url(1), 200, catalog_page("beagle", 2));
    http.push_response(page_url(2), 200, "[]");
    let cache = Arc::new(BreedCache::new());

    // When: The loader runs to completion
    let report = loader(&http, &cache).run().await;

    // Then: Page 1 took four attempts and both records are cached
    assert_eq!(http.calls(&page_url(1)), 4);
    assert_eq!(report.records, 2);
    assert_eq!(cache.status().loaded_count, 2);
}

#[tokio::test(start_paused = true)]
async fn when_pages_contain_bad_records_loader_keeps_only_valid_ones_in_order() {
    let http = ScriptedHttpClient::new();
    http.push_response(
        page_url(1),
        200,
        r#"[{"breed":"akita"},{"breed":""},{"breed":"boxer","image":"ftp://x/y.png"},{"breed":"corgi","image":null}]"#,
    );
    http.push_response(page_url(2), 200, r#"["dalmatian",{"breed":"dingo","extra":true}]"#);
    http.push_response(page_url(3), 200, "[]");
    let cache = Arc::new(BreedCache::new());

    let report = loader(&http, &cache).run().await;

    assert_eq!(names(&cache), vec!["akita", "corgi", "dingo"]);
    assert_eq!(report.records, 3);
}

// =============================================================================
// Loader: Failed Pages
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_a_page_fails_permanently_loader_skips_it_and_continues() {
    // Given: Page 2 is gone for good, pages 1 and 3 have data
    let http = ScriptedHttpClient::new();
    http.push_response(page_url(1), 200, catalog_page("p1", 3));
    http.push_response(page_url(2), 404, "");
    http.push_response(page_url(3), 200, catalog_page("p3", 2));
    http.push_response(page_url(4), 200, "[]");
    let cache = Arc::new(BreedCache::new());

    // When: The loader runs to completion
    let report = loader(&http, &cache).run().await;

    // Then: Page 2 is missing from the cache, everything else is in page order
    assert_eq!(
        names(&cache),
        vec!["p1-0", "p1-1", "p1-2", "p3-0", "p3-1"]
    );
    assert_eq!(
        report,
        LoadReport {
            pages_fetched: 4,
            pages_skipped: 1,
            records: 5,
        }
    );
    assert_eq!(http.calls(&page_url(2)), 1);
}

#[tokio::test(start_paused = true)]
async fn when_a_page_exhausts_its_retries_loader_moves_on() {
    // Given: Page 1 is always busy, page 2 has data
    let http = ScriptedHttpClient::new();
    http.push_response(page_url(1), 503, "");
    http.push_response(page_url(2), 200, catalog_page("late", 1));
    http.push_response(page_url(3), 200, "[]");
    let cache = Arc::new(BreedCache::new());
    let loader = BackgroundLoader::from_config(
        Arc::new(http.clone()),
        config_with_retry(RetryConfig::linear(2, Duration::from_millis(100))),
        Arc::clone(&cache),
    );

    // When: The loader runs to completion
    let report = loader.run().await;

    // Then: Page 1 was abandoned after two attempts
    assert_eq!(http.calls(&page_url(1)), 2);
    assert_eq!(report.pages_skipped, 1);
    assert_eq!(names(&cache), vec!["late-0"]);
}

// =============================================================================
// Loader: Readers During Loading
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_loader_is_running_early_pages_are_already_served() {
    // Given: Ten records on page 1, five on page 2
    let http = ScriptedHttpClient::new();
    http.push_response(page_url(1), 200, catalog_page("early", 10));
    http.push_response(page_url(2), 200, catalog_page("later", 5));
    http.push_response(page_url(3), 200, "[]");
    let cache = Arc::new(BreedCache::new());
    let view = PaginationView::new(Arc::clone(&cache));

    // When: The loader has published page 1 and is throttling before page 2
    let handle = loader(&http, &cache).spawn();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Then: Page 1 is served, page 2 is not ready yet
    match view.page(page(1), size(10)) {
        PageResponse::Page(window) => {
            assert_eq!(window.items.len(), 10);
            assert!(!window.loading_complete);
        }
        other => panic!("expected a page, got {other:?}"),
    }
    match view.page(page(2), size(10)) {
        PageResponse::NotReady(not_ready) => {
            assert!(not_ready.loading);
            assert_eq!(not_ready.loaded_items, 10);
        }
        other => panic!("expected not-ready, got {other:?}"),
    }

    // And: Once loading is done, page 2 holds the tail
    handle.join().await.expect("loader finishes");
    match view.page(page(2), size(10)) {
        PageResponse::Page(window) => assert_eq!(window.items.len(), 5),
        other => panic!("expected a page, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn when_loader_is_spawned_cache_reports_loading_before_the_task_first_runs() {
    // Given: An upstream with data, and a view over an empty cache
    let http = ScriptedHttpClient::new();
    http.push_response(page_url(1), 200, catalog_page("first", 3));
    http.push_response(page_url(2), 200, "[]");
    let cache = Arc::new(BreedCache::new());
    let view = PaginationView::new(Arc::clone(&cache));

    // When: The loader is spawned and a request arrives before any yield
    let handle = loader(&http, &cache).spawn();
    let response = view.page(page(1), size(10));

    // Then: The client is told to retry, not that the page will never exist
    assert!(cache.snapshot().is_loading());
    assert!(
        matches!(response, PageResponse::NotReady(ref r) if r.loaded_items == 0),
        "{response:?}"
    );
    assert!(http.requests().is_empty());

    handle.join().await.expect("loader finishes");
    assert!(matches!(view.page(page(1), size(10)), PageResponse::Page(_)));
}

#[tokio::test(start_paused = true)]
async fn when_a_second_loader_is_spawned_it_fetches_nothing() {
    let http = ScriptedHttpClient::new();
    http.push_response(page_url(1), 200, catalog_page("only", 1));
    http.push_response(page_url(2), 200, "[]");
    let cache = Arc::new(BreedCache::new());

    let first = loader(&http, &cache).spawn();
    let second = loader(&http, &cache).spawn();

    assert_eq!(second.join().await, Some(LoadReport::default()));
    let report = first.join().await.expect("loader finishes");
    assert_eq!(report.records, 1);
    assert_eq!(http.calls(&page_url(1)), 1);
}

#[tokio::test(start_paused = true)]
async fn when_throttle_is_configured_loader_pauses_after_each_appended_page() {
    // Given: Two data pages and a one-second throttle
    let http = ScriptedHttpClient::new();
    http.push_response(page_url(1), 200, catalog_page("a", 2));
    http.push_response(page_url(2), 200, catalog_page("b", 2));
    http.push_response(page_url(3), 200, "[]");
    let cache = Arc::new(BreedCache::new());
    let loader = BackgroundLoader::from_config(
        Arc::new(http.clone()),
        config().with_throttle(Duration::from_secs(1)),
        Arc::clone(&cache),
    );

    // When: The loader runs to completion
    let started = tokio::time::Instant::now();
    let report = loader.run().await;

    // Then: It paused once per appended page and not after the empty one
    assert_eq!(started.elapsed(), Duration::from_secs(2));
    assert_eq!(report.records, 4);
}

#[tokio::test(start_paused = true)]
async fn when_sampled_during_loading_cache_length_never_decreases() {
    // Given: Several pages, one of which is flaky
    let http = ScriptedHttpClient::new();
    http.push_response(page_url(1), 200, catalog_page("a", 4));
    http.push_response(page_url(2), 502, "");
    http.push_response(page_url(2), 200, catalog_page("b", 3));
    http.push_response(page_url(3), 200, catalog_page("c", 5));
    http.push_response(page_url(4), 200, "[]");
    let cache = Arc::new(BreedCache::new());
    let view = PaginationView::new(Arc::clone(&cache));

    // When: The cache is sampled repeatedly while the loader runs
    let handle = loader(&http, &cache).spawn();
    let mut samples = vec![view.current_records().len()];
    while !handle.is_finished() {
        tokio::time::sleep(Duration::from_millis(50)).await;
        samples.push(view.current_records().len());
    }

    // Then: Every sample is at least as large as the one before it
    assert!(samples.windows(2).all(|pair| pair[0] <= pair[1]), "{samples:?}");
    assert_eq!(samples.last().copied(), Some(12));
    assert!(cache.is_loading_complete());
}

#[tokio::test(start_paused = true)]
async fn when_loader_is_aborted_published_records_stay_cached() {
    let http = ScriptedHttpClient::new();
    http.push_response(page_url(1), 200, catalog_page("kept", 2));
    http.push_response(page_url(2), 503, "");
    let cache = Arc::new(BreedCache::new());

    let handle = loader(&http, &cache).spawn();
    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.abort();

    assert_eq!(handle.join().await, None);
    assert_eq!(cache.records().len(), 2);
    assert!(!cache.is_loading_complete());
}
