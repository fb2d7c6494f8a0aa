//! Client-facing pagination over whatever the cache holds right now.
//!
//! A request resolves to one of three outcomes:
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | [`PageResponse::Page`] | Data exists at the requested offset |
//! | [`PageResponse::NotReady`] | No data there yet, but the loader is still running |
//! | [`PageResponse::OutOfRange`] | Loading is finished and the page will never exist |

use std::num::{NonZeroU32, NonZeroUsize};
use std::sync::Arc;

use serde::Serialize;

use crate::cache::{BreedCache, CacheSnapshot};
use crate::domain::Breed;

pub const OUT_OF_RANGE_MESSAGE: &str = "Page out of range";
pub const NOT_READY_MESSAGE: &str =
    "Data for this page is not loaded yet. Please try again in a moment.";

/// A window of cached records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: u32,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub total_items: usize,
    pub items: Vec<Breed>,
    pub loading_complete: bool,
}

/// The requested page has no data yet; retry later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotReady {
    pub error: &'static str,
    pub page: u32,
    pub loading: bool,
    pub loaded_items: usize,
}

/// Loading finished and the requested page lies past the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutOfRange {
    pub error: &'static str,
    pub page: u32,
    pub total_pages: usize,
}

/// Result of a pagination query. Serializes to the bare variant body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageResponse {
    Page(PageWindow),
    NotReady(NotReady),
    OutOfRange(OutOfRange),
}

/// `ceil(total / page_size)`, and 1 for an empty cache.
pub fn total_pages(total_items: usize, page_size: NonZeroUsize) -> usize {
    if total_items == 0 {
        1
    } else {
        total_items.div_ceil(page_size.get())
    }
}

/// Zero-based offset of the first record on `page`.
pub fn page_offset(page: NonZeroU32, page_size: NonZeroUsize) -> usize {
    (page.get() as usize - 1).saturating_mul(page_size.get())
}

/// Paginate one snapshot. Pure: the same snapshot always yields the same
/// response.
pub fn paginate(snapshot: &CacheSnapshot, page: NonZeroU32, page_size: NonZeroUsize) -> PageResponse {
    let offset = page_offset(page, page_size);
    let total_items = snapshot.len();

    if total_items <= offset {
        if snapshot.is_loading_complete() {
            return PageResponse::OutOfRange(OutOfRange {
                error: OUT_OF_RANGE_MESSAGE,
                page: page.get(),
                total_pages: total_pages(total_items, page_size),
            });
        }
        return PageResponse::NotReady(NotReady {
            error: NOT_READY_MESSAGE,
            page: page.get(),
            loading: true,
            loaded_items: total_items,
        });
    }

    let end = offset.saturating_add(page_size.get()).min(total_items);
    PageResponse::Page(PageWindow {
        page: page.get(),
        total_pages: total_pages(total_items, page_size),
        items_per_page: page_size.get(),
        total_items,
        items: snapshot.records()[offset..end].to_vec(),
        loading_complete: snapshot.is_loading_complete(),
    })
}

/// Read-only query surface over the shared cache.
#[derive(Debug, Clone)]
pub struct PaginationView {
    cache: Arc<BreedCache>,
}

impl PaginationView {
    pub fn new(cache: Arc<BreedCache>) -> Self {
        Self { cache }
    }

    /// True when the cache holds more than `offset` records.
    pub fn has_data_for_offset(&self, offset: usize) -> bool {
        self.cache.snapshot().len() > offset
    }

    /// Point-in-time copy of the record list reference.
    pub fn current_records(&self) -> Arc<Vec<Breed>> {
        self.cache.records()
    }

    pub fn page(&self, page: NonZeroU32, page_size: NonZeroUsize) -> PageResponse {
        paginate(&self.cache.snapshot(), page, page_size)
    }
}
