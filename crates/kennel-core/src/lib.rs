//! # Kennel Core
//!
//! Read-through cache and pagination layer in front of a paginated upstream
//! breed catalog.
//!
//! ## Overview
//!
//! A single background task walks the upstream catalog page by page and
//! publishes what it has into a shared cache as it goes. Request handlers
//! paginate over whatever is cached right now and never wait for the
//! loader.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Shared cache with snapshot publication |
//! | [`config`] | Loader, client and pagination settings |
//! | [`domain`] | Validated breed records |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`loader`] | Background incremental loader |
//! | [`pagination`] | Client-facing page windows |
//! | [`retry`] | Retry and linear backoff policy |
//! | [`upstream`] | Page fetching with bounded retries |
//! | [`validator`] | Per-page record cleaning |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::num::{NonZeroU32, NonZeroUsize};
//! use std::sync::Arc;
//! use kennel_core::{BackgroundLoader, BreedCache, LoaderConfig, PaginationView, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LoaderConfig::parse("https://catalog.example/breeds")?;
//!     let cache = Arc::new(BreedCache::new());
//!
//!     let _loader = BackgroundLoader::from_config(
//!         Arc::new(ReqwestHttpClient::new()),
//!         config.clone(),
//!         Arc::clone(&cache),
//!     )
//!     .spawn();
//!
//!     let view = PaginationView::new(cache);
//!     let first = view.page(NonZeroU32::MIN, config.items_per_page);
//!     println!("{}", serde_json::to_string(&first)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │ Background Loader│────▶│ Upstream Client  │──▶ HTTP Client (reqwest)
//! └────────┬─────────┘     └──────────────────┘
//!          │ validate + publish snapshot
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   Breed Cache    │◀────│ Pagination View  │◀── request handlers
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Nothing in the load path raises to its caller. Upstream problems come
//! back as [`PageFetch::Failed`], malformed records are dropped by the
//! validator, and pagination answers with one of the [`PageResponse`]
//! variants.

pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod loader;
pub mod pagination;
pub mod retry;
pub mod upstream;
pub mod validator;

// Cache
pub use cache::{BreedCache, CacheSnapshot, CacheStatus};

// Configuration
pub use config::LoaderConfig;

// Domain models
pub use domain::{Breed, BreedName};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, ScriptedHttpClient,
};

// Loader
pub use loader::{BackgroundLoader, LoadReport, LoaderHandle};

// Pagination
pub use pagination::{NotReady, OutOfRange, PageResponse, PageWindow, PaginationView};

// Retry logic
pub use retry::{Backoff, RetryConfig, TRANSIENT_STATUSES};

// Upstream client
pub use upstream::{FetchFailure, PageFetch, UpstreamClient};
