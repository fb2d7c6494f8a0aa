//! Command-line options for the kennel server.
//!
//! # Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--upstream-url` | required | Base URL of the paginated breed catalog |
//! | `--bind` | `127.0.0.1:8000` | Address the HTTP API listens on |
//! | `--items-per-page` | `10` | Records per client page |
//! | `--log-dir` | `logs` | Root of the dated log folders |
//! | `--cors-origin` | `http://localhost:5173` | Frontend origin allowed by CORS |
//! | `--request-timeout-ms` | `5000` | Per-attempt upstream timeout |
//! | `--max-attempts` | `5` | Attempts per upstream page |
//!
//! # Examples
//!
//! ```bash
//! kennel --upstream-url https://catalog.example/breeds
//!
//! kennel --upstream-url https://catalog.example/breeds --bind 0.0.0.0:8000 --items-per-page 20
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use kennel_core::{LoaderConfig, RetryConfig, ValidationError};

/// Breed catalog cache with a paginated JSON API.
///
/// Loads the whole upstream catalog in the background at startup and
/// serves pages from memory while loading continues.
#[derive(Debug, Parser)]
#[command(
    name = "kennel",
    author,
    version,
    about = "Breed catalog cache with a paginated JSON API"
)]
pub struct Cli {
    /// Base URL of the upstream catalog; pages are requested as `?page=N`.
    #[arg(long)]
    pub upstream_url: String,

    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Records per client-facing page.
    #[arg(long, default_value_t = kennel_core::config::DEFAULT_ITEMS_PER_PAGE.get())]
    pub items_per_page: usize,

    /// Root directory; each run logs into a `YYYY-MM-DD` folder below it.
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Origin allowed to call the API from a browser.
    #[arg(long, default_value = "http://localhost:5173")]
    pub cors_origin: String,

    /// Timeout for a single upstream attempt, in milliseconds.
    #[arg(long, default_value_t = 5_000)]
    pub request_timeout_ms: u64,

    /// Attempts per upstream page before it is skipped.
    #[arg(long, default_value_t = 5)]
    pub max_attempts: u32,
}

impl Cli {
    /// Map the options onto a validated loader configuration.
    pub fn loader_config(&self) -> Result<LoaderConfig, ValidationError> {
        let retry = RetryConfig {
            max_attempts: self.max_attempts,
            ..RetryConfig::default()
        };

        LoaderConfig::parse(&self.upstream_url)?
            .with_items_per_page(self.items_per_page)?
            .with_request_timeout(Duration::from_millis(self.request_timeout_ms))?
            .with_retry(retry)
    }
}
