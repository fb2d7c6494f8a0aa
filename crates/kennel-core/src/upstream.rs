//! Client for the paginated upstream breed catalog.
//!
//! One call to [`UpstreamClient::fetch_page`] covers every attempt for a
//! page. The outcome is always a [`PageFetch`] value; nothing is raised to
//! the caller.

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::LoaderConfig;
use crate::http_client::{HttpClient, HttpRequest};
use crate::retry::RetryConfig;

/// Why a page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Status outside the transient set; not retried.
    TerminalStatus { status: u16 },
    /// `200` with JSON that is not a list.
    MalformedBody { found: &'static str },
    /// The request could not be built or sent at all.
    Transport { message: String },
    /// Every attempt hit a transient status or transport error.
    Exhausted { attempts: u32, last_error: String },
}

impl Display for FetchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TerminalStatus { status } => write!(f, "non-retryable status {status}"),
            Self::MalformedBody { found } => write!(f, "expected a JSON list, got {found}"),
            Self::Transport { message } => write!(f, "request not sent: {message}"),
            Self::Exhausted {
                attempts,
                last_error,
            } => write!(f, "failed after {attempts} attempts ({last_error})"),
        }
    }
}

/// Outcome of fetching one upstream page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageFetch {
    /// Raw, unvalidated records. Empty means end-of-data.
    Records(Vec<Value>),
    Failed(FetchFailure),
}

impl PageFetch {
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Self::Records(records) if records.is_empty())
    }
}

/// Fetches single upstream pages with bounded retries.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Arc<dyn HttpClient>,
    config: LoaderConfig,
}

impl UpstreamClient {
    pub fn new(http: Arc<dyn HttpClient>, config: LoaderConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    fn retry(&self) -> &RetryConfig {
        &self.config.retry
    }

    /// Fetch raw records for `page` (1-based).
    pub async fn fetch_page(&self, page: u32) -> PageFetch {
        let url = self.config.page_url(page);
        let max_attempts = self.retry().max_attempts.max(1);
        let mut last_error = String::from("no attempt made");

        for attempt in 1..=max_attempts {
            debug!(page, attempt, max_attempts, %url, "fetching upstream page");

            let request = HttpRequest::get(url.as_str())
                .with_header("accept", "application/json")
                .with_timeout(self.config.request_timeout);

            match self.http.execute(request).await {
                Ok(response) if response.is_ok() => {
                    match serde_json::from_str::<Value>(&response.body) {
                        Ok(Value::Array(records)) => {
                            debug!(page, count = records.len(), "fetched upstream page");
                            return PageFetch::Records(records);
                        }
                        Ok(other) => {
                            let found = crate::error::json_kind(&other);
                            warn!(page, found, "unexpected JSON from upstream (not a list)");
                            return PageFetch::Failed(FetchFailure::MalformedBody { found });
                        }
                        Err(e) => {
                            error!(page, attempt, error = %e, "undecodable upstream body");
                            last_error = format!("undecodable body: {e}");
                        }
                    }
                }
                Ok(response) if self.retry().should_retry_status(response.status) => {
                    warn!(
                        page,
                        attempt,
                        max_attempts,
                        status = response.status,
                        "transient upstream status"
                    );
                    last_error = format!("status {}", response.status);
                }
                Ok(response) => {
                    error!(page, status = response.status, "non-retryable upstream status");
                    return PageFetch::Failed(FetchFailure::TerminalStatus {
                        status: response.status,
                    });
                }
                Err(e) if e.retryable() => {
                    error!(page, attempt, error = %e, "upstream transport error");
                    last_error = e.message().to_owned();
                }
                Err(e) => {
                    error!(page, error = %e, "upstream request cannot be sent");
                    return PageFetch::Failed(FetchFailure::Transport {
                        message: e.message().to_owned(),
                    });
                }
            }

            if attempt < max_attempts {
                self.backoff(attempt).await;
            }
        }

        error!(page, attempts = max_attempts, "upstream page failed after all attempts");
        PageFetch::Failed(FetchFailure::Exhausted {
            attempts: max_attempts,
            last_error,
        })
    }

    async fn backoff(&self, attempt: u32) {
        let delay: Duration = self.retry().delay_for_attempt(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
