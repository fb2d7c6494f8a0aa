use std::num::NonZeroUsize;
use std::time::Duration;

use url::Url;

use crate::retry::RetryConfig;
use crate::ValidationError;

/// Ten records per page.
pub const DEFAULT_ITEMS_PER_PAGE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(9);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(200);

/// Process-level settings for the upstream client, loader and pagination.
///
/// Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub base_url: Url,
    pub items_per_page: NonZeroUsize,
    pub request_timeout: Duration,
    pub retry: RetryConfig,
    /// Pause between successfully appended pages.
    pub throttle: Duration,
}

impl LoaderConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryConfig::default(),
            throttle: DEFAULT_THROTTLE,
        }
    }

    /// Parse the base URL and apply the default constants.
    pub fn parse(base_url: &str) -> Result<Self, ValidationError> {
        let url = Url::parse(base_url).map_err(|e| ValidationError::InvalidBaseUrl {
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidBaseUrl {
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(Self::new(url))
    }

    pub fn with_items_per_page(mut self, items_per_page: usize) -> Result<Self, ValidationError> {
        self.items_per_page = NonZeroUsize::new(items_per_page).ok_or(ValidationError::ZeroValue {
            field: "items_per_page",
        })?;
        Ok(self)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, ValidationError> {
        if timeout.is_zero() {
            return Err(ValidationError::ZeroValue {
                field: "request_timeout",
            });
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Result<Self, ValidationError> {
        if retry.max_attempts == 0 {
            return Err(ValidationError::ZeroValue {
                field: "max_attempts",
            });
        }
        self.retry = retry;
        Ok(self)
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// URL of one upstream page: `{base_url}?page={n}`.
    pub fn page_url(&self, page: u32) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_catalog_constants() {
        let config = LoaderConfig::parse("https://catalog.example/breeds").expect("valid url");

        assert_eq!(config.items_per_page.get(), 10);
        assert_eq!(DEFAULT_ITEMS_PER_PAGE.get(), 10);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.throttle, Duration::from_millis(200));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay_for_attempt(1), Duration::from_millis(500));
    }

    #[test]
    fn page_url_appends_page_query() {
        let config = LoaderConfig::parse("https://catalog.example/breeds").expect("valid url");
        assert_eq!(config.page_url(3), "https://catalog.example/breeds?page=3");

        let config =
            LoaderConfig::parse("https://catalog.example/breeds?lang=en").expect("valid url");
        assert_eq!(config.page_url(1), "https://catalog.example/breeds?lang=en&page=1");
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(matches!(
            LoaderConfig::parse("catalog"),
            Err(ValidationError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            LoaderConfig::parse("ftp://catalog.example/"),
            Err(ValidationError::InvalidBaseUrl { .. })
        ));

        let config = LoaderConfig::parse("https://catalog.example/").expect("valid url");
        assert_eq!(
            config.clone().with_items_per_page(0),
            Err(ValidationError::ZeroValue {
                field: "items_per_page"
            })
        );
        assert_eq!(
            config.with_retry(RetryConfig::linear(0, Duration::from_millis(1))),
            Err(ValidationError::ZeroValue {
                field: "max_attempts"
            })
        );
    }
}
