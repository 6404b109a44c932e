//! Configuration for chunking and pagination.
//!
//! - [`ChunkConfig`] - Fixed chunk size
//! - [`PageConfig`] - Page ceiling, query parameter, extraction key, timeout
//! - [`RetryPolicy`] - Bounded exponential backoff for page fetches
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use pagewise::{ChunkConfig, PageConfig, RetryPolicy};
//!
//! let chunks = ChunkConfig::new(3)?;
//!
//! let pages = PageConfig::new(3)?
//!     .with_extract_key("title")
//!     .with_retry(RetryPolicy::new(5, Duration::from_millis(50), Duration::from_secs(2))?);
//! pages.validate()?;
//!
//! # Ok::<(), pagewise::Error>(())
//! ```

use std::time::Duration;

use crate::error::Error;

/// Default chunk size (elements for slices, bytes for readers).
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Default page ceiling.
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// Default name of the page number query parameter.
pub const DEFAULT_PAGE_PARAM: &str = "page";

/// Default field extracted from every page element.
pub const DEFAULT_EXTRACT_KEY: &str = "body";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of attempts per page.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);

/// Default upper bound on any single retry delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);

/// Size of the scratch buffer reader chunkers read through.
pub(crate) const READ_BUF_SIZE: usize = 8192;

/// Configuration for fixed-size chunking.
///
/// Every chunk except the last holds exactly `chunk_size` elements.
///
/// # Example
///
/// ```
/// use pagewise::ChunkConfig;
///
/// let config = ChunkConfig::new(3)?;
/// assert_eq!(config.chunk_size(), 3);
///
/// assert!(ChunkConfig::new(0).is_err());
/// # Ok::<(), pagewise::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkConfig {
    chunk_size: usize,
}

impl ChunkConfig {
    /// Creates a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Result<Self, Error> {
        if chunk_size == 0 {
            return Err(Error::InvalidArgument {
                message: "chunk size must be positive",
            });
        }

        Ok(Self { chunk_size })
    }

    /// Sets the chunk size.
    ///
    /// Note: This does not validate the configuration. Use [`ChunkConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Returns the chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), Error> {
        Self::new(self.chunk_size).map(|_| ())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Retry behavior for a single page fetch.
///
/// Only retryable failures (transport errors, 5xx, 429) are retried. The delay
/// before attempt `n + 1` is `base_delay * 2^(n - 1)`, capped at `max_delay`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pagewise::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.delay_for(1), Duration::from_millis(200));
/// assert_eq!(policy.delay_for(2), Duration::from_millis(400));
///
/// assert_eq!(RetryPolicy::none().max_attempts(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a new retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `max_attempts` is zero or
    /// `base_delay > max_delay`.
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Result<Self, Error> {
        if max_attempts == 0 {
            return Err(Error::InvalidArgument {
                message: "max_attempts must be at least 1",
            });
        }

        if base_delay > max_delay {
            return Err(Error::InvalidArgument {
                message: "base_delay cannot be greater than max_delay",
            });
        }

        Ok(Self {
            max_attempts,
            base_delay,
            max_delay,
        })
    }

    /// A policy that never retries.
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Sets the number of attempts per page (including the first).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the delay before the first retry.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the cap on any single delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Returns the number of attempts per page.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay before the first retry.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Returns the cap on any single delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Returns the delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << shift)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Validates the current policy.
    pub fn validate(&self) -> Result<(), Error> {
        Self::new(self.max_attempts, self.base_delay, self.max_delay).map(|_| ())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

/// Configuration for page-driven fetching.
///
/// - `max_pages` - Last page number requested (pages are 1-based)
/// - `page_param` - Query parameter carrying the page number
/// - `extract_key` - Field taken from every element of a page
/// - `timeout` - Per-request timeout of the HTTP client
/// - `retry` - Retry policy applied to each page fetch
///
/// # Example
///
/// ```
/// use pagewise::PageConfig;
///
/// let config = PageConfig::default();
/// assert_eq!(config.max_pages(), 5);
/// assert_eq!(config.extract_key(), "body");
/// assert_eq!(config.page_param(), "page");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageConfig {
    max_pages: u32,
    page_param: String,
    extract_key: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl PageConfig {
    /// Creates a new configuration with the given page ceiling and defaults
    /// for everything else.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `max_pages` is zero.
    pub fn new(max_pages: u32) -> Result<Self, Error> {
        let config = Self::default().with_max_pages(max_pages);
        config.validate()?;
        Ok(config)
    }

    /// Sets the page ceiling.
    ///
    /// Note: This does not validate the configuration. Use [`PageConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Sets the page number query parameter.
    pub fn with_page_param(mut self, param: impl Into<String>) -> Self {
        self.page_param = param.into();
        self
    }

    /// Sets the field extracted from every page element.
    pub fn with_extract_key(mut self, key: impl Into<String>) -> Self {
        self.extract_key = key.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the page ceiling.
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Returns the page number query parameter.
    pub fn page_param(&self) -> &str {
        &self.page_param
    }

    /// Returns the extraction key.
    pub fn extract_key(&self) -> &str {
        &self.extract_key
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_pages == 0 {
            return Err(Error::InvalidArgument {
                message: "max_pages must be at least 1",
            });
        }

        if self.page_param.is_empty() {
            return Err(Error::InvalidArgument {
                message: "page parameter name cannot be empty",
            });
        }

        if self.extract_key.is_empty() {
            return Err(Error::InvalidArgument {
                message: "extraction key cannot be empty",
            });
        }

        if self.timeout.is_zero() {
            return Err(Error::InvalidArgument {
                message: "timeout must be non-zero",
            });
        }

        self.retry.validate()
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            extract_key: DEFAULT_EXTRACT_KEY.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_config_default() {
        let config = ChunkConfig::default();
        assert_eq!(config.chunk_size(), DEFAULT_CHUNK_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chunk_config_zero_size() {
        let result = ChunkConfig::new(0);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_chunk_config_builder_does_not_validate() {
        let config = ChunkConfig::default().with_chunk_size(0);
        assert_eq!(config.chunk_size(), 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_page_config_default() {
        let config = PageConfig::default();
        assert_eq!(config.max_pages(), 5);
        assert_eq!(config.page_param(), "page");
        assert_eq!(config.extract_key(), "body");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(*config.retry(), RetryPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_page_config_invalid() {
        assert!(PageConfig::new(0).is_err());
        assert!(PageConfig::default().with_extract_key("").validate().is_err());
        assert!(PageConfig::default().with_page_param("").validate().is_err());
        assert!(
            PageConfig::default()
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(
            PageConfig::default()
                .with_retry(RetryPolicy::default().with_max_attempts(0))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_retry_policy_invalid() {
        assert!(RetryPolicy::new(0, Duration::ZERO, Duration::ZERO).is_err());
        assert!(RetryPolicy::new(3, Duration::from_secs(2), Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_retry_delay_doubles_and_caps() {
        let policy =
            RetryPolicy::new(10, Duration::from_millis(100), Duration::from_millis(500)).unwrap();
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(4), Duration::from_millis(500));
        assert_eq!(policy.delay_for(40), Duration::from_millis(500));
    }

    #[test]
    fn test_retry_none() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.delay_for(1), Duration::ZERO);
        assert!(policy.validate().is_ok());
    }
}
