//! Bounded retry of a single page fetch.

use serde_json::Value;

use crate::config::RetryPolicy;
use crate::error::Error;
use crate::paginator::PageSource;

/// Fetches `page`, retrying retryable failures per `policy`.
///
/// Blocks the calling thread during backoff. The page number never changes
/// between attempts.
pub(crate) fn fetch_with_retry<S: PageSource>(
    source: &mut S,
    page: u32,
    policy: &RetryPolicy,
) -> Result<Vec<Value>, Error> {
    let mut attempt = 1;

    loop {
        tracing::debug!(page, attempt, "fetching page");

        match source.fetch_page(page) {
            Ok(items) => return Ok(items),
            Err(e) if e.is_retryable() && attempt < policy.max_attempts() => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(page, attempt, ?delay, error = %e, "page fetch failed, retrying");
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => {
                tracing::debug!(page, attempt, error = %e, "page fetch failed");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use serde_json::json;
    use std::time::Duration;

    fn quick(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(1), Duration::from_millis(2)).unwrap()
    }

    #[test]
    fn test_recovers_after_transient_failures() {
        let mut calls = 0;
        let mut source = |page: u32| -> Result<Vec<Value>, Error> {
            calls += 1;
            if calls < 3 {
                Err(Error::fetch(page, FetchErrorKind::Status(503)))
            } else {
                Ok(vec![json!({ "body": "ok" })])
            }
        };

        let items = fetch_with_retry(&mut source, 1, &quick(3)).unwrap();
        assert_eq!(items.len(), 1);
        drop(source);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let mut calls = 0;
        let mut source = |page: u32| -> Result<Vec<Value>, Error> {
            calls += 1;
            Err(Error::fetch(page, FetchErrorKind::Status(500)))
        };

        let err = fetch_with_retry(&mut source, 2, &quick(4)).unwrap_err();
        assert!(matches!(err, Error::FetchFailure { page: 2, .. }));
        drop(source);
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_does_not_retry_permanent_failures() {
        let mut calls = 0;
        let mut source = |page: u32| -> Result<Vec<Value>, Error> {
            calls += 1;
            Err(Error::fetch(page, FetchErrorKind::Status(404)))
        };

        assert!(fetch_with_retry(&mut source, 1, &quick(5)).is_err());
        drop(source);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_same_page_on_every_attempt() {
        let mut seen = Vec::new();
        let mut source = |page: u32| -> Result<Vec<Value>, Error> {
            seen.push(page);
            Err(Error::fetch(page, FetchErrorKind::Status(502)))
        };

        let _ = fetch_with_retry(&mut source, 7, &quick(3));
        drop(source);
        assert_eq!(seen, vec![7, 7, 7]);
    }
}
