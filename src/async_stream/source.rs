//! Async page sources.

use std::future::Future;
use std::pin::Pin;

use reqwest::{Client, Url};
use serde_json::Value;

use crate::config::PageConfig;
use crate::error::Error;
use crate::paginator::source::{Endpoint, check_status, decode_page, transport};

/// An owned, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An async source of pages.
///
/// Same contract as [`crate::PageSource`]: 1-based, strictly increasing page
/// numbers, the same number again on a retry, and an empty vector at the end
/// of the data. The returned future must not borrow the source.
///
/// Closures `Fn(u32) -> BoxFuture<'static, Result<Vec<Value>, Error>>` are
/// async page sources too.
pub trait AsyncPageSource {
    /// Fetches the raw elements of page `page`.
    fn fetch_page(&self, page: u32) -> BoxFuture<'static, Result<Vec<Value>, Error>>;
}

impl<F> AsyncPageSource for F
where
    F: Fn(u32) -> BoxFuture<'static, Result<Vec<Value>, Error>>,
{
    fn fetch_page(&self, page: u32) -> BoxFuture<'static, Result<Vec<Value>, Error>> {
        self(page)
    }
}

/// A non-blocking HTTP page source built on `reqwest::Client`.
///
/// Same request and decoding rules as [`crate::HttpSource`]. Requires a
/// tokio runtime.
#[derive(Debug, Clone)]
pub struct AsyncHttpSource {
    endpoint: Endpoint,
    client: Client,
}

impl AsyncHttpSource {
    /// Creates a source for `url` using the page parameter and timeout of
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a malformed URL and
    /// [`Error::Client`] if the HTTP client cannot be built.
    pub fn new(url: &str, config: &PageConfig) -> Result<Self, Error> {
        let endpoint = Endpoint::parse(url, config.page_param())?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { endpoint, client })
    }

    /// Creates a source that reuses an existing client.
    pub fn with_client(url: &str, page_param: &str, client: Client) -> Result<Self, Error> {
        Ok(Self {
            endpoint: Endpoint::parse(url, page_param)?,
            client,
        })
    }

    /// Returns the base URL.
    pub fn url(&self) -> &Url {
        self.endpoint.url()
    }
}

impl AsyncPageSource for AsyncHttpSource {
    fn fetch_page(&self, page: u32) -> BoxFuture<'static, Result<Vec<Value>, Error>> {
        let url = self.endpoint.page_url(page);
        let request = self.client.get(url.clone());

        Box::pin(async move {
            tracing::debug!(%url, page, "GET page");

            let response = request.send().await.map_err(|e| transport(page, e))?;
            check_status(page, response.status())?;

            let body = response.bytes().await.map_err(|e| transport(page, e))?;
            decode_page(page, &body)
        })
    }
}
