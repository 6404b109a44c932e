//! Page sources - where pages come from.
//!
//! - [`PageSource`] - Blocking source of raw page elements
//! - [`HttpSource`] - `GET {url}?{page_param}={n}` returning a JSON array

use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::PageConfig;
use crate::error::{Error, FetchErrorKind};

/// A blocking source of pages.
///
/// `fetch_page` is called with 1-based, strictly increasing page numbers. A
/// retry of the same page may call it again with the same number. An empty
/// vector means there is no more data.
///
/// Closures `FnMut(u32) -> Result<Vec<Value>, Error>` are page sources too,
/// which keeps stubs in tests short:
///
/// ```
/// use pagewise::{PageConfig, Paginator};
/// use serde_json::json;
///
/// let source = |page: u32| -> Result<_, pagewise::Error> {
///     Ok(if page <= 2 { vec![json!({ "body": page })] } else { vec![] })
/// };
///
/// let records: Vec<_> = Paginator::new(source, PageConfig::default())?
///     .records()
///     .collect::<Result<_, _>>()?;
/// assert_eq!(records, vec![json!(1), json!(2)]);
/// # Ok::<(), pagewise::Error>(())
/// ```
pub trait PageSource {
    /// Fetches the raw elements of page `page`.
    fn fetch_page(&mut self, page: u32) -> Result<Vec<Value>, Error>;
}

impl<F> PageSource for F
where
    F: FnMut(u32) -> Result<Vec<Value>, Error>,
{
    fn fetch_page(&mut self, page: u32) -> Result<Vec<Value>, Error> {
        self(page)
    }
}

/// Base URL plus the name of the page query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint {
    url: Url,
    page_param: String,
}

impl Endpoint {
    pub(crate) fn parse(url: &str, page_param: &str) -> Result<Self, Error> {
        let url = Url::parse(url).map_err(|_| Error::InvalidArgument {
            message: "base url is not a valid absolute URL",
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidArgument {
                message: "base url must use http or https",
            });
        }

        Ok(Self {
            url,
            page_param: page_param.to_string(),
        })
    }

    pub(crate) fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the URL for page `page`, keeping any query the base URL had.
    pub(crate) fn page_url(&self, page: u32) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair(&self.page_param, &page.to_string());
        url
    }
}

/// Wraps anything that interrupted the exchange before a full body arrived.
pub(crate) fn transport(page: u32, e: reqwest::Error) -> Error {
    Error::fetch(page, FetchErrorKind::Transport(Box::new(e)))
}

/// Checks the status line of a page response.
pub(crate) fn check_status(page: u32, status: reqwest::StatusCode) -> Result<(), Error> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::fetch(page, FetchErrorKind::Status(status.as_u16())))
    }
}

/// Decodes a page body, which must be a JSON array.
pub(crate) fn decode_page(page: u32, body: &[u8]) -> Result<Vec<Value>, Error> {
    serde_json::from_slice::<Vec<Value>>(body)
        .map_err(|e| Error::fetch(page, FetchErrorKind::Decode(e.to_string())))
}

/// Takes `key` out of one page element.
pub(crate) fn extract_record(page: u32, index: usize, item: Value, key: &str) -> Result<Value, Error> {
    let missing = || {
        Error::fetch(
            page,
            FetchErrorKind::MissingField {
                key: key.to_string(),
                index,
            },
        )
    };

    match item {
        Value::Object(mut map) => map.remove(key).ok_or_else(missing),
        _ => Err(missing()),
    }
}

/// A blocking HTTP page source.
///
/// Requests `GET {url}?{page_param}={page}` and expects a JSON array body.
/// Non-2xx answers and malformed bodies become [`Error::FetchFailure`]. The
/// client applies the configured per-request timeout.
///
/// Must not be used from inside an async runtime; use `AsyncHttpSource`
/// (feature `async`) there.
#[derive(Debug, Clone)]
pub struct HttpSource {
    endpoint: Endpoint,
    client: Client,
}

impl HttpSource {
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
    ///
    /// The client's own timeout settings apply.
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

impl PageSource for HttpSource {
    fn fetch_page(&mut self, page: u32) -> Result<Vec<Value>, Error> {
        let url = self.endpoint.page_url(page);
        tracing::debug!(%url, page, "GET page");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| transport(page, e))?;
        check_status(page, response.status())?;

        let body = response.bytes().map_err(|e| transport(page, e))?;
        decode_page(page, &body)
    }
}
