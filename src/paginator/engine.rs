//! Page-driven record iteration - Paginator, Pages and Records.
//!
//! Pages are requested one at a time with page numbers 1, 2, ... up to and
//! including `max_pages`. Iteration ends at the first empty page, after
//! `max_pages` pages, or at the first failure.
//!
//! # Example
//!
//! ```no_run
//! use pagewise::paginate;
//!
//! for record in paginate("https://jsonplaceholder.typicode.com/posts")?.records() {
//!     println!("{}", record?);
//! }
//! # Ok::<(), pagewise::Error>(())
//! ```

use std::iter::{Enumerate, FusedIterator};
use std::vec;

use serde_json::Value;

use crate::config::PageConfig;
use crate::error::Error;
use crate::paginator::PageSource;
use crate::paginator::retry::fetch_with_retry;
use crate::paginator::source::{HttpSource, extract_record};

/// One non-empty page of extracted records.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,

    /// Values of the extraction key, in response order.
    pub records: Vec<Value>,
}

impl Page {
    /// Returns the number of records on the page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the page holds no records.
    ///
    /// Pages yielded by [`Pages`] are never empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Lazy, bounded, page-driven retrieval from a [`PageSource`].
///
/// Nothing is fetched until [`Paginator::records`] or [`Paginator::pages`]
/// is iterated.
///
/// # Example
///
/// ```
/// use pagewise::{Error, PageConfig, Paginator};
/// use serde_json::{Value, json};
///
/// // Always has more data; the ceiling stops it.
/// let source = |page: u32| -> Result<Vec<Value>, Error> {
///     Ok(vec![json!({ "body": page * 10 }), json!({ "body": page * 10 + 1 })])
/// };
///
/// let paginator = Paginator::new(source, PageConfig::new(3)?)?;
/// let records: Vec<Value> = paginator.records().collect::<Result<_, _>>()?;
///
/// assert_eq!(records, vec![json!(10), json!(11), json!(20), json!(21), json!(30), json!(31)]);
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Paginator<S> {
    source: S,
    config: PageConfig,
}

impl<S> Paginator<S> {
    /// Creates a paginator over `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `config` does not validate.
    pub fn new(source: S, config: PageConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { source, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Returns the page source.
    pub fn source(&self) -> &S {
        &self.source
    }

    #[cfg(feature = "async")]
    pub(crate) fn into_parts(self) -> (S, PageConfig) {
        (self.source, self.config)
    }
}

impl<S: PageSource> Paginator<S> {
    /// Returns a lazy iterator over individual records.
    ///
    /// Records of the current page are drained before the next page is
    /// requested.
    pub fn records(self) -> Records<S> {
        Records {
            cursor: PageCursor::new(self.source, self.config),
            current: None,
        }
    }

    /// Returns a lazy iterator over whole pages.
    pub fn pages(self) -> Pages<S> {
        Pages {
            cursor: PageCursor::new(self.source, self.config),
        }
    }
}

impl<S: PageSource> IntoIterator for Paginator<S> {
    type Item = Result<Value, Error>;
    type IntoIter = Records<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.records()
    }
}

/// Paginates `url` over HTTP with the default [`PageConfig`].
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for a malformed URL and
/// [`Error::Client`] if the HTTP client cannot be built.
pub fn paginate(url: &str) -> Result<Paginator<HttpSource>, Error> {
    paginate_with(url, PageConfig::default())
}

/// Paginates `url` over HTTP with `config`.
///
/// # Example
///
/// ```no_run
/// use pagewise::{PageConfig, paginate_with};
///
/// let config = PageConfig::new(3)?.with_extract_key("title");
/// let titles: Vec<_> = paginate_with("https://example.com/posts", config)?
///     .records()
///     .collect::<Result<_, _>>()?;
/// # Ok::<(), pagewise::Error>(())
/// ```
pub fn paginate_with(url: &str, config: PageConfig) -> Result<Paginator<HttpSource>, Error> {
    config.validate()?;
    let source = HttpSource::new(url, &config)?;
    Paginator::new(source, config)
}

/// Page counter plus the source it drives.
#[derive(Debug)]
struct PageCursor<S> {
    source: S,
    config: PageConfig,
    next_page: u32,
    finished: bool,
}

impl<S: PageSource> PageCursor<S> {
    fn new(source: S, config: PageConfig) -> Self {
        Self {
            source,
            config,
            next_page: 1,
            finished: false,
        }
    }

    /// Fetches the next non-empty page of raw elements.
    ///
    /// Returns `None` once the ceiling is passed or an empty page arrives.
    fn fetch_next(&mut self) -> Option<Result<(u32, Vec<Value>), Error>> {
        if self.finished {
            return None;
        }

        if self.next_page > self.config.max_pages() {
            tracing::debug!(max_pages = self.config.max_pages(), "page ceiling reached");
            self.finished = true;
            return None;
        }

        let page = self.next_page;
        match fetch_with_retry(&mut self.source, page, self.config.retry()) {
            Ok(items) if items.is_empty() => {
                tracing::debug!(page, "empty page, no more data");
                self.finished = true;
                None
            }
            Ok(items) => {
                tracing::debug!(page, records = items.len(), "page fetched");
                match page.checked_add(1) {
                    Some(next) => self.next_page = next,
                    // No page number beyond u32::MAX, so this is the ceiling.
                    None => self.finished = true,
                }
                Some(Ok((page, items)))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }

    fn fail(&mut self, e: Error) -> Option<Result<Value, Error>> {
        self.finished = true;
        Some(Err(e))
    }
}

/// Iterator over the records of successive pages.
///
/// Yields `Err` at most once; the iterator is exhausted afterwards.
#[derive(Debug)]
pub struct Records<S> {
    cursor: PageCursor<S>,
    current: Option<(u32, Enumerate<vec::IntoIter<Value>>)>,
}

impl<S> Records<S> {
    /// Returns the number of the page the next fetch would request.
    pub fn next_page(&self) -> u32 {
        self.cursor.next_page
    }
}

impl<S: PageSource> Iterator for Records<S> {
    type Item = Result<Value, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((page, items)) = &mut self.current {
                let page = *page;
                if let Some((index, item)) = items.next() {
                    return match extract_record(page, index, item, self.cursor.config.extract_key()) {
                        Ok(record) => Some(Ok(record)),
                        Err(e) => {
                            self.current = None;
                            self.cursor.fail(e)
                        }
                    };
                }
                self.current = None;
            }

            match self.cursor.fetch_next()? {
                Ok((page, items)) => self.current = Some((page, items.into_iter().enumerate())),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<S: PageSource> FusedIterator for Records<S> {}

/// Iterator over whole pages.
///
/// Every record of a page is extracted before the page is yielded, so a
/// missing field fails the page as a whole.
#[derive(Debug)]
pub struct Pages<S> {
    cursor: PageCursor<S>,
}

impl<S> Pages<S> {
    /// Returns the number of the page the next call would request.
    pub fn next_page(&self) -> u32 {
        self.cursor.next_page
    }
}

impl<S: PageSource> Iterator for Pages<S> {
    type Item = Result<Page, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let (number, items) = match self.cursor.fetch_next()? {
            Ok(fetched) => fetched,
            Err(e) => return Some(Err(e)),
        };

        let key = self.cursor.config.extract_key();
        let records: Result<Vec<Value>, Error> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| extract_record(number, index, item, key))
            .collect();

        match records {
            Ok(records) => Some(Ok(Page { number, records })),
            Err(e) => {
                self.cursor.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: PageSource> FusedIterator for Pages<S> {}
