//! PageStream - the record sequence of a paginator as a `Stream`.

use std::fmt;
use std::future::Future;
use std::iter::Enumerate;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use std::vec;

use futures_core::Stream;
use futures_core::stream::FusedStream;
use serde_json::Value;

use crate::async_stream::source::{AsyncHttpSource, AsyncPageSource, BoxFuture};
use crate::config::PageConfig;
use crate::error::Error;
use crate::paginator::Paginator;
use crate::paginator::source::extract_record;

enum State {
    /// Ready to request `next_page`.
    Idle,
    Fetching {
        page: u32,
        attempt: u32,
        fetch: BoxFuture<'static, Result<Vec<Value>, Error>>,
    },
    Backoff {
        page: u32,
        attempt: u32,
        sleep: Pin<Box<tokio::time::Sleep>>,
    },
    Draining {
        page: u32,
        items: Enumerate<vec::IntoIter<Value>>,
        /// The page number space is exhausted; no fetch follows.
        last: bool,
    },
    Done,
}

/// A stream of records fetched page by page from an [`AsyncPageSource`].
///
/// Same termination and failure rules as [`crate::Records`]: at most one page
/// is in flight, records of a page are drained before the next request, and
/// an error is yielded once and ends the stream. Retry backoff sleeps on the
/// tokio timer.
pub struct PageStream<S> {
    source: S,
    config: PageConfig,
    next_page: u32,
    state: State,
}

impl<S> PageStream<S> {
    fn new(source: S, config: PageConfig) -> Self {
        Self {
            source,
            config,
            next_page: 1,
            state: State::Idle,
        }
    }

    /// Returns the number of the page the next fetch would request.
    pub fn next_page(&self) -> u32 {
        self.next_page
    }
}

impl<S: AsyncPageSource + Unpin> Stream for PageStream<S> {
    type Item = Result<Value, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            match &mut this.state {
                State::Done => return Poll::Ready(None),

                State::Idle => {
                    if this.next_page > this.config.max_pages() {
                        tracing::debug!(max_pages = this.config.max_pages(), "page ceiling reached");
                        this.state = State::Done;
                        continue;
                    }

                    let page = this.next_page;
                    tracing::debug!(page, attempt = 1, "fetching page");
                    this.state = State::Fetching {
                        page,
                        attempt: 1,
                        fetch: this.source.fetch_page(page),
                    };
                }

                State::Fetching {
                    page,
                    attempt,
                    fetch,
                } => {
                    let (page, attempt) = (*page, *attempt);
                    let result = ready!(fetch.as_mut().poll(cx));

                    match result {
                        Ok(items) if items.is_empty() => {
                            tracing::debug!(page, "empty page, no more data");
                            this.state = State::Done;
                        }
                        Ok(items) => {
                            tracing::debug!(page, records = items.len(), "page fetched");
                            let next = page.checked_add(1);
                            if let Some(next) = next {
                                this.next_page = next;
                            }
                            this.state = State::Draining {
                                page,
                                items: items.into_iter().enumerate(),
                                last: next.is_none(),
                            };
                        }
                        Err(e) if e.is_retryable() && attempt < this.config.retry().max_attempts() => {
                            let delay = this.config.retry().delay_for(attempt);
                            tracing::warn!(page, attempt, ?delay, error = %e, "page fetch failed, retrying");
                            this.state = State::Backoff {
                                page,
                                attempt,
                                sleep: Box::pin(tokio::time::sleep(delay)),
                            };
                        }
                        Err(e) => {
                            tracing::debug!(page, attempt, error = %e, "page fetch failed");
                            this.state = State::Done;
                            return Poll::Ready(Some(Err(e)));
                        }
                    }
                }

                State::Backoff {
                    page,
                    attempt,
                    sleep,
                } => {
                    let (page, attempt) = (*page, *attempt + 1);
                    ready!(sleep.as_mut().poll(cx));

                    tracing::debug!(page, attempt, "fetching page");
                    this.state = State::Fetching {
                        page,
                        attempt,
                        fetch: this.source.fetch_page(page),
                    };
                }

                State::Draining { page, items, last } => {
                    let (page, last) = (*page, *last);
                    match items.next() {
                        Some((index, item)) => {
                            let result = extract_record(page, index, item, this.config.extract_key());
                            if result.is_err() {
                                this.state = State::Done;
                            }
                            return Poll::Ready(Some(result));
                        }
                        None if last => this.state = State::Done,
                        None => this.state = State::Idle,
                    }
                }
            }
        }
    }
}

impl<S: AsyncPageSource + Unpin> FusedStream for PageStream<S> {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl<S: fmt::Debug> fmt::Debug for PageStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Idle => "idle",
            State::Fetching { .. } => "fetching",
            State::Backoff { .. } => "backoff",
            State::Draining { .. } => "draining",
            State::Done => "done",
        };
        f.debug_struct("PageStream")
            .field("source", &self.source)
            .field("config", &self.config)
            .field("next_page", &self.next_page)
            .field("state", &state)
            .finish()
    }
}

impl<S: AsyncPageSource> Paginator<S> {
    /// Returns the record sequence as a [`Stream`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// use futures_util::StreamExt;
    /// use pagewise::{PageConfig, paginate_async};
    ///
    /// let mut records = paginate_async("https://example.com/posts", PageConfig::new(3)?)?.into_stream();
    /// while let Some(record) = records.next().await {
    ///     println!("{}", record?);
    /// }
    /// ```
    pub fn into_stream(self) -> PageStream<S> {
        let (source, config) = self.into_parts();
        PageStream::new(source, config)
    }
}

/// Paginates `url` over non-blocking HTTP with `config`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for a malformed URL or configuration and
/// [`Error::Client`] if the HTTP client cannot be built.
pub fn paginate_async(url: &str, config: PageConfig) -> Result<Paginator<AsyncHttpSource>, Error> {
    config.validate()?;
    let source = AsyncHttpSource::new(url, &config)?;
    Paginator::new(source, config)
}
