//! pagewise
//!
//! Lazy, pull-based sequences for two small jobs:
//!
//! - **chunking**: split a slice (or a byte stream) into fixed-size chunks
//! - **pagination**: pull records out of a paged JSON API, one page at a time
//!
//! Both are plain iterators. Nothing is computed or fetched before it is
//! asked for, and dropping an iterator half-way is always fine.
//!
//! The crate intentionally:
//! - does NOT fetch pages concurrently
//! - does NOT cache or persist anything
//! - does NOT hide failures (a failed page ends the iteration)
//!
//! # Chunking
//!
//! ```
//! use pagewise::chunk_list;
//!
//! let data: Vec<u32> = (0..10).collect();
//! for chunk in chunk_list(&data, 3)? {
//!     println!("{:?}", chunk.as_slice());
//! }
//! // [0, 1, 2]
//! // [3, 4, 5]
//! // [6, 7, 8]
//! // [9]
//! # Ok::<(), pagewise::Error>(())
//! ```
//!
//! # Pagination
//!
//! ```no_run
//! use pagewise::{PageConfig, paginate_with};
//!
//! let config = PageConfig::new(3)?;
//! for body in paginate_with("https://jsonplaceholder.typicode.com/posts", config)?.records() {
//!     println!("{}", body?);
//! }
//! # Ok::<(), pagewise::Error>(())
//! ```
//!
//! # Async (feature = "async")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use pagewise::{PageConfig, paginate_async};
//!
//! async fn demo() -> Result<(), pagewise::Error> {
//!     let mut records = paginate_async("https://example.com/posts", PageConfig::default())?.into_stream();
//!
//!     while let Some(record) = records.next().await {
//!         println!("{}", record?);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chunk;
mod chunker;
mod config;
mod error;
mod paginator;

#[cfg(feature = "async")]
mod async_stream;

//
// Public surface
//

pub use chunk::{ByteChunk, Chunk};
pub use chunker::{Chunker, ReaderChunks, SliceChunks, chunk_list};
pub use config::{
    ChunkConfig, DEFAULT_CHUNK_SIZE, DEFAULT_EXTRACT_KEY, DEFAULT_MAX_PAGES, DEFAULT_PAGE_PARAM,
    PageConfig, RetryPolicy,
};
pub use error::{Error, FetchErrorKind};
pub use paginator::{
    HttpSource, Page, PageSource, Pages, Paginator, Records, paginate, paginate_with,
};

#[cfg(feature = "async")]
pub use async_stream::{
    AsyncHttpSource, AsyncPageSource, BoxFuture, ChunkStream, PageStream, chunk_async,
    paginate_async,
};
