//! Async streaming support.
//!
//! - [`chunk_async`] - Fixed-size chunks from a `futures_io::AsyncRead`
//! - [`PageStream`] - Paginated records as a `futures_core::Stream`
//! - [`AsyncPageSource`] / [`AsyncHttpSource`] - Non-blocking page sources
//!
//! This module requires the `async` feature to be enabled.

mod pages;
mod source;
mod stream;

pub use pages::{PageStream, paginate_async};
pub use source::{AsyncHttpSource, AsyncPageSource, BoxFuture};
pub use stream::{ChunkStream, chunk_async};
