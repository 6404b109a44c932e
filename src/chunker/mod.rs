//! Fixed-size chunking of slices and byte streams.
//!
//! - [`Chunker`] - Validated entry point holding a [`crate::ChunkConfig`]
//! - [`SliceChunks`] - Lazy windows over an in-memory slice
//! - [`ReaderChunks`] - Lazy chunks read from a [`std::io::Read`]

mod engine;
mod iter;

pub use engine::{Chunker, SliceChunks, chunk_list};
pub use iter::ReaderChunks;
