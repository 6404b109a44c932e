//! Chunk types.
//!
//! - [`Chunk`] - Borrowed sub-slice of an in-memory sequence
//! - [`ByteChunk`] - Owned run of bytes read from a stream

mod data;
mod slice;

pub use data::ByteChunk;
pub use slice::Chunk;
