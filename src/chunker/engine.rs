//! Core chunking engine - Chunker and SliceChunks.
//!
//! - [`Chunker`] - Holds a validated [`ChunkConfig`] and starts chunking passes
//! - [`SliceChunks`] - Lazy iterator of fixed-size windows over a slice
//! - [`chunk_list`] - One-shot convenience over a slice
//!
//! # Example
//!
//! ```
//! use pagewise::{ChunkConfig, Chunker};
//!
//! let data: Vec<u32> = (0..10).collect();
//! let chunker = Chunker::new(ChunkConfig::new(3)?)?;
//!
//! let chunks: Vec<Vec<u32>> = chunker.chunk_slice(&data).map(|c| c.to_vec()).collect();
//! assert_eq!(chunks, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8], vec![9]]);
//! # Ok::<(), pagewise::Error>(())
//! ```

use std::io::Read;
use std::iter::FusedIterator;

use bytes::Bytes;

use crate::chunk::{ByteChunk, Chunk};
use crate::chunker::iter::ReaderChunks;
use crate::config::ChunkConfig;
use crate::error::Error;

/// Splits sequences into fixed-size chunks.
///
/// `Chunker` holds no state besides its configuration, so every call starts
/// a fresh, independent pass.
///
/// # Example
///
/// ```
/// use pagewise::{ChunkConfig, Chunker};
///
/// let chunker = Chunker::new(ChunkConfig::new(4)?)?;
/// let words = ["a", "b", "c", "d", "e"];
///
/// let sizes: Vec<usize> = chunker.chunk_slice(&words).map(|c| c.len()).collect();
/// assert_eq!(sizes, vec![4, 1]);
/// # Ok::<(), pagewise::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Creates a new chunker with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the configuration does not
    /// validate (zero chunk size).
    pub fn new(config: ChunkConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Lazily splits `data` into chunks of `chunk_size` elements.
    ///
    /// The last chunk may be shorter; an empty slice yields no chunks.
    pub fn chunk_slice<'a, T>(&self, data: &'a [T]) -> SliceChunks<'a, T> {
        tracing::trace!(
            len = data.len(),
            chunk_size = self.config.chunk_size(),
            "chunking slice"
        );
        SliceChunks::new(data, self.config.chunk_size())
    }

    /// Creates a chunking iterator from a reader.
    ///
    /// The iterator reads lazily and yields [`ByteChunk`]s of exactly
    /// `chunk_size` bytes, except the last one.
    ///
    /// # Example
    ///
    /// ```
    /// use pagewise::{ChunkConfig, Chunker};
    /// use std::io::Cursor;
    ///
    /// let chunker = Chunker::new(ChunkConfig::new(4)?)?;
    /// let chunks: Vec<_> = chunker
    ///     .chunk_reader(Cursor::new(b"hello world"))
    ///     .collect::<Result<_, _>>()?;
    ///
    /// assert_eq!(chunks.len(), 3);
    /// assert_eq!(&chunks[2].data[..], b"rld");
    /// # Ok::<(), pagewise::Error>(())
    /// ```
    pub fn chunk_reader<R: Read>(&self, reader: R) -> ReaderChunks<R> {
        tracing::trace!(chunk_size = self.config.chunk_size(), "chunking reader");
        ReaderChunks::new(reader, self.config.chunk_size())
    }

    /// Chunks an in-memory buffer.
    ///
    /// Chunk data is sliced from `data` without copying.
    ///
    /// # Example
    ///
    /// ```
    /// use pagewise::{ChunkConfig, Chunker};
    ///
    /// let chunker = Chunker::new(ChunkConfig::new(5)?)?;
    /// let chunks = chunker.chunk_bytes(&b"hello world"[..]);
    ///
    /// assert_eq!(chunks.len(), 3);
    /// assert_eq!(chunks[1].offset, 5);
    /// # Ok::<(), pagewise::Error>(())
    /// ```
    pub fn chunk_bytes(&self, data: impl Into<Bytes>) -> Vec<ByteChunk> {
        let data = data.into();
        let size = self.config.chunk_size();

        (0..data.len())
            .step_by(size)
            .map(|start| {
                let end = (start + size).min(data.len());
                ByteChunk::new(data.slice(start..end), start as u64)
            })
            .collect()
    }

    /// Returns the configuration used by this chunker.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            config: ChunkConfig::default(),
        }
    }
}

/// Lazily splits `data` into chunks of `chunk_size` elements.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `chunk_size` is zero.
///
/// # Example
///
/// ```
/// use pagewise::chunk_list;
///
/// let data: Vec<i32> = (0..10).collect();
/// let chunks: Vec<&[i32]> = chunk_list(&data, 3)?.map(|c| c.as_slice()).collect();
///
/// assert_eq!(chunks, vec![&[0, 1, 2][..], &[3, 4, 5], &[6, 7, 8], &[9]]);
/// assert!(chunk_list(&data, 0).is_err());
/// # Ok::<(), pagewise::Error>(())
/// ```
pub fn chunk_list<T>(data: &[T], chunk_size: usize) -> Result<SliceChunks<'_, T>, Error> {
    let chunker = Chunker::new(ChunkConfig::new(chunk_size)?)?;
    Ok(chunker.chunk_slice(data))
}

/// An iterator over fixed-size, non-overlapping windows of a slice.
///
/// Yields [`Chunk`]s front to back (or back to front). Every chunk starts at
/// a multiple of the chunk size in the original slice.
#[derive(Debug)]
pub struct SliceChunks<'a, T> {
    rest: &'a [T],
    offset: usize,
    size: usize,
}

impl<'a, T> SliceChunks<'a, T> {
    fn new(data: &'a [T], size: usize) -> Self {
        debug_assert!(size > 0);
        Self {
            rest: data,
            offset: 0,
            size,
        }
    }

    /// Returns the elements not yet yielded.
    pub fn remainder(&self) -> &'a [T] {
        self.rest
    }
}

impl<T> Clone for SliceChunks<'_, T> {
    fn clone(&self) -> Self {
        Self {
            rest: self.rest,
            offset: self.offset,
            size: self.size,
        }
    }
}

impl<'a, T> Iterator for SliceChunks<'a, T> {
    type Item = Chunk<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let len = self.size.min(self.rest.len());
        let (head, tail) = self.rest.split_at(len);
        let chunk = Chunk::new(head, self.offset, self.offset / self.size);

        self.rest = tail;
        self.offset += len;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rest.len().div_ceil(self.size);
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for SliceChunks<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let len = match self.rest.len() % self.size {
            0 => self.size,
            short => short,
        };
        let (head, tail) = self.rest.split_at(self.rest.len() - len);
        let offset = self.offset + head.len();

        self.rest = head;
        Some(Chunk::new(tail, offset, offset / self.size))
    }
}

impl<T> ExactSizeIterator for SliceChunks<'_, T> {}

impl<T> FusedIterator for SliceChunks<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(data: &[u32], size: usize) -> Vec<Vec<u32>> {
        chunk_list(data, size).unwrap().map(|c| c.to_vec()).collect()
    }

    #[test]
    fn test_chunk_ten_by_three() {
        let data: Vec<u32> = (0..10).collect();
        assert_eq!(
            collect(&data, 3),
            vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8], vec![9]]
        );
    }

    #[test]
    fn test_exact_multiple() {
        let data: Vec<u32> = (0..6).collect();
        assert_eq!(collect(&data, 3), vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn test_empty_input() {
        let data: [u32; 0] = [];
        assert!(collect(&data, 3).is_empty());
    }

    #[test]
    fn test_size_larger_than_input() {
        assert_eq!(collect(&[1, 2], 10), vec![vec![1, 2]]);
    }

    #[test]
    fn test_zero_size_rejected() {
        let result = chunk_list(&[1, 2, 3], 0);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_chunker_rejects_unvalidated_config() {
        let config = ChunkConfig::default().with_chunk_size(0);
        assert!(Chunker::new(config).is_err());
    }

    #[test]
    fn test_offsets_and_indices() {
        let data: Vec<u32> = (0..7).collect();
        let chunks: Vec<_> = chunk_list(&data, 3).unwrap().collect();
        let meta: Vec<(usize, usize)> = chunks.iter().map(|c| (c.index(), c.offset())).collect();
        assert_eq!(meta, vec![(0, 0), (1, 3), (2, 6)]);
    }

    #[test]
    fn test_exact_size() {
        let data: Vec<u32> = (0..10).collect();
        let mut iter = chunk_list(&data, 3).unwrap();
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
    }

    #[test]
    fn test_reverse() {
        let data: Vec<u32> = (0..10).collect();
        let chunks: Vec<_> = chunk_list(&data, 3).unwrap().rev().collect();
        let expected: Vec<_> = chunk_list(&data, 3).unwrap().collect::<Vec<_>>();
        let expected: Vec<_> = expected.into_iter().rev().collect();
        assert_eq!(chunks, expected);
        assert_eq!(chunks[0].as_slice(), &[9]);
        assert_eq!(chunks[0].index(), 3);
    }

    #[test]
    fn test_mixed_ends_meet() {
        let data: Vec<u32> = (0..10).collect();
        let mut iter = chunk_list(&data, 3).unwrap();
        assert_eq!(iter.next().unwrap().as_slice(), &[0, 1, 2]);
        assert_eq!(iter.next_back().unwrap().as_slice(), &[9]);
        assert_eq!(iter.next_back().unwrap().as_slice(), &[6, 7, 8]);
        assert_eq!(iter.next().unwrap().as_slice(), &[3, 4, 5]);
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());
    }

    #[test]
    fn test_fresh_pass_per_call() {
        let data: Vec<u32> = (0..5).collect();
        let chunker = Chunker::new(ChunkConfig::new(2).unwrap()).unwrap();
        let first: Vec<_> = chunker.chunk_slice(&data).collect();
        let second: Vec<_> = chunker.chunk_slice(&data).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_remainder() {
        let data = [1, 2, 3, 4, 5];
        let mut iter = chunk_list(&data, 2).unwrap();
        iter.next();
        assert_eq!(iter.remainder(), &[3, 4, 5]);
    }

    #[test]
    fn test_chunk_bytes() {
        let chunker = Chunker::new(ChunkConfig::new(4).unwrap()).unwrap();
        let chunks = chunker.chunk_bytes(&b"0123456789"[..]);

        assert_eq!(chunks.len(), 3);
        assert_eq!(&chunks[0].data[..], b"0123");
        assert_eq!(&chunks[2].data[..], b"89");

        let mut expected_offset = 0u64;
        for chunk in &chunks {
            assert_eq!(chunk.offset, expected_offset);
            expected_offset += chunk.len() as u64;
        }
    }

    #[test]
    fn test_chunk_bytes_empty() {
        let chunker = Chunker::default();
        assert!(chunker.chunk_bytes(Bytes::new()).is_empty());
    }
}
