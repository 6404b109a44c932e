//! ReaderChunks - fixed-size chunking of a [`std::io::Read`] source.

use std::fmt;
use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

use bytes::BytesMut;

use crate::chunk::ByteChunk;
use crate::config::READ_BUF_SIZE;
use crate::error::Error;

/// An iterator that yields fixed-size chunks from a reader.
///
/// Each call to `next` reads until a full chunk is buffered or the reader is
/// exhausted, so at most one chunk is held in memory at a time. Chunk storage
/// grows with the bytes actually read, not with the configured size.
///
/// A read error is yielded once and ends the iteration. Bytes of the
/// partially filled chunk are discarded in that case.
///
/// # Example
///
/// ```
/// use pagewise::{ChunkConfig, Chunker};
/// use std::io::Cursor;
///
/// let chunker = Chunker::new(ChunkConfig::new(2)?)?;
/// let mut iter = chunker.chunk_reader(Cursor::new(b"abcde"));
///
/// while let Some(result) = iter.next() {
///     let chunk = result?;
///     println!("chunk @ {}: {} bytes", chunk.offset, chunk.len());
/// }
/// # Ok::<(), pagewise::Error>(())
/// ```
pub struct ReaderChunks<R> {
    reader: R,
    scratch: Box<[u8]>,
    size: usize,
    offset: u64,
    finished: bool,
}

impl<R: Read> ReaderChunks<R> {
    pub(crate) fn new(reader: R, size: usize) -> Self {
        debug_assert!(size > 0);
        Self {
            reader,
            scratch: vec![0u8; READ_BUF_SIZE].into_boxed_slice(),
            size,
            offset: 0,
            finished: false,
        }
    }

    /// Returns the byte offset of the next chunk.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Consumes the iterator, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: fmt::Debug> fmt::Debug for ReaderChunks<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderChunks")
            .field("reader", &self.reader)
            .field("size", &self.size)
            .field("offset", &self.offset)
            .field("finished", &self.finished)
            .finish()
    }
}

impl<R: Read> Iterator for ReaderChunks<R> {
    type Item = Result<ByteChunk, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut buf = BytesMut::with_capacity(self.size.min(READ_BUF_SIZE));

        while buf.len() < self.size {
            let want = (self.size - buf.len()).min(self.scratch.len());
            match self.reader.read(&mut self.scratch[..want]) {
                Ok(0) => {
                    self.finished = true;
                    break;
                }
                Ok(n) => buf.extend_from_slice(&self.scratch[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }

        if buf.is_empty() {
            return None;
        }

        let len = buf.len();
        let chunk = ByteChunk::new(buf.freeze(), self.offset);
        self.offset += len as u64;
        Some(Ok(chunk))
    }
}

impl<R: Read> FusedIterator for ReaderChunks<R> {}
