//! Async stream adapter for fixed-size byte chunking.
//!
//! Uses the `futures-io::AsyncRead` trait, so it is runtime-agnostic and
//! works with tokio (via `tokio_util::compat`), async-std, smol and others.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use pagewise::{chunk_async, ChunkConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead>(reader: R) -> Result<(), pagewise::Error> {
//!     let stream = chunk_async(reader, ChunkConfig::new(4096)?)?;
//!     futures_util::pin_mut!(stream);
//!
//!     while let Some(chunk) = stream.next().await {
//!         let chunk = chunk?;
//!         println!("Chunk: {} bytes @ {}", chunk.len(), chunk.offset);
//!     }
//!     Ok(())
//! }
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::BytesMut;
use futures_core::Stream;
use futures_core::stream::FusedStream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::chunk::ByteChunk;
use crate::config::{ChunkConfig, READ_BUF_SIZE};
use crate::error::Error;

pin_project! {
    /// A stream that yields fixed-size chunks from an async reader.
    ///
    /// A partially filled chunk survives `Poll::Pending`; bytes are never
    /// lost between polls. Chunk storage grows with the bytes actually read.
    /// A read error is yielded once and ends the stream.
    pub struct ChunkStream<R> {
        #[pin]
        reader: R,
        buffer: BytesMut,
        scratch: Box<[u8]>,
        size: usize,
        offset: u64,
        finished: bool,
    }
}

impl<R> ChunkStream<R> {
    fn new(reader: R, size: usize) -> Self {
        Self {
            reader,
            buffer: BytesMut::new(),
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
}

impl<R: AsyncRead> Stream for ChunkStream<R> {
    type Item = Result<ByteChunk, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        while this.buffer.len() < *this.size {
            let want = (*this.size - this.buffer.len()).min(this.scratch.len());
            match this.reader.as_mut().poll_read(cx, &mut this.scratch[..want]) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(Error::Io(e))));
                }
                Poll::Ready(Ok(0)) => {
                    *this.finished = true;
                    break;
                }
                Poll::Ready(Ok(n)) => this.buffer.extend_from_slice(&this.scratch[..n]),
            }
        }

        if this.buffer.is_empty() {
            return Poll::Ready(None);
        }

        let data = this.buffer.split();
        let len = data.len();

        let chunk = ByteChunk::new(data.freeze(), *this.offset);
        *this.offset += len as u64;
        Poll::Ready(Some(Ok(chunk)))
    }
}

impl<R: AsyncRead> FusedStream for ChunkStream<R> {
    fn is_terminated(&self) -> bool {
        self.finished
    }
}

/// Creates a chunk stream from an async reader.
///
/// For tokio readers, convert with `tokio_util::compat`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use pagewise::{chunk_async, ChunkConfig};
///
/// let file = tokio::fs::File::open("data.bin").await?;
/// let stream = chunk_async(file.compat(), ChunkConfig::new(64 * 1024)?)?;
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `config` does not validate.
pub fn chunk_async<R: AsyncRead>(reader: R, config: ChunkConfig) -> Result<ChunkStream<R>, Error> {
    config.validate()?;
    tracing::trace!(chunk_size = config.chunk_size(), "chunking async reader");
    Ok(ChunkStream::new(reader, config.chunk_size()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_chunk_stream_empty() {
        let reader: &[u8] = &[];
        let stream = chunk_async(reader, ChunkConfig::default()).unwrap();
        let chunks: Vec<_> = stream.collect().await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_chunk_stream_fixed_sizes() {
        let data: Vec<u8> = (0..100).collect();
        let reader: &[u8] = &data;
        let stream = chunk_async(reader, ChunkConfig::new(32).unwrap()).unwrap();

        let chunks: Vec<_> = stream.collect().await;
        let chunks: Vec<ByteChunk> = chunks.into_iter().collect::<Result<_, _>>().unwrap();

        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![32, 32, 32, 4]);

        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.data.iter().copied()).collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn test_chunk_stream_offsets() {
        let data = vec![1u8; 10];
        let reader: &[u8] = &data;
        let stream = chunk_async(reader, ChunkConfig::new(4).unwrap()).unwrap();

        let chunks: Vec<_> = tokio_test::block_on(stream.collect::<Vec<_>>());
        let offsets: Vec<u64> = chunks.into_iter().map(|c| c.unwrap().offset).collect();
        assert_eq!(offsets, vec![0, 4, 8]);
    }

    /// Reader that returns `Pending` before every read and hands out at most
    /// `step` bytes per read.
    struct Stutter {
        data: Vec<u8>,
        pos: usize,
        step: usize,
        ready: bool,
    }

    impl AsyncRead for Stutter {
        fn poll_read(
            self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut [u8],
        ) -> Poll<std::io::Result<usize>> {
            let this = self.get_mut();
            if !this.ready {
                this.ready = true;
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            this.ready = false;

            let n = this.step.min(buf.len()).min(this.data.len() - this.pos);
            buf[..n].copy_from_slice(&this.data[this.pos..this.pos + n]);
            this.pos += n;
            Poll::Ready(Ok(n))
        }
    }

    #[tokio::test]
    async fn test_chunk_stream_keeps_partial_chunk_across_pending() {
        let data: Vec<u8> = (0..50).collect();
        let reader = Stutter {
            data: data.clone(),
            pos: 0,
            step: 3,
            ready: false,
        };
        let stream = chunk_async(reader, ChunkConfig::new(8).unwrap()).unwrap();

        let chunks: Vec<ByteChunk> = stream
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();

        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![8, 8, 8, 8, 8, 8, 2]);
        let offsets: Vec<u64> = chunks.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16, 24, 32, 40, 48]);

        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.data.iter().copied()).collect();
        assert_eq!(joined, data);
    }

    #[tokio::test]
    async fn test_chunk_stream_huge_chunk_size() {
        let reader: &[u8] = b"abc";
        let mut stream = chunk_async(reader, ChunkConfig::new(usize::MAX).unwrap()).unwrap();

        let chunk = stream.next().await.unwrap().unwrap();
        assert_eq!(&chunk.data[..], b"abc");
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn test_chunk_async_rejects_zero_size() {
        let reader: &[u8] = &[];
        let result = chunk_async(reader, ChunkConfig::default().with_chunk_size(0));
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }
}
