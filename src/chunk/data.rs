//! The ByteChunk type - a fixed-size run of bytes read from a stream.

use bytes::Bytes;
use std::fmt;

/// A chunk of bytes read from an [`std::io::Read`] or async reader.
///
/// Every chunk of a stream holds exactly the configured chunk size, except
/// the last, which holds whatever remained.
///
/// # Example
///
/// ```
/// use pagewise::ByteChunk;
/// use bytes::Bytes;
///
/// let chunk = ByteChunk::new(Bytes::from_static(b"hello world"), 0);
///
/// assert_eq!(chunk.len(), 11);
/// assert_eq!(chunk.range(), 0..11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteChunk {
    /// The chunk data.
    pub data: Bytes,

    /// Byte offset of the chunk in the original stream.
    pub offset: u64,
}

impl ByteChunk {
    /// Creates a new chunk starting at `offset`.
    pub fn new(data: impl Into<Bytes>, offset: u64) -> Self {
        Self {
            data: data.into(),
            offset,
        }
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a reference to the chunk data.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the chunk as a range.
    pub fn range(&self) -> std::ops::Range<u64> {
        self.offset..self.end()
    }

    /// Consumes the chunk and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl fmt::Display for ByteChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteChunk({} bytes @ {})", self.len(), self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let chunk = ByteChunk::new(&b"hello"[..], 0);
        assert_eq!(chunk.len(), 5);
        assert!(!chunk.is_empty());
    }

    #[test]
    fn test_empty() {
        let chunk = ByteChunk::new(&b""[..], 0);
        assert!(chunk.is_empty());
    }

    #[test]
    fn test_end_and_range() {
        let chunk = ByteChunk::new(&b"hello"[..], 100);
        assert_eq!(chunk.end(), 105);
        assert_eq!(chunk.range(), 100..105);
    }

    #[test]
    fn test_display() {
        let chunk = ByteChunk::new(&b"hello"[..], 100);
        let s = format!("{}", chunk);
        assert!(s.contains("5 bytes"));
        assert!(s.contains("@ 100"));
    }

    #[test]
    fn test_into_data() {
        let chunk = ByteChunk::new(Bytes::from_static(b"abc"), 3);
        assert_eq!(chunk.into_data(), Bytes::from_static(b"abc"));
    }
}
