//! The Chunk type - a contiguous window over a caller-owned slice.

use std::fmt;
use std::ops::{Deref, Range};

/// A contiguous sub-slice of the chunked sequence.
///
/// Borrows from the input; no elements are copied.
///
/// # Example
///
/// ```
/// use pagewise::chunk_list;
///
/// let data = [10, 20, 30, 40, 50];
/// let chunks: Vec<_> = chunk_list(&data, 2)?.collect();
///
/// assert_eq!(chunks[1].as_slice(), &[30, 40]);
/// assert_eq!(chunks[1].offset(), 2);
/// assert_eq!(chunks[1].index(), 1);
/// assert_eq!(chunks[2].len(), 1);
/// # Ok::<(), pagewise::Error>(())
/// ```
pub struct Chunk<'a, T> {
    data: &'a [T],
    offset: usize,
    index: usize,
}

impl<'a, T> Chunk<'a, T> {
    pub(crate) fn new(data: &'a [T], offset: usize, index: usize) -> Self {
        Self {
            data,
            offset,
            index,
        }
    }

    /// Returns the chunk elements.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the position of the first element in the original sequence.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the ordinal of this chunk (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the position range covered in the original sequence.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.data.len()
    }

    /// Copies the elements into an owned vector.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.to_vec()
    }
}

impl<T> Clone for Chunk<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Chunk<'_, T> {}

impl<T> Deref for Chunk<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.data
    }
}

impl<T> AsRef<[T]> for Chunk<'_, T> {
    fn as_ref(&self) -> &[T] {
        self.data
    }
}

impl<'a, T> IntoIterator for Chunk<'a, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T: PartialEq> PartialEq for Chunk<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.data == other.data
    }
}

impl<T: Eq> Eq for Chunk<'_, T> {}

impl<T: PartialEq> PartialEq<[T]> for Chunk<'_, T> {
    fn eq(&self, other: &[T]) -> bool {
        self.data == other
    }
}

impl<T: fmt::Debug> fmt::Debug for Chunk<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("index", &self.index)
            .field("offset", &self.offset)
            .field("data", &self.data)
            .finish()
    }
}

impl<T> fmt::Display for Chunk<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chunk #{} ({} items @ {})",
            self.index,
            self.data.len(),
            self.offset
        )
    }
}
