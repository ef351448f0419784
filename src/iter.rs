use std::fmt;
use std::iter::FusedIterator;

use crate::raw_buf::RawBuf;

/// Owning iterator over the elements of a [`DynArray`](crate::DynArray).
///
/// Created by `DynArray::into_iter`. Takes over the storage block; elements
/// not yielded are dropped, last to first, when the iterator is dropped.
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    /// Next slot yielded from the front.
    start: usize,
    /// One past the next slot yielded from the back.
    end: usize,
}

impl<T> IntoIter<T> {
    /// Wraps a block whose slots `[0, len)` are live.
    pub(crate) const fn new(buf: RawBuf<T>, len: usize) -> Self {
        Self {
            buf,
            start: 0,
            end: len,
        }
    }

    /// Returns the elements not yet yielded.
    #[must_use]
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: slots [start, end) are live and owned by the iterator.
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr().add(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: start < end, so the slot is live; advancing `start` hands
        // ownership of it to the caller.
        let value = unsafe { self.buf.as_ptr().add(self.start).read() };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: slot `end` was live and is no longer counted.
        Some(unsafe { self.buf.as_ptr().add(self.end).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        while self.end > self.start {
            self.end -= 1;
            // SAFETY: slot `end` was live and is no longer counted.
            unsafe { self.buf.as_ptr().add(self.end).drop_in_place() };
        }
    }
}
