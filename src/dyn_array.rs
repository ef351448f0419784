use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::guard::clone_into;
use crate::raw_buf::RawBuf;
use crate::{DynArrayError, IntoIter};

/// Capacity of the first block allocated by an append into empty storage.
const MIN_NON_ZERO_CAP: usize = 1;

/// Factor applied to the capacity when an append finds no free slot.
const GROWTH_FACTOR: usize = 2;

/// Contiguous, growable array with value semantics.
///
/// Owns one storage block of [`capacity`](DynArray::capacity) slots, of which
/// the first [`len`](DynArray::len) hold live values. Appends that find the
/// block full re-buffer into a block of twice the capacity (one slot when
/// empty), so repeated [`push_back`](DynArray::push_back) is amortized O(1).
///
/// Re-buffering clones every live element into the new block and only then
/// swaps it in, so a panicking [`Clone`] leaves the array exactly as it was.
/// Copies are exact-fit: a clone has `capacity == len`.
///
/// Positions are plain offsets: [`begin`](DynArray::begin) is `0` and
/// [`end`](DynArray::end) is `len()`. Nothing tracks them. Any operation that
/// re-buffers or shifts elements leaves previously obtained offsets pointing
/// at whatever now occupies that slot.
///
/// # Example
///
/// ```
/// use dyn_array::DynArray;
///
/// let mut a = DynArray::new();
/// a.push_back(1);
/// a.push_back(2);
/// a.push_back(3);
/// assert_eq!(a.capacity(), 4);
///
/// let at = a.insert(1, 9);
/// assert_eq!(at, 1);
/// assert_eq!(a.as_slice(), &[1, 9, 2, 3]);
///
/// a.erase_range(0, 2);
/// assert_eq!(a.as_slice(), &[2, 3]);
///
/// a.shrink_to_fit();
/// assert_eq!(a.capacity(), 2);
/// ```
pub struct DynArray<T> {
    buf: RawBuf<T>,
    len: usize,
}

impl<T> DynArray<T> {
    /// Creates an empty array. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: RawBuf::new(),
            len: 0,
        }
    }

    /// Creates an empty array with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if the capacity overflows; aborts via
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error) if the
    /// allocator fails.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|e| e.raise())
    }

    /// Creates an empty array with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// [`DynArrayError::CapacityOverflow`] or
    /// [`DynArrayError::AllocFailed`] if the block cannot be obtained.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            buf: RawBuf::try_allocate(capacity)?,
            len: 0,
        })
    }

    /// Returns the number of live elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated slots, live or not.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Position of the first element. Always `0`.
    #[must_use]
    pub const fn begin(&self) -> usize {
        0
    }

    /// One past the last element. Never a valid element position.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.len
    }

    /// Raw pointer to the first slot. Dangling when nothing is allocated.
    #[must_use]
    pub const fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Mutable raw pointer to the first slot.
    #[must_use]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_ptr()
    }

    /// Live elements as a slice.
    #[must_use]
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are initialized; the pointer is non-null and
        // aligned even when nothing is allocated.
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// Live elements as a mutable slice.
    #[must_use]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` gives exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// Returns the element at `index` without a bounds check.
    ///
    /// Debug builds assert `index < len()`.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](DynArray::len).
    #[must_use]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "index {index} out of range for length {}", self.len);
        // SAFETY: upheld by the caller.
        unsafe { &*self.buf.as_ptr().add(index) }
    }

    /// Mutable counterpart of [`get_unchecked`](DynArray::get_unchecked).
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](DynArray::len).
    #[must_use]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "index {index} out of range for length {}", self.len);
        // SAFETY: upheld by the caller.
        unsafe { &mut *self.buf.as_ptr().add(index) }
    }

    /// Returns the first element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    #[must_use]
    pub fn front(&self) -> &T {
        assert!(!self.is_empty(), "front() on empty DynArray");
        // SAFETY: len > 0.
        unsafe { self.get_unchecked(0) }
    }

    /// Returns the first element mutably.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    #[must_use]
    pub fn front_mut(&mut self) -> &mut T {
        assert!(!self.is_empty(), "front_mut() on empty DynArray");
        // SAFETY: len > 0.
        unsafe { self.get_unchecked_mut(0) }
    }

    /// Returns the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    #[must_use]
    pub fn back(&self) -> &T {
        assert!(!self.is_empty(), "back() on empty DynArray");
        // SAFETY: len > 0.
        unsafe { self.get_unchecked(self.len - 1) }
    }

    /// Returns the last element mutably.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    #[must_use]
    pub fn back_mut(&mut self) -> &mut T {
        assert!(!self.is_empty(), "back_mut() on empty DynArray");
        let last = self.len - 1;
        // SAFETY: last < len.
        unsafe { self.get_unchecked_mut(last) }
    }

    /// Drops the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn pop_back(&mut self) {
        assert!(!self.is_empty(), "pop_back() on empty DynArray");
        self.len -= 1;
        // SAFETY: slot `len` was live and is no longer counted, so it is
        // dropped exactly once even if its destructor panics.
        unsafe { self.buf.as_ptr().add(self.len).drop_in_place() };
    }

    /// Drops elements from the back until at most `len` remain.
    ///
    /// No-op if `len >= self.len()`. Capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            self.pop_back();
        }
    }

    /// Drops all elements, last to first. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchanges storage, length and capacity with `other`.
    ///
    /// Never allocates, clones or drops an element.
    pub const fn swap(&mut self, other: &mut Self) {
        self.buf.swap(&mut other.buf);
        std::mem::swap(&mut self.len, &mut other.len);
    }

    /// Removes the element at `pos`, shifting later elements left.
    ///
    /// Returns the position of the element that followed the removed one
    /// (equal to `pos`).
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len()`.
    pub fn erase(&mut self, pos: usize) -> usize {
        assert!(pos < self.len, "erase position {pos} out of range for length {}", self.len);
        self.erase_range(pos, pos + 1)
    }

    /// Removes the half-open range `[first, last)`.
    ///
    /// Elements after `last` move left to close the gap in order; the
    /// vacated tail is then dropped from the back. Returns `first`, which is
    /// either the position of the first element after the removed range or
    /// [`end`](DynArray::end). An empty range is a no-op.
    ///
    /// Never allocates or clones.
    ///
    /// # Panics
    ///
    /// Panics unless `first <= last <= len()`.
    pub fn erase_range(&mut self, first: usize, last: usize) -> usize {
        assert!(
            first <= last && last <= self.len,
            "erase range {first}..{last} out of range for length {}",
            self.len,
        );
        if first == last {
            return first;
        }

        let live = self.as_mut_slice();
        let (mut gap, mut tail) = (first, last);
        while tail < live.len() {
            live.swap(gap, tail);
            gap += 1;
            tail += 1;
        }
        self.truncate(self.len - (last - first));
        first
    }

    /// Returns an iterator over the live elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns a mutable iterator over the live elements.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Writes `value` into slot `len`.
    ///
    /// Callers guarantee `len < capacity`.
    fn push_within_capacity(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        // SAFETY: slot `len` is allocated and uninitialized.
        unsafe { self.buf.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Capacity to grow to when an append finds no free slot.
    fn grown_capacity(&self) -> Result<usize> {
        match self.capacity() {
            0 => Ok(MIN_NON_ZERO_CAP),
            cap => cap
                .checked_mul(GROWTH_FACTOR)
                .ok_or(DynArrayError::CapacityOverflow),
        }
    }

    /// Gives up the storage block and live count without dropping anything.
    pub(crate) fn into_raw_parts(self) -> (RawBuf<T>, usize) {
        let mut this = ManuallyDrop::new(self);
        let buf = std::mem::replace(&mut this.buf, RawBuf::new());
        (buf, this.len)
    }
}

impl<T: Clone> DynArray<T> {
    /// Replaces the storage with a block of exactly `new_cap` slots holding
    /// clones of the live elements.
    ///
    /// Nothing observable changes until the new block is fully populated.
    /// The old block and its elements are dropped afterwards.
    fn rebuffer(&mut self, new_cap: usize) -> Result<()> {
        debug_assert!(new_cap >= self.len, "re-buffer below live length");
        let mut fresh = Self::try_with_capacity(new_cap)?;
        // SAFETY: `fresh` has new_cap >= len uninitialized slots in a block
        // distinct from ours.
        fresh.len = unsafe { clone_into(fresh.buf.as_ptr(), self.as_slice()) };

        tracing::trace!(
            old_capacity = self.capacity(),
            new_capacity = new_cap,
            len = self.len,
            "re-buffer"
        );
        self.swap(&mut fresh);
        Ok(())
    }

    /// Makes room for `additional` appends.
    ///
    /// Grows to the larger of the exact requirement and the doubling step,
    /// so repeated small batches stay amortized O(1) per element.
    fn try_reserve_for_append(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(DynArrayError::CapacityOverflow)?;
        if required > self.capacity() {
            self.rebuffer(required.max(self.grown_capacity()?))?;
        }
        Ok(())
    }

    /// Clones the array into an exact-fit block.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the block cannot be obtained. `self` is
    /// never modified.
    pub fn try_clone(&self) -> Result<Self> {
        let mut copy = Self::try_with_capacity(self.len)?;
        // SAFETY: `copy` has exactly len uninitialized slots of its own.
        copy.len = unsafe { clone_into(copy.buf.as_ptr(), self.as_slice()) };
        Ok(copy)
    }

    /// Ensures capacity of at least `capacity` slots.
    ///
    /// Re-buffers to exactly `capacity` if it exceeds the current capacity;
    /// otherwise does nothing.
    ///
    /// # Errors
    ///
    /// Returns an allocation error with the array unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity > self.capacity() {
            self.rebuffer(capacity)?;
        }
        Ok(())
    }

    /// Infallible form of [`try_reserve`](DynArray::try_reserve).
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow.
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(e) = self.try_reserve(capacity) {
            e.raise();
        }
    }

    /// Re-buffers to exactly `len()` slots if there is spare capacity.
    ///
    /// # Errors
    ///
    /// Returns an allocation error with the array unchanged.
    pub fn try_shrink_to_fit(&mut self) -> Result<()> {
        if self.capacity() > self.len {
            self.rebuffer(self.len)?;
        }
        Ok(())
    }

    /// Infallible form of [`try_shrink_to_fit`](DynArray::try_shrink_to_fit).
    pub fn shrink_to_fit(&mut self) {
        if let Err(e) = self.try_shrink_to_fit() {
            e.raise();
        }
    }

    /// Appends `value`, doubling the capacity if no slot is free.
    ///
    /// # Errors
    ///
    /// Returns an allocation error with the array unchanged; `value` is
    /// dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<()> {
        if self.len == self.capacity() {
            self.rebuffer(self.grown_capacity()?)?;
        }
        self.push_within_capacity(value);
        Ok(())
    }

    /// Infallible form of [`try_push_back`](DynArray::try_push_back).
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow.
    pub fn push_back(&mut self, value: T) {
        if let Err(e) = self.try_push_back(value) {
            e.raise();
        }
    }

    /// Appends a clone of the element currently at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()` or on capacity overflow.
    pub fn push_back_from_within(&mut self, index: usize) {
        assert!(index < self.len, "index {index} out of range for length {}", self.len);
        // The clone must be taken before any re-buffer: the source slot is
        // dropped along with the old block.
        let saved = self.as_slice()[index].clone();
        self.push_back(saved);
    }

    /// Appends a clone of every element of `items`, in order.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow.
    pub fn extend_from_slice(&mut self, items: &[T]) {
        if let Err(e) = self.try_reserve_for_append(items.len()) {
            e.raise();
        }
        for item in items {
            self.push_back(item.clone());
        }
    }

    /// Inserts `value` at `pos`, shifting later elements right.
    ///
    /// Appends first, then walks the new element back to `pos` by swapping
    /// it with its left neighbour. Returns the position of the inserted
    /// element.
    ///
    /// # Errors
    ///
    /// Returns an allocation error with the array unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len()`.
    pub fn try_insert(&mut self, pos: usize, value: T) -> Result<usize> {
        assert!(pos <= self.len, "insert position {pos} out of range for length {}", self.len);
        self.try_push_back(value)?;

        let live = self.as_mut_slice();
        let mut at = live.len() - 1;
        while at > pos {
            live.swap(at - 1, at);
            at -= 1;
        }
        Ok(at)
    }

    /// Infallible form of [`try_insert`](DynArray::try_insert).
    ///
    /// # Panics
    ///
    /// Panics if `pos > len()` or on capacity overflow.
    pub fn insert(&mut self, pos: usize, value: T) -> usize {
        self.try_insert(pos, value).unwrap_or_else(|e| e.raise())
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|e| e.raise())
    }

    /// Copy-then-swap: `self` is untouched if cloning `source` panics.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> std::ops::Index<usize> for DynArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> std::ops::IndexMut<usize> for DynArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: Hash> Hash for DynArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let (buf, len) = self.into_raw_parts();
        IntoIter::new(buf, len)
    }
}

impl<T: Clone> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Err(e) = self.try_reserve_for_append(lower) {
            e.raise();
        }
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Clone> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T: Clone> From<&[T]> for DynArray<T> {
    fn from(items: &[T]) -> Self {
        let mut array = Self::with_capacity(items.len());
        array.extend_from_slice(items);
        array
    }
}

impl<T> From<Vec<T>> for DynArray<T> {
    fn from(items: Vec<T>) -> Self {
        let mut array = Self::with_capacity(items.len());
        for item in items {
            array.push_within_capacity(item);
        }
        array
    }
}
