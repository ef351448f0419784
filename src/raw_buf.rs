use std::alloc::Layout;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::DynArrayError;

/// Owned block of uninitialized slots for `T`.
///
/// Tracks only the block itself. Which slots hold live values is the
/// owner's business; dropping a `RawBuf` frees memory without running any
/// element destructor.
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

// SAFETY: RawBuf uniquely owns its block; sending or sharing it is as safe
// as sending or sharing the `T` values stored in it.
unsafe impl<T: Send> Send for RawBuf<T> {}
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> RawBuf<T> {
    const IS_ZST: bool = size_of::<T>() == 0;

    /// Empty buffer. Never allocates.
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates a block with exactly `cap` slots.
    ///
    /// Zero-sized types never reach the allocator; the capacity is kept
    /// as a logical slot count.
    pub(crate) fn try_allocate(cap: usize) -> Result<Self, DynArrayError> {
        if cap == 0 {
            return Ok(Self::new());
        }
        if Self::IS_ZST {
            return Ok(Self {
                ptr: NonNull::dangling(),
                cap,
                _marker: PhantomData,
            });
        }

        let layout = Layout::array::<T>(cap).map_err(|_| DynArrayError::CapacityOverflow)?;
        // SAFETY: layout has non-zero size (cap > 0 and T is not a ZST).
        let raw = unsafe { std::alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            tracing::debug!(cap, size = layout.size(), "storage allocation failed");
            return Err(DynArrayError::AllocFailed { layout });
        };

        Ok(Self {
            ptr,
            cap,
            _marker: PhantomData,
        })
    }

    /// Number of slots in the block.
    pub(crate) const fn capacity(&self) -> usize {
        self.cap
    }

    /// Pointer to slot 0. Dangling when nothing is allocated.
    pub(crate) const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Exchanges blocks with `other`.
    pub(crate) const fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        if self.cap == 0 || Self::IS_ZST {
            return;
        }
        // SAFETY: the same layout was accepted by `try_allocate` for this
        // block, so computing it again cannot fail.
        let layout = unsafe { Layout::array::<T>(self.cap).unwrap_unchecked() };
        // SAFETY: `ptr` came from `alloc(layout)` and is freed only here.
        unsafe { std::alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
    }
}
