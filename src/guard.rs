/// Drops the slots constructed so far if construction does not finish.
///
/// Armed while cloning into a fresh block. If a `Clone` panics, unwinding
/// drops the guard, which destroys exactly the `initialized` leading slots
/// in reverse order. On success, [`finish`](PartialInit::finish) disarms it.
pub(crate) struct PartialInit<T> {
    dst: *mut T,
    initialized: usize,
}

impl<T> PartialInit<T> {
    pub(crate) const fn new(dst: *mut T) -> Self {
        Self {
            dst,
            initialized: 0,
        }
    }

    /// Writes `value` into the next slot.
    ///
    /// # Safety
    ///
    /// The next slot must be inside the destination block and hold no live
    /// value.
    pub(crate) unsafe fn push(&mut self, value: T) {
        // SAFETY: upheld by the caller.
        unsafe { self.dst.add(self.initialized).write(value) };
        self.initialized += 1;
    }

    /// Disarms the guard, handing ownership of the slots to the caller.
    pub(crate) fn finish(self) -> usize {
        let initialized = self.initialized;
        std::mem::forget(self);
        initialized
    }
}

impl<T> Drop for PartialInit<T> {
    fn drop(&mut self) {
        for slot in (0..self.initialized).rev() {
            // SAFETY: slots below `initialized` were written by `push` and
            // have not been handed out.
            unsafe { self.dst.add(slot).drop_in_place() };
        }
    }
}

/// Clones every element of `src`, in order, into consecutive slots at `dst`.
///
/// Returns the number of slots written (always `src.len()`). If a clone
/// panics, the slots already written are dropped before unwinding
/// continues.
///
/// # Safety
///
/// `dst` must point to at least `src.len()` uninitialized slots that do not
/// overlap `src`.
pub(crate) unsafe fn clone_into<T: Clone>(dst: *mut T, src: &[T]) -> usize {
    let mut guard = PartialInit::new(dst);
    for item in src {
        // SAFETY: fewer than src.len() slots written so far; caller
        // guarantees room for src.len().
        unsafe { guard.push(item.clone()) };
    }
    guard.finish()
}
