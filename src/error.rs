use std::alloc::Layout;

/// Errors reported by the fallible (`try_*`) operations of
/// [`DynArray`](crate::DynArray).
///
/// A panic inside an element's [`Clone`] is not represented here: it
/// unwinds through the container after any partially built storage has
/// been released.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DynArrayError {
    /// The requested capacity does not fit in a valid [`Layout`].
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The global allocator could not provide a block for `layout`.
    #[error("memory allocation failed for {layout:?}")]
    AllocFailed {
        /// Layout of the block that could not be allocated.
        layout: Layout,
    },
}

/// Result alias for fallible container operations.
pub type Result<T, E = DynArrayError> = std::result::Result<T, E>;

impl DynArrayError {
    /// Converts the error into the infallible-API behaviour: a panic for
    /// overflow, [`handle_alloc_error`](std::alloc::handle_alloc_error)
    /// for allocator failure.
    pub(crate) fn raise(self) -> ! {
        match self {
            Self::CapacityOverflow => panic!("capacity overflow"),
            Self::AllocFailed { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_message() {
        assert_eq!(DynArrayError::CapacityOverflow.to_string(), "capacity overflow");
    }

    #[test]
    fn alloc_failure_names_layout() {
        let layout = Layout::array::<u64>(4).unwrap();
        let message = DynArrayError::AllocFailed { layout }.to_string();
        assert!(message.starts_with("memory allocation failed for"));
        assert!(message.contains("32"));
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn raise_overflow_panics() {
        DynArrayError::CapacityOverflow.raise();
    }
}
