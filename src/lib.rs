//! Contiguous, growable array with value semantics.
//!
//! `dyn-array` provides [`DynArray<T>`], an owned sequence stored in a single
//! heap block. It is built directly on the global allocator and manages slot
//! construction and destruction itself.
//!
//! # Key properties
//!
//! - **Amortized O(1) append**: capacity grows 1, 2, 4, 8, ...
//! - **Exact-fit copies**: a clone allocates exactly `len` slots
//! - **Strong panic safety**: clone, `clone_from`, reserve, shrink, push and
//!   insert leave the array unchanged if an element's [`Clone`] panics
//! - **Ordered destruction**: elements are dropped last to first
//! - **Fallible twins**: `try_*` methods report allocation failure as
//!   [`DynArrayError`] instead of aborting
//!
//! # Example
//!
//! ```
//! use dyn_array::DynArray;
//!
//! let mut a: DynArray<String> = DynArray::new();
//! a.push_back(String::from("hello"));
//! a.push_back(String::from("world"));
//!
//! let mut b = a.clone();
//! b.push_back(String::from("!"));
//!
//! assert_eq!(a.len(), 2);
//! assert_eq!(b.len(), 3);
//! assert_eq!(b.capacity(), 4); // exact-fit 2, then doubled
//! assert_eq!(a[1], "world");
//! ```

#![deny(missing_docs)]

mod dyn_array;
mod error;
mod guard;
mod iter;
mod raw_buf;

pub use dyn_array::DynArray;
pub use error::{DynArrayError, Result};
pub use iter::IntoIter;

#[cfg(test)]
mod tests;
