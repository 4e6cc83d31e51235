//! Allocator-aware dynamic array.
//!
//! The crate centers on [`Vector`](vector::Vector), a contiguous growable
//! array whose storage is routed through a process-wide allocator registry:
//! every instance picks an allocator at construction (via
//! [`UseAlloc`](alloc::UseAlloc)) and keeps using it for its entire life,
//! across every reallocation.
//!
//! ```
//! use varray::prelude::*;
//!
//! let mut v = vector![1, 2, 4, -6];
//! v.push(10);
//! assert_eq!(v, [1, 2, 4, -6, 10]);
//! assert_eq!(v.at(10), Err(VectorError::OutOfRange { index: 10, len: 5 }));
//! ```

pub mod alloc;
mod error;
pub mod prelude;
pub mod vector;

pub use error::VectorError;
