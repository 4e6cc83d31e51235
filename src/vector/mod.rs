//! Allocator-aware contiguous growable array and its cursor types.

mod cursor;
mod raw;
#[allow(clippy::module_inception)]
mod vector;

pub(crate) use raw::RawBuffer;

pub use cursor::{Cursor, ReverseCursor};
pub use vector::Vector;
