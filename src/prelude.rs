//! Commonly used items, meant to be glob-imported.

pub use crate::alloc::UseAlloc;
pub use crate::error::VectorError;
pub use crate::vector;
pub use crate::vector::{Cursor, ReverseCursor, Vector};
