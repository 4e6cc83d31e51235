//! Allocation plumbing: packed layouts, owning allocation handles, the
//! allocator capability trait, and the process-wide allocator registry.

mod alloc;
mod allocation;
mod layout;
mod mallocator;
mod manager;

pub use self::alloc::{Allocator, UseAlloc};
pub use allocation::Allocation;
pub use layout::Layout;
pub use mallocator::Mallocator;
pub use manager::{memory_manager, MemoryManager};
