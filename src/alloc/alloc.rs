use super::{Allocation, Layout};

/// Allocator that can provide access to heap memory for a container
///
/// An allocator hands out uninitialized storage; constructing and destroying
/// the values that live in that storage is the caller's responsibility
/// (`ptr::write` / `ptr::drop_in_place` on individual slots).
pub trait Allocator {
    /// Allocate uninitialized memory for the full layout
    ///
    /// Returns `None` if no memory could be allocated.
    ///
    /// # Safety
    ///
    /// The layout must describe a non-zero-size allocation.
    unsafe fn alloc(&mut self, layout: Layout) -> Option<Allocation<u8>>;

    /// Deallocate an allocation previously returned by [`alloc`](Self::alloc)
    ///
    /// # Safety
    ///
    /// The allocation must have come from this allocator and must not be
    /// deallocated twice.
    unsafe fn dealloc(&mut self, ptr: Allocation<u8>);

    /// Check if the allocator owns the allocation
    fn owns(&self, ptr: &Allocation<u8>) -> bool {
        ptr.layout().alloc_id() == self.alloc_id()
    }

    /// Set the allocator id for the allocator, called on registration
    fn set_alloc_id(&mut self, id: u16);

    /// Get the allocator id for the allocator
    fn alloc_id(&self) -> u16;
}

/// Tells a container what allocator to use for its storage
///
/// The selection is resolved to a concrete allocator id the first time the
/// container acquires storage; from then on the instance sticks with that
/// allocator for the rest of its life, including across reallocation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum UseAlloc {
    /// Use the registry's current default allocator
    #[default]
    Default,
    /// Use the system heap allocator
    Malloc,
    /// Use the registered allocator with the given id
    Id(u16),
}

impl UseAlloc {
    pub const fn get_id(&self) -> u16 {
        match self {
            UseAlloc::Default => Layout::MAX_ALLOC_ID,
            UseAlloc::Malloc => super::Mallocator::ID,
            UseAlloc::Id(id) => *id,
        }
    }
}

impl From<&dyn Allocator> for UseAlloc {
    fn from(alloc: &dyn Allocator) -> Self {
        UseAlloc::Id(alloc.alloc_id())
    }
}
