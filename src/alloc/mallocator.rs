use super::{Allocation, Allocator, Layout};

/// Allocator calling directly to the system allocator
///
/// `Mallocator` uses rust's global allocator to retrieve memory.
///
/// This allocator has a fixed allocator id of 0 and is always available
/// through the registry, without registration.
pub struct Mallocator;

impl Mallocator {
    /// Reserved allocator id of the system heap
    pub const ID: u16 = 0;
}

impl Allocator for Mallocator {
    unsafe fn alloc(&mut self, layout: Layout) -> Option<Allocation<u8>> {
        let rs_layout = core::alloc::Layout::from_size_align_unchecked(layout.size(), layout.align());
        let ptr = std::alloc::alloc(rs_layout);
        if ptr.is_null() {
            None
        } else {
            Some(Allocation::new(ptr, layout.with_alloc_id(Self::ID)))
        }
    }

    unsafe fn dealloc(&mut self, ptr: Allocation<u8>) {
        assert!(
            self.owns(&ptr),
            "cannot deallocate an allocation ({}) that isn't owned by the allocator ({})",
            ptr.layout().alloc_id(),
            Self::ID
        );

        let rs_layout =
            core::alloc::Layout::from_size_align_unchecked(ptr.layout().size(), ptr.layout().align());
        std::alloc::dealloc(ptr.ptr_mut(), rs_layout)
    }

    fn set_alloc_id(&mut self, _id: u16) {
        // The id is fixed
    }

    fn alloc_id(&self) -> u16 {
        Self::ID
    }
}
