use core::ptr::NonNull;

use super::Layout;

/// Representation of allocated memory
///
/// An `Allocation` is the exclusive owning handle over a block of raw
/// storage: the pointer to the block and the [`Layout`] it was acquired with,
/// including the id of the allocator that provided it. It does not manage the
/// lifecycle of any value stored in the block.
#[derive(Debug)]
pub struct Allocation<T> {
    ptr: NonNull<T>,
    layout: Layout,
}

impl<T> Allocation<T> {
    /// Create an `Allocation<T>` from a raw pointer and a layout
    ///
    /// # Panics
    ///
    /// Panics when the provided pointer is null
    #[inline]
    pub fn new(ptr: *mut T, layout: Layout) -> Self {
        debug_assert!(!ptr.is_null());
        Self {
            // SAFETY: Checked above
            ptr: unsafe { NonNull::new_unchecked(ptr) },
            layout,
        }
    }

    /// Create a dangling allocation that owns no storage, remembering the
    /// allocator to acquire from on first growth
    ///
    /// The pointer is aligned and non-null, so a zero-capacity buffer can
    /// still be viewed as a valid empty slice.
    #[inline]
    pub fn dangling(alloc_id: u16) -> Self {
        Self {
            ptr: NonNull::dangling(),
            layout: Layout::null().with_alloc_id(alloc_id),
        }
    }

    /// Get the contained pointer
    #[inline]
    pub fn ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Get the contained pointer
    #[inline]
    pub fn ptr_mut(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Get the layout
    #[inline]
    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Check whether this handle owns any storage
    #[inline]
    pub fn is_dangling(&self) -> bool {
        self.layout.size() == 0
    }

    /// Cast the `Allocation` to contain a value of another type
    #[inline]
    pub fn cast<U>(self) -> Allocation<U> {
        Allocation {
            ptr: self.ptr.cast(),
            layout: self.layout,
        }
    }

    /// Duplicate the `Allocation`
    ///
    /// # Safety
    ///
    /// Duplicating the allocation is unsafe, as it could cause double deallocations
    #[inline]
    pub unsafe fn duplicate(&self) -> Self {
        Self {
            ptr: self.ptr,
            layout: self.layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Allocation;
    use crate::alloc::Layout;

    #[test]
    fn dangling_owns_nothing() {
        let alloc = Allocation::<u64>::dangling(12);
        assert!(alloc.is_dangling());
        assert_eq!(alloc.layout().size(), 0);
        assert_eq!(alloc.layout().alloc_id(), 12);
        assert!(!alloc.ptr().is_null());
    }

    #[test]
    fn cast_keeps_layout() {
        let alloc = Allocation::<u32>::dangling(3).cast::<u8>();
        assert_eq!(alloc.layout().alloc_id(), 3);
        assert_eq!(alloc.layout(), Layout::null().with_alloc_id(3));
    }
}
