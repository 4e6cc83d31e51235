use core::{cmp, mem};

use crate::alloc::{memory_manager, Allocation, Layout, UseAlloc};
use crate::error::VectorError;

/// Exclusive owner of a vector's slot storage
///
/// A `RawBuffer` manages the block of `cap` slots and nothing else: it never
/// constructs or destroys elements, and dropping it only releases the block.
/// The allocator id is carried in the allocation's layout even while no
/// storage is owned, so an instance sticks with its allocator across every
/// reallocation.
pub(crate) struct RawBuffer<T> {
    ptr: Allocation<T>,
    cap: usize,
}

impl<T> RawBuffer<T> {
    #[inline]
    pub fn new(alloc: UseAlloc) -> Self {
        Self {
            ptr: Allocation::dangling(alloc.get_id()),
            cap: 0,
        }
    }

    /// Allocate a buffer of exactly `capacity` slots
    ///
    /// Zero-size element types and zero capacities allocate nothing.
    ///
    /// # Panics
    ///
    /// Panics if the allocator refuses the request.
    pub fn with_capacity(capacity: usize, alloc: UseAlloc) -> Self {
        if mem::size_of::<T>() == 0 || capacity == 0 {
            return Self::new(alloc);
        }

        match memory_manager().alloc_array::<T>(alloc, capacity) {
            Some(ptr) => Self { ptr, cap: capacity },
            None => panic!("failed to allocate memory"),
        }
    }

    /// Number of slots the buffer holds
    #[inline]
    pub fn capacity(&self) -> usize {
        if mem::size_of::<T>() == 0 {
            usize::MAX
        } else {
            self.cap
        }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.ptr_mut()
    }

    #[inline]
    pub fn allocator_id(&self) -> u16 {
        self.ptr.layout().alloc_id()
    }

    /// Grow so that at least `len + additional` slots fit, doubling the
    /// current capacity
    ///
    /// An empty buffer grows to one slot; after that each growth step
    /// doubles, unless more than double is required.
    pub fn grow_amortized(&mut self, len: usize, additional: usize) -> Result<usize, VectorError> {
        // This is ensured by the calling contexts.
        debug_assert!(additional > 0);

        if mem::size_of::<T>() == 0 {
            // Capacity already reports `usize::MAX`, getting here means the
            // buffer is overfull
            return Err(VectorError::CapacityOverflow);
        }

        let required = len.checked_add(additional).ok_or(VectorError::CapacityOverflow)?;
        let doubled = if self.cap == 0 {
            1
        } else {
            self.cap.checked_mul(2).ok_or(VectorError::CapacityOverflow)?
        };

        self.finish_grow(cmp::max(doubled, required))
    }

    /// Grow to exactly `new_cap` slots, a no-op when not larger than the
    /// current capacity
    pub fn try_reserve_exact(&mut self, new_cap: usize) -> Result<usize, VectorError> {
        if new_cap <= self.capacity() {
            Ok(self.capacity())
        } else {
            self.finish_grow(new_cap)
        }
    }

    /// Swap in a block of `new_cap` slots, relocating the current bytes
    ///
    /// The old block is released only after the new one is fully populated;
    /// on allocation failure the buffer is left untouched.
    fn finish_grow(&mut self, new_cap: usize) -> Result<usize, VectorError> {
        let new_layout = Layout::try_array::<T>(new_cap).ok_or(VectorError::CapacityOverflow)?;
        let alloc_id = self.allocator_id();

        let old = mem::replace(&mut self.ptr, Allocation::dangling(alloc_id));
        match memory_manager().grow(old.cast::<u8>(), new_layout) {
            Ok(mem) => {
                self.ptr = mem.cast();
                self.cap = new_cap;
                Ok(new_cap)
            }
            Err(old) => {
                self.ptr = old.cast();
                Err(VectorError::AllocFailed {
                    size: new_layout.size(),
                })
            }
        }
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.cap > 0 {
            let alloc_id = self.allocator_id();
            memory_manager().dealloc(mem::replace(&mut self.ptr, Allocation::dangling(alloc_id)));
        }
    }
}
