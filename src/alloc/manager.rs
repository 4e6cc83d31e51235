use core::ptr::copy_nonoverlapping;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use static_assertions::assert_impl_all;

use super::{Allocation, Allocator, Layout, Mallocator, UseAlloc};

static MEMORY_MANAGER: Lazy<MemoryManager> = Lazy::new(MemoryManager::new);

/// Get the process-wide memory manager
pub fn memory_manager() -> &'static MemoryManager {
    &MEMORY_MANAGER
}

struct State {
    malloc: Mallocator,
    allocs: HashMap<u16, Box<dyn Allocator + Send + Sync>>,
    next_id: u16,
    default: u16,
}

impl State {
    fn new() -> Self {
        Self {
            malloc: Mallocator,
            allocs: HashMap::new(),
            next_id: Mallocator::ID + 1,
            default: Mallocator::ID,
        }
    }

    /// Resolve a selection to a concrete allocator id, falling back to the
    /// system heap if the default itself is unset
    fn resolve(&self, alloc: UseAlloc) -> u16 {
        let id = alloc.get_id();
        let id = if id >= Layout::MAX_ALLOC_ID { self.default } else { id };
        if id >= Layout::MAX_ALLOC_ID {
            Mallocator::ID
        } else {
            id
        }
    }

    fn get_mut(&mut self, id: u16) -> Option<&mut dyn Allocator> {
        if id == Mallocator::ID {
            Some(&mut self.malloc)
        } else {
            self.allocs.get_mut(&id).map(|alloc| alloc.as_mut() as &mut dyn Allocator)
        }
    }
}

/// Registry of allocators available to containers
///
/// The system heap ([`Mallocator`], id 0) is always present and is the
/// initial default. Further allocators are registered at runtime and receive
/// ids from 1 upward; every allocation is stamped with the id of the
/// allocator that provided it, so deallocation and growth always route back
/// to the same allocator.
pub struct MemoryManager {
    state: RwLock<State>,
}

// The registry lives in a process-wide static
assert_impl_all!(MemoryManager: Send, Sync);

impl MemoryManager {
    fn new() -> Self {
        Self {
            state: RwLock::new(State::new()),
        }
    }

    /// Register an allocator to the manager and set its allocator id
    ///
    /// # Panics
    ///
    /// Panics when the allocator id space is exhausted.
    pub fn register_allocator(&self, mut alloc: Box<dyn Allocator + Send + Sync>) -> u16 {
        let mut state = self.state.write();
        let id = state.next_id;
        assert!(id < Layout::MAX_ALLOC_ID, "allocator id space exhausted");
        state.next_id += 1;
        alloc.set_alloc_id(id);
        state.allocs.insert(id, alloc);
        id
    }

    /// Set the allocator that [`UseAlloc::Default`] resolves to
    pub fn set_default_allocator(&self, alloc: UseAlloc) {
        self.state.write().default = alloc.get_id();
    }

    /// Allocate a raw allocation with the given layout from the selected
    /// allocator
    ///
    /// The returned allocation's layout carries the resolved allocator id.
    pub fn alloc_raw(&self, alloc: UseAlloc, layout: Layout) -> Option<Allocation<u8>> {
        let mut state = self.state.write();
        let id = state.resolve(alloc);
        let allocator = state.get_mut(id)?;
        // SAFETY: The layout was validated on construction
        let mut ptr = unsafe { allocator.alloc(layout) }?;
        ptr.layout_mut().set_alloc_id(id);
        Some(ptr)
    }

    /// Allocate uninitialized storage for `count` elements of type `T`
    ///
    /// Returns `None` when the byte size is not representable or the
    /// allocator refuses the request.
    pub fn alloc_array<T>(&self, alloc: UseAlloc, count: usize) -> Option<Allocation<T>> {
        let layout = Layout::try_array::<T>(count)?;
        self.alloc_raw(alloc, layout).map(|ptr| ptr.cast())
    }

    /// Deallocate memory, routing by the allocator id recorded in the
    /// allocation
    ///
    /// Dangling (zero-size) allocations are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the recorded allocator is not registered.
    pub fn dealloc<T>(&self, ptr: Allocation<T>) {
        if ptr.is_dangling() {
            return;
        }

        let id = ptr.layout().alloc_id();
        let mut state = self.state.write();
        match state.get_mut(id) {
            // SAFETY: The allocation is routed to the allocator that provided it
            Some(allocator) => unsafe { allocator.dealloc(ptr.cast()) },
            None => panic!("failed to retrieve allocator {id} to deallocate memory"),
        }
    }

    /// Grow a given allocation to a newly provided layout
    ///
    /// The new block comes from the same allocator as the old one; the old
    /// block's bytes are copied over and the old block is freed only after
    /// the new one is fully in place. If new memory was unable to be
    /// allocated, the result contains an `Err(...)` with the original
    /// allocation untouched.
    pub fn grow<T>(&self, ptr: Allocation<T>, new_layout: Layout) -> Result<Allocation<T>, Allocation<T>> {
        if new_layout.size() <= ptr.layout().size() {
            return Ok(ptr);
        }

        let use_alloc = UseAlloc::Id(ptr.layout().alloc_id());

        if ptr.is_dangling() {
            return match self.alloc_raw(use_alloc, new_layout) {
                Some(mem) => Ok(mem.cast()),
                None => Err(ptr),
            };
        }

        let copy_count = ptr.layout().size();
        match self.alloc_raw(use_alloc, new_layout) {
            // SAFETY: The blocks are distinct and the new one is at least
            // `copy_count` bytes
            Some(mem) => unsafe {
                copy_nonoverlapping(ptr.ptr() as *const u8, mem.ptr_mut(), copy_count);
                self.dealloc(ptr);
                Ok(mem.cast())
            },
            None => Err(ptr),
        }
    }
}
