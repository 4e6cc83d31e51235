use core::{cmp, fmt, mem};

use static_assertions::const_assert_eq;

/// Memory layout
///
/// The data is stored as following (sizes shown in bits)
///
/// ```text
/// +----------------------------------------------+-----------+-------+
/// |                     size                     |  alloc id | align |
/// +----------------------------------------------+-----------+-------+
/// 0                                              48          58      64
/// MSB                                                              LSB
/// ```
///
/// where `align` is `log2(alignment)`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Size, allocator id, and log2 of the alignment (real alignment is 2^value)
    packed: u64,
}

impl Layout {
    /// Maximum size of an allocation (2^48 - 1 bytes)
    pub const MAX_SIZE: u64 = (1u64 << 48) - 1;
    /// Maximum alignment of an allocation (2^16 bytes)
    pub const MAX_ALIGN: u64 = 1 << 16;
    /// Maximum allocator id, also used as the "use the default allocator" sentinel
    pub const MAX_ALLOC_ID: u16 = 0x3FF;
    /// Number of bits to shift to retrieve the allocator id
    pub const ALLOC_ID_SHIFT: usize = 6;
    /// Number of bits to shift to retrieve the size
    pub const SIZE_SHIFT: usize = 16;
    /// Mask for the allocator id
    pub const ALLOC_ID_MASK: u64 = 0xFFC0;
    /// Mask for the log2(align)
    pub const ALIGN_MASK: u64 = 0x3F;

    fn new_raw(size: usize, alloc_id: u16, align: usize) -> Self {
        Self {
            packed: (size as u64) << Self::SIZE_SHIFT
                | ((alloc_id as u64) << Self::ALLOC_ID_SHIFT) & Self::ALLOC_ID_MASK
                | align.ilog2() as u64 & Self::ALIGN_MASK,
        }
    }

    /// Create a new layout for type `T`
    pub fn new<T>() -> Self {
        Self::new_size_align(mem::size_of::<T>(), mem::align_of::<T>())
    }

    /// Create a new layout from a `size` and an `align`ment
    pub fn new_size_align(size: usize, align: usize) -> Self {
        assert!(size != 0, "size needs to be larger than 0");
        assert!(size <= Self::MAX_SIZE as usize, "size exceeds MAX_SIZE");
        assert!(align != 0, "alignment needs to be larger than 0");
        assert!(align <= Self::MAX_ALIGN as usize, "alignment exceeds MAX_ALIGN");
        assert!(align.is_power_of_two(), "alignment needs to be a power of 2");

        Self::new_raw(size, 0, align)
    }

    /// Create a new layout for an array that can store `count` elements of type `T`
    ///
    /// # Panics
    ///
    /// Panics when the total byte size overflows [`MAX_SIZE`](Self::MAX_SIZE).
    pub fn array<T>(count: usize) -> Self {
        match Self::try_array::<T>(count) {
            Some(layout) => layout,
            None => panic!("array of {count} elements does not fit in a layout"),
        }
    }

    /// Create a new layout for an array that can store `count` elements of
    /// type `T`, or `None` when the byte size is not representable
    ///
    /// Zero-size totals are not representable either; callers handle those
    /// without allocating.
    pub fn try_array<T>(count: usize) -> Option<Self> {
        let size = mem::size_of::<T>().checked_mul(count)?;
        if size == 0 || size as u64 > Self::MAX_SIZE {
            return None;
        }
        Some(Self::new_size_align(size, mem::align_of::<T>()))
    }

    /// Get a 0-size layout
    #[inline]
    pub const fn null() -> Self {
        Self { packed: 0 }
    }

    /// Get the size of the allocation
    #[inline]
    pub fn size(&self) -> usize {
        (self.packed >> Self::SIZE_SHIFT) as usize
    }

    /// Get the log2 of the alignment
    #[inline]
    pub fn log2_align(&self) -> u8 {
        (self.packed & Self::ALIGN_MASK) as u8
    }

    /// Get the alignment of the allocation
    #[inline]
    pub fn align(&self) -> usize {
        1usize << self.log2_align()
    }

    /// Get the allocator id
    #[inline]
    pub fn alloc_id(&self) -> u16 {
        ((self.packed & Self::ALLOC_ID_MASK) >> Self::ALLOC_ID_SHIFT) as u16
    }

    /// Set the allocator id
    ///
    /// This function is mainly used when allocating the memory
    pub fn set_alloc_id(&mut self, id: u16) {
        self.packed &= !Self::ALLOC_ID_MASK;
        self.packed |= ((id as u64) << Self::ALLOC_ID_SHIFT) & Self::ALLOC_ID_MASK;
    }

    /// Get a copy of the layout with the allocator id set
    pub fn with_alloc_id(&self, id: u16) -> Self {
        let mut layout = *self;
        layout.set_alloc_id(id);
        layout
    }

    /// Get a copy of the layout that is at minimum aligned with the given alignment
    pub fn with_min_align(&self, align: usize) -> Self {
        assert!(align != 0, "alignment needs to be larger than 0");
        assert!(align.is_power_of_two(), "alignment needs to be a power of 2");

        let align = cmp::max(self.align(), align);
        Self::new_raw(self.size(), self.alloc_id(), align)
    }
}

const_assert_eq!(mem::size_of::<Layout>(), 8);

impl Default for Layout {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("size", &self.size())
            .field("allocator id", &self.alloc_id())
            .field("alignment", &self.align())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Layout;

    #[test]
    fn create_raw() {
        let layout = Layout::new_size_align(1024, 16);
        assert_eq!(layout.size(), 1024);
        assert_eq!(layout.log2_align(), 4);
        assert_eq!(layout.align(), 16);
        assert_eq!(layout.alloc_id(), 0);
    }

    #[test]
    fn create_from_u64() {
        let layout = Layout::new::<u64>();
        assert_eq!(layout.size(), 8);
        assert_eq!(layout.log2_align(), 3);
        assert_eq!(layout.align(), 8);
    }

    #[test]
    fn create_array() {
        let layout = Layout::array::<u32>(6);
        assert_eq!(layout.size(), 24);
        assert_eq!(layout.align(), 4);
    }

    #[test]
    fn array_size_is_checked() {
        assert!(Layout::try_array::<u32>(6).is_some());
        // Byte size wraps usize
        assert!(Layout::try_array::<u64>((1 << 61) + 1).is_none());
        // Fits in usize but not in the 48-bit size field
        assert!(Layout::try_array::<u8>(1 << 50).is_none());
    }

    #[test]
    fn alloc_id_roundtrip() {
        let mut layout = Layout::new::<u16>();
        layout.set_alloc_id(0x2A5);
        assert_eq!(layout.alloc_id(), 0x2A5);
        assert_eq!(layout.size(), 2);
        assert_eq!(layout.align(), 2);

        let layout = layout.with_alloc_id(Layout::MAX_ALLOC_ID);
        assert_eq!(layout.alloc_id(), Layout::MAX_ALLOC_ID);
    }

    #[test]
    fn min_align() {
        let layout = Layout::new::<u16>().with_min_align(16);
        assert_eq!(layout.size(), 2);
        assert_eq!(layout.align(), 16);
    }

    #[test]
    fn null_is_empty() {
        let layout = Layout::null();
        assert_eq!(layout.size(), 0);
        assert_eq!(layout.alloc_id(), 0);
    }
}
