use core::{
    cmp::Ordering,
    fmt, mem,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use static_assertions::const_assert_eq;

/// Forward cursor over a [`Vector`](super::Vector)'s buffer
///
/// A cursor is a plain value wrapping a raw slot position: arithmetic and
/// ordering are safe, dereferencing is not. A cursor is invalidated the
/// instant the vector it came from reallocates, shrinks past the referenced
/// slot, or is dropped; no validity tracking is provided. Keeping cursors
/// inside the live range of a still-alive vector is the caller's contract.
///
/// All arithmetic uses wrapping pointer math, so sentinel positions (one past
/// the end, one before the begin) can be formed and compared freely.
pub struct Cursor<T> {
    ptr: *mut T,
}

const_assert_eq!(mem::size_of::<Cursor<u64>>(), mem::size_of::<usize>());

impl<T> Cursor<T> {
    #[inline]
    pub(crate) fn new(ptr: *mut T) -> Self {
        Self { ptr }
    }

    /// Get the raw position
    #[inline]
    pub fn as_ptr(self) -> *mut T {
        self.ptr
    }

    /// Move one slot toward the end
    #[inline]
    pub fn advance(&mut self) {
        self.ptr = self.ptr.wrapping_add(1);
    }

    /// Move one slot toward the begin
    #[inline]
    pub fn retreat(&mut self) {
        self.ptr = self.ptr.wrapping_sub(1);
    }

    /// Get a reference to the referenced slot
    ///
    /// # Safety
    ///
    /// The cursor must reference a live slot of a still-alive vector, and the
    /// reference must not outlive that slot.
    #[inline]
    pub unsafe fn as_ref<'a>(self) -> &'a T {
        &*self.ptr
    }

    /// Get a mutable reference to the referenced slot
    ///
    /// # Safety
    ///
    /// Same contract as [`as_ref`](Self::as_ref), plus the usual exclusivity
    /// requirement for mutable references.
    #[inline]
    pub unsafe fn as_mut<'a>(self) -> &'a mut T {
        &mut *self.ptr
    }

    /// Get a reference to the slot `offset` positions past this one
    ///
    /// # Safety
    ///
    /// Same contract as [`as_ref`](Self::as_ref) for the offset slot.
    #[inline]
    pub unsafe fn at<'a>(self, offset: usize) -> &'a T {
        &*self.ptr.wrapping_add(offset)
    }

    /// Copy the referenced value out without moving it
    ///
    /// # Safety
    ///
    /// Same contract as [`as_ref`](Self::as_ref); the value is duplicated
    /// bitwise, so the slot must be treated as moved-from unless `T: Copy`.
    #[inline]
    pub unsafe fn read(self) -> T {
        self.ptr.read()
    }
}

impl<T> Clone for Cursor<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<T> {}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.ptr).finish()
    }
}

impl<T> PartialEq for Cursor<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Eq for Cursor<T> {}

impl<T> PartialOrd for Cursor<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Cursor<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.ptr.cmp(&other.ptr)
    }
}

impl<T> Add<usize> for Cursor<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: usize) -> Self {
        Self::new(self.ptr.wrapping_add(rhs))
    }
}

impl<T> Sub<usize> for Cursor<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: usize) -> Self {
        Self::new(self.ptr.wrapping_sub(rhs))
    }
}

impl<T> AddAssign<usize> for Cursor<T> {
    #[inline]
    fn add_assign(&mut self, rhs: usize) {
        self.ptr = self.ptr.wrapping_add(rhs);
    }
}

impl<T> SubAssign<usize> for Cursor<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: usize) {
        self.ptr = self.ptr.wrapping_sub(rhs);
    }
}

impl<T> Sub for Cursor<T> {
    type Output = isize;

    /// Signed slot distance between two cursors into the same buffer
    #[inline]
    fn sub(self, rhs: Self) -> isize {
        let elem = mem::size_of::<T>();
        if elem == 0 {
            // Zero-size elements collapse every position
            return 0;
        }
        (self.ptr as isize).wrapping_sub(rhs.ptr as isize) / elem as isize
    }
}

//------------------------------------------------------------------------------------------------------------------------------

/// Reverse cursor, walking the same range end-to-start
///
/// The internal reference point is the slot the cursor logically addresses,
/// one position *behind* its forward-traversal counterpart. Incrementing
/// moves toward lower addresses; ordering is defined through the forward
/// equivalents, so "greater" consistently means later in traversal order.
pub struct ReverseCursor<T> {
    inner: Cursor<T>,
}

impl<T> ReverseCursor<T> {
    #[inline]
    pub(crate) fn new(inner: Cursor<T>) -> Self {
        Self { inner }
    }

    /// Get the equivalent forward cursor, one position ahead of the internal
    /// reference point
    #[inline]
    pub fn forward(self) -> Cursor<T> {
        self.inner + 1
    }

    /// Get the raw position of the addressed slot
    #[inline]
    pub fn as_ptr(self) -> *mut T {
        self.inner.as_ptr()
    }

    /// Move one slot further in reverse traversal order (toward the begin)
    #[inline]
    pub fn advance(&mut self) {
        self.inner.retreat();
    }

    /// Move one slot back in reverse traversal order (toward the end)
    #[inline]
    pub fn retreat(&mut self) {
        self.inner.advance();
    }

    /// Get a reference to the addressed slot
    ///
    /// # Safety
    ///
    /// Same contract as [`Cursor::as_ref`].
    #[inline]
    pub unsafe fn as_ref<'a>(self) -> &'a T {
        self.inner.as_ref()
    }

    /// Get a mutable reference to the addressed slot
    ///
    /// # Safety
    ///
    /// Same contract as [`Cursor::as_mut`].
    #[inline]
    pub unsafe fn as_mut<'a>(self) -> &'a mut T {
        self.inner.as_mut()
    }

    /// Get a reference to the slot `offset` positions further in reverse
    /// traversal order
    ///
    /// # Safety
    ///
    /// Same contract as [`Cursor::as_ref`] for the offset slot.
    #[inline]
    pub unsafe fn at<'a>(self, offset: usize) -> &'a T {
        (self.inner - offset).as_ref()
    }
}

impl<T> Clone for ReverseCursor<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ReverseCursor<T> {}

impl<T> fmt::Debug for ReverseCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReverseCursor").field(&self.inner.ptr).finish()
    }
}

impl<T> PartialEq for ReverseCursor<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Eq for ReverseCursor<T> {}

impl<T> PartialOrd for ReverseCursor<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ReverseCursor<T> {
    /// Later in reverse traversal order means lower address
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        other.inner.cmp(&self.inner)
    }
}

impl<T> Add<usize> for ReverseCursor<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: usize) -> Self {
        Self::new(self.inner - rhs)
    }
}

impl<T> Sub<usize> for ReverseCursor<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: usize) -> Self {
        Self::new(self.inner + rhs)
    }
}

impl<T> AddAssign<usize> for ReverseCursor<T> {
    #[inline]
    fn add_assign(&mut self, rhs: usize) {
        self.inner -= rhs;
    }
}

impl<T> SubAssign<usize> for ReverseCursor<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: usize) {
        self.inner += rhs;
    }
}

impl<T> Sub for ReverseCursor<T> {
    type Output = isize;

    /// Signed distance in reverse traversal order
    #[inline]
    fn sub(self, rhs: Self) -> isize {
        rhs.inner - self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::{Cursor, ReverseCursor};

    fn cursors(slice: &mut [i32]) -> (Cursor<i32>, Cursor<i32>) {
        let begin = Cursor::new(slice.as_mut_ptr());
        let end = begin + slice.len();
        (begin, end)
    }

    #[test]
    fn forward_arithmetic() {
        let mut data = [1, 3, -7, 10];
        let (begin, end) = cursors(&mut data);

        let mut it = begin;
        unsafe {
            assert_eq!(*it.as_ref(), 1);
            it.advance();
            assert_eq!(*it.as_ref(), 3);
            it += 2;
            assert_eq!(*it.as_ref(), 10);
            it.retreat();
            assert_eq!(*it.as_ref(), -7);
            it -= 1;
            assert_eq!(*it.as_ref(), 3);
            assert_eq!(*(it + 1).as_ref(), -7);
            assert_eq!(*(it - 1).as_ref(), 1);
            assert_eq!(*begin.at(2), -7);
            assert_eq!(begin.read(), 1);
        }

        assert_eq!(end - begin, 4);
        assert_eq!(begin - end, -4);
    }

    #[test]
    fn forward_ordering() {
        let mut data = [0; 4];
        let (begin, end) = cursors(&mut data);

        assert!(begin < end);
        assert!(begin <= end);
        assert!(end > begin);
        assert!(end >= begin);
        assert_ne!(begin, end);
        assert_eq!(begin + 4, end);
    }

    #[test]
    fn reverse_walks_backward() {
        let mut data = [1, 3, -7, 10];
        let (begin, end) = cursors(&mut data);

        let mut it = ReverseCursor::new(end - 1);
        unsafe {
            assert_eq!(*it.as_ref(), 10);
            it.advance();
            assert_eq!(*it.as_ref(), -7);
            it += 2;
            assert_eq!(*it.as_ref(), 1);
            it.retreat();
            assert_eq!(*it.as_ref(), 3);
            assert_eq!(*it.at(1), 1);
        }

        let rbegin = ReverseCursor::new(end - 1);
        let rend = ReverseCursor::new(begin - 1);
        assert_eq!(rend - rbegin, 4);
        assert!(rbegin < rend);
        assert!(rbegin + 4 == rend);
    }

    #[test]
    fn reverse_forward_equivalence() {
        let mut data = [5, 6, 7];
        let (_, end) = cursors(&mut data);

        let rbegin = ReverseCursor::new(end - 1);
        // The forward counterpart is one ahead of the internal position
        assert_eq!(rbegin.forward(), end);
        unsafe {
            assert_eq!(*(rbegin + 1).forward().as_ref(), 7);
        }
    }
}
