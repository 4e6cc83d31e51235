use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem,
    ops::{Deref, DerefMut, Index, IndexMut},
    ptr,
    slice::{self, SliceIndex},
};

use scopeguard::ScopeGuard;

use super::{Cursor, RawBuffer, ReverseCursor};
use crate::alloc::UseAlloc;
use crate::error::VectorError;

/// Allocator-aware dynamic array
///
/// A `Vector<T>` owns one contiguous heap block of `capacity()` slots, the
/// leading `len()` of which hold live elements; the rest are raw storage and
/// are never exposed. Every byte it touches is routed through the allocator
/// selected at construction (the registry default unless told otherwise),
/// and an instance sticks with that allocator for its whole life.
///
/// Growth doubles the capacity (an empty vector grows to one slot first), so
/// appending is amortized O(1). [`reserve`](Self::reserve) is exact: it
/// produces precisely the requested capacity.
///
/// Cursors handed out by [`begin`](Self::begin)/[`end`](Self::end) (and the
/// reverse pair) are invalidated by any capacity-changing operation; see
/// [`Cursor`].
pub struct Vector<T> {
    len: usize,
    buf: RawBuffer<T>,
    _p: PhantomData<T>,
}

impl<T> Vector<T> {
    /// Create an empty vector using the registry's default allocator
    ///
    /// No memory is allocated until the first capacity-requiring operation.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::new_in(UseAlloc::Default)
    }

    /// Create an empty vector using the selected allocator
    #[inline]
    #[must_use]
    pub fn new_in(alloc: UseAlloc) -> Self {
        Self {
            len: 0,
            buf: RawBuffer::new(alloc),
            _p: PhantomData,
        }
    }

    /// Create an empty vector with exactly `capacity` slots preallocated
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, UseAlloc::Default)
    }

    /// Create an empty vector with exactly `capacity` slots preallocated
    /// from the selected allocator
    #[inline]
    #[must_use]
    pub fn with_capacity_in(capacity: usize, alloc: UseAlloc) -> Self {
        Self {
            len: 0,
            buf: RawBuffer::with_capacity(capacity, alloc),
            _p: PhantomData,
        }
    }

    /// Number of live elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector holds no live elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Id of the allocator backing this vector
    #[inline]
    pub fn allocator_id(&self) -> u16 {
        self.buf.allocator_id()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    fn check_index(&self, index: usize) -> Result<(), VectorError> {
        if index < self.len {
            Ok(())
        } else {
            Err(VectorError::OutOfRange { index, len: self.len })
        }
    }

    /// Checked access to the element at `index`
    pub fn at(&self, index: usize) -> Result<&T, VectorError> {
        self.check_index(index)?;
        // SAFETY: `index` is within the live range
        Ok(unsafe { &*self.as_ptr().add(index) })
    }

    /// Checked mutable access to the element at `index`
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, VectorError> {
        self.check_index(index)?;
        // SAFETY: `index` is within the live range
        Ok(unsafe { &mut *self.as_mut_ptr().add(index) })
    }

    /// Reference to the first element
    ///
    /// # Panics
    ///
    /// Panics when the vector is empty.
    pub fn front(&self) -> &T {
        assert!(!self.is_empty(), "front on an empty vector");
        // SAFETY: Slot 0 is live
        unsafe { &*self.as_ptr() }
    }

    /// Mutable reference to the first element
    ///
    /// # Panics
    ///
    /// Panics when the vector is empty.
    pub fn front_mut(&mut self) -> &mut T {
        assert!(!self.is_empty(), "front on an empty vector");
        // SAFETY: Slot 0 is live
        unsafe { &mut *self.as_mut_ptr() }
    }

    /// Reference to the last element
    ///
    /// # Panics
    ///
    /// Panics when the vector is empty.
    pub fn back(&self) -> &T {
        assert!(!self.is_empty(), "back on an empty vector");
        // SAFETY: Slot `len - 1` is live
        unsafe { &*self.as_ptr().add(self.len - 1) }
    }

    /// Mutable reference to the last element
    ///
    /// # Panics
    ///
    /// Panics when the vector is empty.
    pub fn back_mut(&mut self) -> &mut T {
        assert!(!self.is_empty(), "back on an empty vector");
        let last = self.len - 1;
        // SAFETY: Slot `len - 1` is live
        unsafe { &mut *self.as_mut_ptr().add(last) }
    }

    /// Destroy all live elements, keeping the allocation
    pub fn clear(&mut self) {
        let elems: *mut [T] = self.as_mut_slice();
        // Shrink the live range first so a panicking element drop can't
        // cause a double drop
        self.len = 0;
        // SAFETY: The slice covers exactly the previously live range
        unsafe { ptr::drop_in_place(elems) };
    }

    /// Grow to exactly `new_capacity` slots; a no-op when the vector already
    /// holds at least that many
    ///
    /// Live elements relocate into the new block before the old one is
    /// released.
    ///
    /// # Panics
    ///
    /// Panics if the allocator refuses the request.
    pub fn reserve(&mut self, new_capacity: usize) {
        if let Err(err) = self.try_reserve(new_capacity) {
            panic!("failed to reserve capacity: {err}");
        }
    }

    /// Fallible form of [`reserve`](Self::reserve)
    ///
    /// On failure the vector's capacity, length, and contents are untouched.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), VectorError> {
        self.buf.try_reserve_exact(new_capacity).map(|_| ())
    }

    /// Append an element, growing first if the buffer is full
    ///
    /// The value is taken by move; no duplication happens.
    pub fn push(&mut self, value: T) {
        self.grow_for_push();
        // SAFETY: `len < capacity` after the growth check
        unsafe { self.as_mut_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Construct an element straight into the next slot
    ///
    /// Capacity is ensured before `f` runs, so the constructed value is
    /// written in place without an intermediate move through a full buffer's
    /// reallocation.
    pub fn push_with<F>(&mut self, f: F)
    where
        F: FnOnce() -> T,
    {
        self.grow_for_push();
        // SAFETY: `len < capacity` after the growth check
        unsafe { self.as_mut_ptr().add(self.len).write(f()) };
        self.len += 1;
    }

    fn grow_for_push(&mut self) {
        if self.len == self.buf.capacity() {
            if let Err(err) = self.buf.grow_amortized(self.len, 1) {
                panic!("failed to grow vector: {err}");
            }
        }
    }

    /// Remove and return the last element, or `None` on an empty vector
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            // SAFETY: The slot was live and is now outside the live range
            Some(unsafe { self.as_ptr().add(self.len).read() })
        }
    }

    /// Insert `value` immediately before the slot `at` references, shifting
    /// that slot and everything after it one position to the right
    ///
    /// The cursor must reference a live slot: the end sentinel (and any
    /// position outside the live range) is rejected with
    /// [`VectorError::OutOfRange`]. Appending is [`push`](Self::push)'s job.
    ///
    /// Returns a cursor to the inserted element, which may live in a
    /// relocated buffer; all previously derived cursors are invalid if
    /// growth occurred.
    pub fn insert(&mut self, at: Cursor<T>, value: T) -> Result<Cursor<T>, VectorError> {
        let index = self.cursor_index(at)?;

        if self.len == self.buf.capacity() {
            self.buf.grow_amortized(self.len, 1)?;
        }

        unsafe {
            let ptr = self.as_mut_ptr().add(index);
            // Shift everything over to make the hole
            ptr::copy(ptr, ptr.add(1), self.len - index);
            ptr::write(ptr, value);
        }
        self.len += 1;

        Ok(Cursor::new(self.as_mut_ptr().wrapping_add(index)))
    }

    /// Translate a cursor into a live-slot index
    fn cursor_index(&self, at: Cursor<T>) -> Result<usize, VectorError> {
        let byte_off = (at.as_ptr() as usize).wrapping_sub(self.as_ptr() as usize);
        let elem = mem::size_of::<T>();
        let index = if elem == 0 {
            byte_off
        } else if byte_off % elem != 0 {
            // A misaligned position can't reference any slot
            usize::MAX
        } else {
            byte_off / elem
        };
        self.check_index(index)?;
        Ok(index)
    }

    /// Exchange buffer, length, and capacity with `other` in O(1)
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.buf, &mut other.buf);
    }

    /// Cursor referencing the first slot
    #[inline]
    pub fn begin(&self) -> Cursor<T> {
        Cursor::new(self.as_ptr() as *mut T)
    }

    /// Cursor referencing the end sentinel, one past the last live slot
    #[inline]
    pub fn end(&self) -> Cursor<T> {
        Cursor::new((self.as_ptr() as *mut T).wrapping_add(self.len))
    }

    /// Reverse cursor referencing the last live slot
    #[inline]
    pub fn rbegin(&self) -> ReverseCursor<T> {
        ReverseCursor::new(self.end() - 1)
    }

    /// Reverse cursor referencing the one-before-begin sentinel
    #[inline]
    pub fn rend(&self) -> ReverseCursor<T> {
        ReverseCursor::new(self.begin() - 1)
    }
}

impl<T: Clone> Vector<T> {
    /// Create a vector of exactly `n` slots, each holding a clone of `value`
    #[must_use]
    pub fn filled(n: usize, value: T) -> Self {
        Self::filled_in(n, value, UseAlloc::Default)
    }

    /// Create a vector of exactly `n` clones of `value` from the selected
    /// allocator
    ///
    /// If a clone panics partway, the elements constructed so far are
    /// destroyed in reverse order and the fresh buffer is released before
    /// the panic propagates.
    #[must_use]
    pub fn filled_in(n: usize, value: T, alloc: UseAlloc) -> Self {
        let mut this = Self::with_capacity_in(n, alloc);
        let ptr = this.as_mut_ptr();

        let mut constructed = scopeguard::guard(0usize, move |initialized| unsafe {
            for i in (0..initialized).rev() {
                ptr::drop_in_place(ptr.add(i));
            }
        });
        for i in 0..n {
            // SAFETY: Slot `i` is within the fresh buffer and raw
            unsafe { ptr.add(i).write(value.clone()) };
            *constructed += 1;
        }
        ScopeGuard::into_inner(constructed);

        this.len = n;
        this
    }

    /// Create a vector holding clones of the source slice, sized exactly to
    /// the source
    #[must_use]
    pub fn from_slice(src: &[T]) -> Self {
        Self::from_slice_in(src, UseAlloc::Default)
    }

    /// Create a vector holding clones of the source slice from the selected
    /// allocator
    #[must_use]
    pub fn from_slice_in(src: &[T], alloc: UseAlloc) -> Self {
        let mut this = Self::with_capacity_in(src.len(), alloc);
        // SAFETY: The buffer holds exactly `src.len()` raw slots
        unsafe { this.clone_into_raw(src) };
        this
    }

    /// Clone `src` into this vector's raw buffer, with rollback on panic
    ///
    /// # Safety
    ///
    /// The vector must be empty with `capacity() >= src.len()`.
    unsafe fn clone_into_raw(&mut self, src: &[T]) {
        debug_assert!(self.len == 0 && self.capacity() >= src.len());
        let ptr = self.as_mut_ptr();

        let mut constructed = scopeguard::guard(0usize, move |initialized| {
            for i in (0..initialized).rev() {
                ptr::drop_in_place(ptr.add(i));
            }
        });
        for (i, item) in src.iter().enumerate() {
            ptr.add(i).write(item.clone());
            *constructed += 1;
        }
        ScopeGuard::into_inner(constructed);

        self.len = src.len();
    }
}

impl<T: Default> Vector<T> {
    /// Create a vector of exactly `n` slots, each holding `T::default()`
    #[must_use]
    pub fn filled_default(n: usize) -> Self {
        Self::filled_default_in(n, UseAlloc::Default)
    }

    /// Create a vector of exactly `n` default values from the selected
    /// allocator
    #[must_use]
    pub fn filled_default_in(n: usize, alloc: UseAlloc) -> Self {
        let mut this = Self::with_capacity_in(n, alloc);
        let ptr = this.as_mut_ptr();

        let mut constructed = scopeguard::guard(0usize, move |initialized| unsafe {
            for i in (0..initialized).rev() {
                ptr::drop_in_place(ptr.add(i));
            }
        });
        for i in 0..n {
            // SAFETY: Slot `i` is within the fresh buffer and raw
            unsafe { ptr.add(i).write(T::default()) };
            *constructed += 1;
        }
        ScopeGuard::into_inner(constructed);

        this.len = n;
        this
    }
}

//------------------------------------------------------------------------------------------------------------------------------

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        // SAFETY: Exactly the live range is dropped; the buffer releases its
        // block afterwards
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len)) };
    }
}

impl<T> Default for Vector<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    /// Deep copy: a fresh buffer of the source's capacity, populated with
    /// clones of the live elements
    ///
    /// The copy uses the same allocator as the source. A clone panic tears
    /// down the partially built copy; the source is never touched.
    fn clone(&self) -> Self {
        let mut this = Self::with_capacity_in(self.capacity(), UseAlloc::Id(self.allocator_id()));
        // SAFETY: The fresh buffer holds at least `len` raw slots
        unsafe { this.clone_into_raw(self.as_slice()) };
        this
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        if self.capacity() < source.len() {
            // Too small to reuse; trade the block for a right-sized one
            self.buf = RawBuffer::with_capacity(source.capacity(), UseAlloc::Id(self.allocator_id()));
        }
        // SAFETY: Cleared above and capacity checked
        unsafe { self.clone_into_raw(source.as_slice()) };
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        // SAFETY: The pointer is non-null and aligned even when unallocated,
        // and `[0, len)` is the live range
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for Vector<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: See `deref`
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for Vector<T> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T: Hash> Hash for Vector<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(self.as_slice(), state)
    }
}

impl<T, U> PartialEq<Vector<U>> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vector<U>) -> bool {
        self[..] == other[..]
    }
}

impl<T, U> PartialEq<[U]> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self[..] == *other
    }
}

impl<T, U> PartialEq<&[U]> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self[..] == **other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self[..] == other[..]
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: PartialOrd> PartialOrd for Vector<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for Vector<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut this = Self::with_capacity(iter.size_hint().0);
        for value in iter {
            this.push(value);
        }
        this
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    #[inline]
    fn from(s: &[T]) -> Self {
        Self::from_slice(s)
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(arr: [T; N]) -> Self {
        let mut this = Self::with_capacity(N);
        for value in arr {
            this.push(value);
        }
        this
    }
}

// The raw buffer pointer blocks the auto impls; element ownership is the
// only thing that matters here
unsafe impl<T: Send> Send for Vector<T> {}
unsafe impl<T: Sync> Sync for Vector<T> {}

#[doc(hidden)]
#[macro_export]
macro_rules! __count_exprs {
    () => { 0usize };
    ($head:expr $(, $rest:expr)* $(,)?) => { 1usize + $crate::__count_exprs!($($rest),*) };
}

/// Construct a [`Vector`] with exact capacity from a list of values
#[macro_export]
macro_rules! vector {
    () => {
        $crate::vector::Vector::new()
    };
    ($($val:expr),+ $(,)?) => {
        {
            let mut arr = $crate::vector::Vector::with_capacity($crate::__count_exprs!($($val),+));
            $(
                arr.push($val);
            )+
            arr
        }
    };
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::Vector;
    use crate::error::VectorError;

    #[test]
    fn new_is_unallocated() {
        let v = Vector::<u32>::new();
        assert!(v.is_empty());
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn filled_is_exact() {
        let v = Vector::filled(4, 10.5f64);
        assert_eq!(v.len(), 4);
        assert_eq!(v.capacity(), 4);
        assert!(v.iter().all(|&x| x == 10.5));

        let v = Vector::<String>::filled_default(3);
        assert_eq!(v.len(), 3);
        assert!(v.iter().all(String::is_empty));
    }

    #[test]
    fn push_follows_doubling_policy() {
        let mut v = Vector::new();
        let mut caps = Vec::new();
        for i in 0..9 {
            v.push(i);
            caps.push(v.capacity());
        }
        assert_eq!(caps, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
    }

    #[test]
    fn at_checks_the_live_range() {
        let mut v = Vector::from_slice(&[1, 2, 3]);
        assert_eq!(v.at(2), Ok(&3));
        assert_eq!(v.at(3), Err(VectorError::OutOfRange { index: 3, len: 3 }));
        *v.at_mut(0).unwrap() = 9;
        assert_eq!(v[0], 9);

        v.clear();
        assert_eq!(v.at(0), Err(VectorError::OutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn clear_keeps_the_allocation() {
        let mut v = Vector::from_slice(&[1, 2, 3, 4]);
        let ptr = v.as_ptr();
        v.clear();
        assert!(v.is_empty());
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.as_ptr(), ptr);
    }

    #[test]
    fn reserve_is_exact() {
        let mut v = Vector::from_slice(&[1.3f32, 2.5, -0.6]);
        v.reserve(2);
        assert_eq!(v.capacity(), 3);
        v.reserve(10);
        assert_eq!(v.capacity(), 10);
        assert_eq!(v.len(), 3);
        assert_eq!(v, [1.3f32, 2.5, -0.6]);
    }

    #[test]
    fn try_reserve_rejects_unrepresentable_capacity() {
        let mut v = Vector::<u64>::new();
        v.push(1);
        assert_eq!(v.try_reserve((1 << 61) + 1), Err(VectorError::CapacityOverflow));
        assert_eq!(v.capacity(), 1);
        assert_eq!(v, [1]);
    }

    #[test]
    fn insert_rejects_the_end_sentinel() {
        let mut v = Vector::filled(4, 100);
        let end = v.end();
        assert!(matches!(v.insert(end, 0), Err(VectorError::OutOfRange { .. })));
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn insert_shifts_right() {
        let mut v = Vector::filled(4, 100);
        let it = v.insert(v.begin(), 200).unwrap();
        // SAFETY: The returned cursor references the inserted element
        assert_eq!(unsafe { *it.as_ref() }, 200);
        assert_eq!(*v.front(), 200);
        assert_eq!(v.at(1), Ok(&100));
        assert_eq!(v.len(), 5);

        let it = v.insert(v.begin() + 2, 300).unwrap();
        assert_eq!(unsafe { *it.as_ref() }, 300);
        assert_eq!(v, [200, 100, 300, 100, 100, 100]);
    }

    #[test]
    fn swap_exchanges_wholesale() {
        let mut a = Vector::filled(2, 0);
        let mut b = Vector::new();
        let a_ptr = a.as_ptr();
        b.swap(&mut a);
        assert!(a.is_empty());
        assert_eq!(a.capacity(), 0);
        assert_eq!(b.len(), 2);
        assert_eq!(b.as_ptr(), a_ptr);
    }

    #[test]
    fn equality_is_size_and_content_sensitive() {
        let a = Vector::<i32>::new();
        let b = Vector::<i32>::new();
        assert_eq!(a, b);

        let c = Vector::from_slice(&[1, 2, 3]);
        let d = Vector::from_slice(&[1, 2, 3]);
        let e = Vector::from_slice(&[1, 2]);
        let f = Vector::from_slice(&[1, 2, 4]);
        assert_eq!(c, c);
        assert_eq!(c, d);
        assert_eq!(d, c);
        assert_ne!(c, e);
        assert_ne!(c, f);
    }

    #[test]
    fn vector_macro_has_exact_capacity() {
        let v = vector![1, 2, 3];
        assert_eq!(v.len(), 3);
        assert_eq!(v.capacity(), 3);
        assert_eq!(v, [1, 2, 3]);

        let empty: Vector<u8> = vector![];
        assert_eq!(empty.capacity(), 0);
    }

    #[test]
    fn zero_size_elements() {
        let mut v = Vector::new();
        for _ in 0..100 {
            v.push(());
        }
        assert_eq!(v.len(), 100);
        assert_eq!(v.capacity(), usize::MAX);
        assert_eq!(v.pop(), Some(()));
        assert_eq!(v.len(), 99);
    }

    /// Clone panics once `remaining` hits zero; every drop is tallied.
    struct Flaky {
        tag: usize,
        drops: Arc<AtomicUsize>,
        remaining: Arc<AtomicUsize>,
    }

    impl Flaky {
        fn new(drops: &Arc<AtomicUsize>, remaining: &Arc<AtomicUsize>) -> Self {
            Self {
                tag: 0,
                drops: Arc::clone(drops),
                remaining: Arc::clone(remaining),
            }
        }
    }

    impl Clone for Flaky {
        fn clone(&self) -> Self {
            if self.remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                panic!("clone budget exhausted");
            }
            Self {
                tag: self.tag + 1,
                drops: Arc::clone(&self.drops),
                remaining: Arc::clone(&self.remaining),
            }
        }
    }

    impl Drop for Flaky {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn filled_rolls_back_on_clone_panic() {
        let drops = Arc::new(AtomicUsize::new(0));
        let remaining = Arc::new(AtomicUsize::new(4));

        let result = std::panic::catch_unwind({
            let drops = Arc::clone(&drops);
            let remaining = Arc::clone(&remaining);
            move || Vector::filled(8, Flaky::new(&drops, &remaining))
        });
        assert!(result.is_err());

        // 3 successful clones torn down, plus the fill value itself
        assert_eq!(drops.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn clone_panic_leaves_source_untouched() {
        let drops = Arc::new(AtomicUsize::new(0));
        let remaining = Arc::new(AtomicUsize::new(usize::MAX));

        let mut source = Vector::new();
        for _ in 0..6 {
            source.push(Flaky::new(&drops, &remaining));
        }

        // The next 3 clones succeed, the 4th panics
        remaining.store(4, Ordering::SeqCst);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| source.clone()));
        assert!(result.is_err());

        assert_eq!(drops.load(Ordering::SeqCst), 3);
        assert_eq!(source.len(), 6);
        assert!(source.iter().all(|f| f.tag == 0));

        drop(source);
        assert_eq!(drops.load(Ordering::SeqCst), 9);
    }

    proptest! {
        #[test]
        fn pushed_capacity_is_next_power_of_two(values in proptest::collection::vec(any::<i32>(), 1..200)) {
            let mut v = Vector::new();
            for (k, x) in values.iter().enumerate() {
                v.push(*x);
                prop_assert_eq!(v.len(), k + 1);
                prop_assert_eq!(v.capacity(), (k + 1).next_power_of_two());
            }
            prop_assert_eq!(v.as_slice(), values.as_slice());
        }

        #[test]
        fn at_errs_iff_out_of_range(len in 0usize..40, probe in 0usize..80) {
            let v: Vector<usize> = (0..len).collect();
            prop_assert_eq!(v.at(probe).is_ok(), probe < len);
        }

        #[test]
        fn copies_are_independent(values in proptest::collection::vec(any::<u8>(), 1..50)) {
            let original = Vector::from_slice(&values);
            let mut copy = original.clone();
            copy[0] = copy[0].wrapping_add(1);
            prop_assert_eq!(original.as_slice(), values.as_slice());
            prop_assert_ne!(original[0], copy[0]);
        }
    }
}
