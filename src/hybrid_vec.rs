use alloc::vec::Vec;
use core::{
    fmt,
    iter::FusedIterator,
    mem::{self, ManuallyDrop},
    ptr, slice,
};

use crate::{
    error::{Error, Result, infallible},
    heap_vec::HeapVec,
    inline_vec::InlineVec,
    policy::{DefaultPolicy, Policy},
    utils::{IsZST, cold_path},
};

/// The two physical layouts. The variant is the only source of truth for which one is live.
enum Storage<T, P: Policy> {
    Inline(InlineVec<T>),
    Heap(HeapVec<T, P>),
}

/// A vector stored inline while small, promoted once to an owned heap buffer.
///
/// The inline capacity [`INLINE_CAPACITY`](HybridVec::INLINE_CAPACITY) is not
/// chosen by the user: it is the number of `T` that fit in the bytes a heap
/// descriptor (pointer, length, capacity) would occupy, minus the one byte
/// used for the inline length. On a 64-bit target that is 23 bytes, so five
/// `i32`, two `u64`, or no `String` at all.
///
/// Promotion is one-way. Once [`is_heap`](HybridVec::is_heap) returns `true`
/// it stays `true` for the rest of the value's life, even after
/// [`pop`](HybridVec::pop), [`clear`](HybridVec::clear) or
/// [`shrink_to_fit`](HybridVec::shrink_to_fit). That keeps transitions simple
/// at the cost of holding heap memory after the vector shrinks again.
///
/// Growth is configured per type by the [`Policy`] parameter `P`.
///
/// # Example
///
/// ```
/// use hybridvec::HybridVec;
///
/// let mut vec: HybridVec<i32> = HybridVec::new();
/// assert!(vec.is_inline());
/// assert_eq!(vec.capacity(), HybridVec::<i32>::INLINE_CAPACITY);
///
/// for i in 0..HybridVec::<i32>::INLINE_CAPACITY as i32 {
///     vec.push(i);
/// }
/// assert!(vec.is_inline());
///
/// // One more element than fits promotes the storage to the heap.
/// vec.push(-1);
/// assert!(vec.is_heap());
///
/// // And it never goes back.
/// vec.clear();
/// vec.shrink_to_fit();
/// assert!(vec.is_heap());
/// ```
#[repr(transparent)]
pub struct HybridVec<T, P: Policy = DefaultPolicy>(Storage<T, P>);

/// Creates a [`HybridVec`] containing the arguments.
///
/// The syntax is similar to [`vec!`](https://doc.rust-lang.org/std/macro.vec.html).
/// Layout is picked from the number of elements: inline if they fit, heap otherwise.
///
/// # Examples
///
/// ```
/// # use hybridvec::{hybridvec, HybridVec};
/// let vec: HybridVec<String> = hybridvec![];
/// let vec: HybridVec<i64> = hybridvec![1; 5]; // Needs `Clone`.
/// let vec: HybridVec<_> = hybridvec![1, 2, 3, 4];
/// assert_eq!(vec, [1, 2, 3, 4]);
/// ```
#[macro_export]
macro_rules! hybridvec {
    [] => { $crate::HybridVec::new() };
    [$elem:expr; $n:expr] => { $crate::HybridVec::from_elem($elem, $n) };
    [$($item:expr),+ $(,)?] => { $crate::HybridVec::from_buf([ $($item),+ ]) };
}

impl<T, P: Policy> HybridVec<T, P> {
    /// Number of elements held without a heap allocation.
    pub const INLINE_CAPACITY: usize = InlineVec::<T>::CAPACITY;

    /// Constructs a new, empty, inline `HybridVec`. Never allocates.
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let vec: HybridVec<u8> = HybridVec::new();
    /// assert_eq!(vec.len(), 0);
    /// assert!(vec.is_inline());
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self(Storage::Inline(InlineVec::new()))
    }

    /// Constructs an empty vector able to hold `capacity` elements.
    ///
    /// Stays inline when `capacity <= INLINE_CAPACITY`, otherwise allocates
    /// exactly `capacity` slots on the heap.
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let vec: HybridVec<u8> = HybridVec::with_capacity(4);
    /// assert!(vec.is_inline());
    ///
    /// let vec: HybridVec<u8> = HybridVec::with_capacity(100);
    /// assert!(vec.is_heap());
    /// assert_eq!(vec.capacity(), 100);
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        infallible(Self::try_with_capacity(capacity))
    }

    /// Fallible form of [`with_capacity`](HybridVec::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        if capacity > Self::INLINE_CAPACITY {
            Ok(Self(Storage::Heap(HeapVec::try_with_capacity(capacity)?)))
        } else {
            Ok(Self::new())
        }
    }

    /// Creates a `HybridVec` from an array, inline if it fits.
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let vec: HybridVec<i32> = HybridVec::from_buf([1, 2, 3]);
    /// assert_eq!(vec.len(), 3);
    /// assert!(vec.is_inline());
    /// ```
    #[inline]
    pub fn from_buf<const N: usize>(arr: [T; N]) -> Self {
        Self::from_buf_with_capacity(arr, N)
    }

    /// Creates a `HybridVec` from an array with room for `capacity` elements.
    ///
    /// The layout is chosen from `capacity`, not from the array length.
    ///
    /// # Panics
    /// Panics if `capacity < N`.
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let vec: HybridVec<i32> = HybridVec::from_buf_with_capacity([1, 2], 64);
    /// assert!(vec.is_heap());
    /// assert_eq!(vec.capacity(), 64);
    /// assert_eq!(vec, [1, 2]);
    /// ```
    pub fn from_buf_with_capacity<const N: usize>(arr: [T; N], capacity: usize) -> Self {
        assert!(capacity >= N, "capacity is smaller than the array length");

        let mut vec = Self::with_capacity(capacity);
        let arr = ManuallyDrop::new(arr);
        // SAFETY: `capacity >= N` slots are available, `arr` will not drop the moved values.
        unsafe {
            ptr::copy_nonoverlapping(arr.as_ptr(), vec.as_mut_ptr(), N);
            vec.set_len(N);
        }
        vec
    }

    /// Return `true` if the elements live in an owned heap buffer.
    #[inline(always)]
    pub const fn is_heap(&self) -> bool {
        matches!(self.0, Storage::Heap(_))
    }

    /// Return `true` if the elements live inside the vector itself.
    #[inline(always)]
    pub const fn is_inline(&self) -> bool {
        matches!(self.0, Storage::Inline(_))
    }

    /// Returns the number of elements in the vector.
    #[inline]
    pub const fn len(&self) -> usize {
        match &self.0 {
            Storage::Inline(vec) => vec.len(),
            Storage::Heap(vec) => vec.len(),
        }
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements the vector can hold without reallocating.
    ///
    /// This is [`INLINE_CAPACITY`](HybridVec::INLINE_CAPACITY) while inline.
    #[inline]
    pub const fn capacity(&self) -> usize {
        match &self.0 {
            Storage::Inline(_) => Self::INLINE_CAPACITY,
            Storage::Heap(vec) => vec.capacity(),
        }
    }

    /// Upper bound on the length of any `HybridVec<T>`: the largest `usize`
    /// divided by the element size.
    ///
    /// This is not a promise that such a vector can actually be built, the
    /// allocator refuses anything above `isize::MAX` bytes.
    #[inline]
    pub const fn max_size() -> usize {
        if T::IS_ZST {
            usize::MAX
        } else {
            usize::MAX / mem::size_of::<T>()
        }
    }

    #[inline(always)]
    const fn is_full(&self) -> bool {
        match &self.0 {
            Storage::Inline(vec) => vec.is_full(),
            Storage::Heap(vec) => vec.is_full(),
        }
    }

    /// Returns a raw pointer to the first element of the live layout.
    ///
    /// The pointer is invalidated by promotion, growth, and `shrink_to_fit`.
    /// It also moves with the vector while the vector is inline.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        match &self.0 {
            Storage::Inline(vec) => vec.as_ptr(),
            Storage::Heap(vec) => vec.as_ptr(),
        }
    }

    /// Returns a raw mutable pointer to the first element of the live layout.
    ///
    /// See [`as_ptr`](HybridVec::as_ptr) for when it is invalidated.
    #[inline]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        match &mut self.0 {
            Storage::Inline(vec) => vec.as_mut_ptr(),
            Storage::Heap(vec) => vec.as_mut_ptr(),
        }
    }

    /// Forces the length of the vector to `new_len`.
    ///
    /// # Safety
    /// - `new_len` needs to be less than or equal to [`capacity`](HybridVec::capacity).
    /// - If the length is increased, the new elements must be initialized.
    /// - If the length is reduced, the dropped-out elements must be handled by the caller.
    #[inline]
    pub unsafe fn set_len(&mut self, new_len: usize) {
        // SAFETY: See function docs.
        unsafe {
            match &mut self.0 {
                Storage::Inline(vec) => vec.set_len(new_len),
                Storage::Heap(vec) => vec.set_len(new_len),
            }
        }
    }

    /// Extracts a slice containing the entire vector.
    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        match &self.0 {
            Storage::Inline(vec) => vec.as_slice(),
            Storage::Heap(vec) => vec.as_slice(),
        }
    }

    /// Extracts a mutable slice of the entire vector.
    #[inline]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.0 {
            Storage::Inline(vec) => vec.as_mut_slice(),
            Storage::Heap(vec) => vec.as_mut_slice(),
        }
    }

    /// Capacity to grow to when a push finds the vector full.
    fn next_capacity(capacity: usize) -> Result<usize> {
        let grown = capacity
            .max(Self::INLINE_CAPACITY)
            .checked_mul(P::GROWTH_FACTOR)
            .ok_or(Error::CapacityOverflow)?;
        let minimum = capacity.checked_add(1).ok_or(Error::CapacityOverflow)?;
        Ok(grown.max(minimum))
    }

    /// Moves the inline elements into a new heap buffer of `capacity` slots.
    ///
    /// Irreversible. Does nothing if already on the heap.
    #[cold]
    fn promote_to_heap(&mut self, capacity: usize) -> Result<()> {
        debug_assert!(self.is_inline());
        if let Storage::Inline(vec) = &mut self.0 {
            let heap = HeapVec::try_from_inline(vec, capacity)?;
            tracing::trace!(
                len = heap.len(),
                from = Self::INLINE_CAPACITY,
                to = capacity,
                "promoted inline storage to the heap"
            );
            self.0 = Storage::Heap(heap);
        }
        Ok(())
    }

    /// Makes room for exactly `capacity` elements, promoting if inline.
    fn try_grow_to(&mut self, capacity: usize) -> Result<()> {
        match &mut self.0 {
            Storage::Inline(_) => self.promote_to_heap(capacity),
            Storage::Heap(vec) => vec.try_resize_buffer(capacity),
        }
    }

    #[cold]
    fn try_grow_one(&mut self) -> Result<()> {
        let capacity = Self::next_capacity(self.capacity())?;
        self.try_grow_to(capacity)
    }

    /// Ensures `capacity() >= capacity`, growing to exactly `capacity` if needed.
    ///
    /// Never shrinks. Inline vectors are promoted when `capacity` exceeds
    /// [`INLINE_CAPACITY`](HybridVec::INLINE_CAPACITY).
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let mut vec: HybridVec<u8> = HybridVec::new();
    /// vec.ensure_capacity(50);
    /// assert_eq!(vec.capacity(), 50);
    ///
    /// vec.ensure_capacity(10);
    /// assert_eq!(vec.capacity(), 50);
    /// ```
    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        infallible(self.try_ensure_capacity(capacity))
    }

    /// Fallible form of [`ensure_capacity`](HybridVec::ensure_capacity).
    ///
    /// On error the vector is unchanged.
    pub fn try_ensure_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        self.try_grow_to(capacity)
    }

    /// Reserves room for `additional` more elements, exactly.
    ///
    /// Equivalent to `ensure_capacity(len + additional)`.
    ///
    /// ```
    /// # use hybridvec::{HybridVec, hybridvec};
    /// let mut vec: HybridVec<i32> = hybridvec![1];
    /// vec.reserve(10);
    /// assert_eq!(vec.capacity(), 11);
    /// ```
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        infallible(self.try_reserve(additional))
    }

    /// Fallible form of [`reserve`](HybridVec::reserve).
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let capacity = self
            .len()
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;
        self.try_ensure_capacity(capacity)
    }

    /// Reallocates a heap buffer down to the current length.
    ///
    /// Inline vectors are left alone, heap vectors stay on the heap.
    /// Zero sized elements never own a buffer, so their capacity stays
    /// `usize::MAX`.
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let mut vec: HybridVec<u8> = HybridVec::with_capacity(100);
    /// vec.extend([1, 2, 3]);
    /// vec.shrink_to_fit();
    /// assert_eq!(vec.capacity(), 3);
    /// assert!(vec.is_heap());
    /// ```
    pub fn shrink_to_fit(&mut self) {
        if let Storage::Heap(vec) = &mut self.0 {
            if vec.len() != vec.capacity() {
                infallible(vec.try_resize_buffer(vec.len()));
            }
        }
    }

    /// Appends an element, growing by the policy's factor if the vector is full.
    ///
    /// # Time complexity
    /// Amortized O(1).
    ///
    /// ```
    /// # use hybridvec::{HybridVec, hybridvec};
    /// let mut vec: HybridVec<i32> = hybridvec![1, 2];
    /// vec.push(3);
    /// assert_eq!(vec, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn push(&mut self, value: T) {
        infallible(self.try_push(value))
    }

    /// Fallible form of [`push`](HybridVec::push).
    ///
    /// Growth happens before the write. If it fails, `value` is dropped and
    /// the vector is unchanged.
    pub fn try_push(&mut self, value: T) -> Result<()> {
        if self.is_full() {
            cold_path();
            self.try_grow_one()?;
        }
        // SAFETY: there is at least one free slot now.
        unsafe {
            match &mut self.0 {
                Storage::Inline(vec) => vec.push_unchecked(value),
                Storage::Heap(vec) => vec.push_unchecked(value),
            }
        }
        Ok(())
    }

    /// Removes the last element and returns it, or `None` if empty.
    ///
    /// Never changes the layout.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        match &mut self.0 {
            Storage::Inline(vec) => vec.pop(),
            Storage::Heap(vec) => vec.pop(),
        }
    }

    /// Removes the last element and returns it.
    ///
    /// # Errors
    /// [`Error::Underflow`] if the vector is empty.
    ///
    /// ```
    /// # use hybridvec::{Error, HybridVec, hybridvec};
    /// let mut vec: HybridVec<i32> = hybridvec![7];
    /// assert_eq!(vec.pop_back(), Ok(7));
    /// assert_eq!(vec.pop_back(), Err(Error::Underflow));
    /// ```
    #[inline]
    pub fn pop_back(&mut self) -> Result<T> {
        self.pop().ok_or(Error::Underflow)
    }

    /// Removes every element, keeping capacity and layout.
    #[inline]
    pub fn clear(&mut self) {
        match &mut self.0 {
            Storage::Inline(vec) => vec.clear(),
            Storage::Heap(vec) => vec.clear(),
        }
    }

    /// Keeps the first `len` elements and drops the rest. Capacity is unchanged.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        match &mut self.0 {
            Storage::Inline(vec) => vec.truncate(len),
            Storage::Heap(vec) => vec.truncate(len),
        }
    }

    /// **Overwrites** the element at `index` with `value` and returns the old one.
    ///
    /// Despite the name, nothing is shifted and the length never changes.
    /// This is a replace-in-place.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] if `index >= len`; `value` is dropped.
    ///
    /// ```
    /// # use hybridvec::{HybridVec, hybridvec};
    /// let mut vec: HybridVec<char> = hybridvec!['a', 'b', 'c'];
    /// assert_eq!(vec.insert(1, 'x'), Ok('b'));
    /// assert_eq!(vec, ['a', 'x', 'c']);
    /// assert!(vec.insert(3, 'y').is_err());
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> Result<T> {
        let slot = self.at_mut(index)?;
        Ok(mem::replace(slot, value))
    }

    /// Bounds-checked access.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] if `index >= len`.
    ///
    /// ```
    /// # use hybridvec::{Error, HybridVec};
    /// let vec: HybridVec<i32> = HybridVec::new();
    /// assert_eq!(vec.at(100), Err(Error::OutOfRange { index: 100, len: 0 }));
    /// ```
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len();
        self.as_slice()
            .get(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] if `index >= len`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// The first element, same as `at(0)`.
    #[inline]
    pub fn front(&self) -> Result<&T> {
        self.at(0)
    }

    /// The first element, mutably.
    #[inline]
    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.at_mut(0)
    }

    /// The last element, same as `at(len - 1)`.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] with `index == 0` if the vector is empty.
    #[inline]
    pub fn back(&self) -> Result<&T> {
        self.at(self.len().saturating_sub(1))
    }

    /// The last element, mutably.
    #[inline]
    pub fn back_mut(&mut self) -> Result<&mut T> {
        self.at_mut(self.len().saturating_sub(1))
    }

    /// Exchanges contents and layouts with `other`.
    ///
    /// No allocation, no per-element work: the two values are swapped bitwise.
    ///
    /// ```
    /// # use hybridvec::{HybridVec, hybridvec};
    /// let mut a: HybridVec<i32> = hybridvec![1, 2];
    /// let mut b: HybridVec<i32> = HybridVec::with_capacity(100);
    /// a.swap(&mut b);
    /// assert!(a.is_heap() && b.is_inline());
    /// assert_eq!(b, [1, 2]);
    /// ```
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.0, &mut other.0);
    }

    /// Moves the contents out, leaving an empty inline vector behind.
    ///
    /// Heap buffers change owner without copying.
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let mut vec: HybridVec<u64> = (0..100).collect();
    /// let ptr = vec.as_ptr();
    ///
    /// let taken = vec.take();
    /// assert_eq!(taken.as_ptr(), ptr);
    /// assert!(vec.is_empty() && vec.is_inline());
    /// ```
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Converts into a [`Vec`] holding exactly `len` elements.
    pub fn into_vec(mut self) -> Vec<T> {
        let len = self.len();
        let mut vec = Vec::with_capacity(len);
        // SAFETY: `vec` has room for `len`; `self` forgets the moved values before drop.
        unsafe {
            ptr::copy_nonoverlapping(self.as_ptr(), vec.as_mut_ptr(), len);
            vec.set_len(len);
            self.set_len(0);
        }
        vec
    }
}

impl<T: Clone, P: Policy> HybridVec<T, P> {
    /// Creates a `HybridVec` with `num` copies of `elem`.
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let vec: HybridVec<i32> = HybridVec::from_elem(1, 4);
    /// assert_eq!(vec, [1, 1, 1, 1]);
    /// ```
    pub fn from_elem(elem: T, num: usize) -> Self {
        let mut vec = Self::with_capacity(num);
        vec.extend(core::iter::repeat_n(elem, num));
        vec
    }

    /// Clones and appends every element of `other`.
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.reserve(other.len());
        for item in other {
            self.push(item.clone());
        }
    }
}

impl<T: Clone, P: Policy> Clone for HybridVec<T, P> {
    /// Deep copy into storage of the same layout and capacity.
    ///
    /// ```
    /// # use hybridvec::{HybridVec, hybridvec};
    /// let a: HybridVec<i32> = hybridvec![1, 2, 3];
    /// let mut b = a.clone();
    /// b.push(4);
    /// assert_eq!(a, [1, 2, 3]);
    /// assert_eq!(b, [1, 2, 3, 4]);
    /// ```
    fn clone(&self) -> Self {
        match &self.0 {
            Storage::Inline(vec) => Self(Storage::Inline(vec.clone())),
            Storage::Heap(vec) => Self(Storage::Heap(vec.clone())),
        }
    }

    /// Copy-and-swap: builds the copy first, so a panicking `clone` leaves `self` intact.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T, P: Policy> Default for HybridVec<T, P> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Policy> core::ops::Deref for HybridVec<T, P> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, P: Policy> core::ops::DerefMut for HybridVec<T, P> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, P: Policy> fmt::Debug for HybridVec<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T, P: Policy> AsRef<[T]> for HybridVec<T, P> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, P: Policy> AsMut<[T]> for HybridVec<T, P> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, P: Policy> core::borrow::Borrow<[T]> for HybridVec<T, P> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, P: Policy> core::borrow::BorrowMut<[T]> for HybridVec<T, P> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: core::hash::Hash, P: Policy> core::hash::Hash for HybridVec<T, P> {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

/// Indexing panics when out of bounds. Use [`HybridVec::at`] for a `Result`,
/// or the slice's `get_unchecked` for no check at all.
impl<T, I: slice::SliceIndex<[T]>, P: Policy> core::ops::Index<I> for HybridVec<T, P> {
    type Output = I::Output;
    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T, I: slice::SliceIndex<[T]>, P: Policy> core::ops::IndexMut<I> for HybridVec<T, P> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: Ord, P: Policy> Ord for HybridVec<T, P> {
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: PartialOrd, P: Policy> PartialOrd for HybridVec<T, P> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Eq, P: Policy> Eq for HybridVec<T, P> {}

impl<T, U, P, Q> PartialEq<HybridVec<U, Q>> for HybridVec<T, P>
where
    T: PartialEq<U>,
    P: Policy,
    Q: Policy,
{
    #[inline]
    fn eq(&self, other: &HybridVec<U, Q>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U, P: Policy> PartialEq<[U]> for HybridVec<T, P> {
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, P: Policy> PartialEq<&[U]> for HybridVec<T, P> {
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, P: Policy, const N: usize> PartialEq<[U; N]> for HybridVec<T, P> {
    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U, P: Policy, const N: usize> PartialEq<&[U; N]> for HybridVec<T, P> {
    #[inline]
    fn eq(&self, other: &&[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U, P: Policy> PartialEq<Vec<U>> for HybridVec<T, P> {
    #[inline]
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, P: Policy> Extend<T> for HybridVec<T, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (hint, _) = iter.size_hint();
        self.reserve(hint);
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: 'a + Clone, P: Policy> Extend<&'a T> for HybridVec<T, P> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<T, P: Policy> FromIterator<T> for HybridVec<T, P> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<T, P: Policy, const N: usize> From<[T; N]> for HybridVec<T, P> {
    #[inline]
    fn from(value: [T; N]) -> Self {
        Self::from_buf(value)
    }
}

impl<T: Clone, P: Policy> From<&[T]> for HybridVec<T, P> {
    fn from(value: &[T]) -> Self {
        let mut vec = Self::with_capacity(value.len());
        vec.extend_from_slice(value);
        vec
    }
}

impl<T, P: Policy> From<Vec<T>> for HybridVec<T, P> {
    /// Moves the elements out of `value`; the `Vec`'s own buffer is freed.
    fn from(mut value: Vec<T>) -> Self {
        let len = value.len();
        let mut vec = Self::with_capacity(len);
        // SAFETY: `vec` has room for `len`; `value` forgets the moved values.
        unsafe {
            ptr::copy_nonoverlapping(value.as_ptr(), vec.as_mut_ptr(), len);
            value.set_len(0);
            vec.set_len(len);
        }
        vec
    }
}

impl<T, P: Policy> From<HybridVec<T, P>> for Vec<T> {
    #[inline]
    fn from(value: HybridVec<T, P>) -> Self {
        value.into_vec()
    }
}

impl<'a, T, P: Policy> IntoIterator for &'a HybridVec<T, P> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, P: Policy> IntoIterator for &'a mut HybridVec<T, P> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, P: Policy> IntoIterator for HybridVec<T, P> {
    type Item = T;
    type IntoIter = IntoIter<T, P>;

    #[inline]
    fn into_iter(mut self) -> Self::IntoIter {
        let end = self.len();
        // SAFETY: ownership of `[0, end)` moves to the iterator.
        unsafe { self.set_len(0) };
        IntoIter {
            vec: self,
            start: 0,
            end,
        }
    }
}

/// An iterator that consumes a [`HybridVec`] and yields its items by value.
///
/// The storage (inline or heap) moves into the iterator, nothing is copied.
pub struct IntoIter<T, P: Policy = DefaultPolicy> {
    /// Length is zero; `[start, end)` are the remaining live slots.
    vec: HybridVec<T, P>,
    start: usize,
    end: usize,
}

impl<T, P: Policy> IntoIter<T, P> {
    /// The remaining items.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[start, end)` is initialized and owned by the iterator.
        unsafe { slice::from_raw_parts(self.vec.as_ptr().add(self.start), self.end - self.start) }
    }

    /// The remaining items, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above.
        unsafe {
            slice::from_raw_parts_mut(
                self.vec.as_mut_ptr().add(self.start),
                self.end - self.start,
            )
        }
    }
}

impl<T, P: Policy> Drop for IntoIter<T, P> {
    fn drop(&mut self) {
        // SAFETY: drops the items not yet yielded; `vec` then frees the storage only.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T, P: Policy> Iterator for IntoIter<T, P> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            None
        } else {
            // SAFETY: `start` is a live slot that is given up right away.
            let item = unsafe { ptr::read(self.vec.as_ptr().add(self.start)) };
            self.start += 1;
            Some(item)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T, P: Policy> DoubleEndedIterator for IntoIter<T, P> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            None
        } else {
            self.end -= 1;
            // SAFETY: `end` was a live slot and is no longer counted.
            unsafe { Some(ptr::read(self.vec.as_ptr().add(self.end))) }
        }
    }
}

impl<T, P: Policy> ExactSizeIterator for IntoIter<T, P> {}

impl<T, P: Policy> FusedIterator for IntoIter<T, P> {}

impl<T: fmt::Debug, P: Policy> fmt::Debug for IntoIter<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
