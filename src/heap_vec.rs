use core::{ptr, slice};

use crate::{
    error::{Result, infallible},
    inline_vec::InlineVec,
    policy::Policy,
    raw_buf::RawBuf,
    utils::cold_path,
};

/// Heap layout of a [`HybridVec`](crate::HybridVec): an owned buffer plus a length.
///
/// Slots `[0, len)` are initialized. Dropping drops them, then the buffer
/// releases its allocation.
pub(crate) struct HeapVec<T, P: Policy> {
    buf: RawBuf<T, P>,
    len: usize,
}

impl<T, P: Policy> Drop for HeapVec<T, P> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, P: Policy> HeapVec<T, P> {
    #[inline]
    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            buf: RawBuf::try_allocate(capacity)?,
            len: 0,
        })
    }

    /// Moves every element of `inline` into a new heap buffer of `capacity` slots.
    ///
    /// `inline` is left empty on success and untouched on error.
    pub(crate) fn try_from_inline(inline: &mut InlineVec<T>, capacity: usize) -> Result<Self> {
        let len = inline.len();
        debug_assert!(capacity >= len);
        let mut vec = Self::try_with_capacity(capacity)?;
        // SAFETY: `capacity >= len`, and `inline` gives up the moved values.
        unsafe {
            ptr::copy_nonoverlapping(inline.as_ptr(), vec.as_mut_ptr(), len);
            inline.set_len(0);
        }
        vec.len = len;
        Ok(vec)
    }

    /// Reallocates to exactly `capacity` slots, keeping every element.
    ///
    /// Serves both growth and shrinking. On error the vector is unchanged.
    #[inline]
    pub(crate) fn try_resize_buffer(&mut self, capacity: usize) -> Result<()> {
        assert!(capacity >= self.len, "buffer capacity below length");
        // SAFETY: checked above, `len <= cap` holds by invariant.
        unsafe { self.buf.try_reallocate(capacity, self.len) }
    }

    #[inline(always)]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub(crate) const fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline(always)]
    pub(crate) const fn is_full(&self) -> bool {
        self.len >= self.buf.capacity()
    }

    #[inline(always)]
    pub(crate) const fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    #[inline(always)]
    pub(crate) const fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_ptr()
    }

    /// # Safety
    /// See [`HybridVec::set_len`](crate::HybridVec::set_len).
    #[inline(always)]
    pub(crate) const unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.buf.capacity());
        self.len = new_len;
    }

    #[inline(always)]
    pub(crate) const fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is initialized.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub(crate) const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `[0, len)` is initialized.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// # Safety
    /// `len < capacity` before the call.
    #[inline(always)]
    pub(crate) unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(!self.is_full());
        // SAFETY: slot `len` is inside the buffer.
        unsafe { ptr::write(self.as_mut_ptr().add(self.len), value) };
        self.len += 1;
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            cold_path();
            None
        } else {
            self.len -= 1;
            // SAFETY: the slot was initialized and is no longer counted.
            unsafe { Some(ptr::read(self.as_ptr().add(self.len))) }
        }
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        let old = self.len;
        if old > len {
            self.len = len;
            // SAFETY: `[len, old)` was initialized and is no longer counted.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                    self.as_mut_ptr().add(len),
                    old - len,
                ));
            }
        }
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.truncate(0);
    }
}

impl<T: Clone, P: Policy> Clone for HeapVec<T, P> {
    /// Allocates the source's capacity, then clones element by element.
    ///
    /// A panicking `clone` drops what was cloned so far and frees the buffer.
    fn clone(&self) -> Self {
        let mut vec = infallible(Self::try_with_capacity(self.capacity()));
        for item in self.as_slice() {
            // SAFETY: same capacity, never more elements than `self`.
            unsafe { vec.push_unchecked(item.clone()) };
        }
        vec
    }
}
