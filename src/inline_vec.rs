use core::{
    mem::{MaybeUninit, size_of},
    ptr::{self, NonNull},
    slice,
};

use crate::utils::{IsZST, cold_path};

/// Size of the heap layout's descriptor: pointer, length and capacity.
pub(crate) const DESCRIPTOR_BYTES: usize = size_of::<(NonNull<u8>, usize, usize)>();

/// Bytes available to inline elements; the last descriptor byte holds the length.
pub(crate) const INLINE_BYTES: usize = DESCRIPTOR_BYTES - 1;

/// Inline layout of a [`HybridVec`](crate::HybridVec).
///
/// Elements live in a byte block aligned for `T`, so the whole struct occupies
/// the footprint of the heap descriptor (for `align_of::<T>() <= align_of::<usize>()`).
/// Slots `[0, len)` are initialized, the rest are unspecified.
#[repr(C)]
pub(crate) struct InlineVec<T> {
    _align: [T; 0],
    data: [MaybeUninit<u8>; INLINE_BYTES],
    len: u8,
}

impl<T> Drop for InlineVec<T> {
    // Storage is raw bytes, live elements must be dropped by hand.
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> InlineVec<T> {
    /// Number of `T` that fit into [`INLINE_BYTES`].
    ///
    /// Zero sized types consume no bytes and are bounded only by the `u8` length.
    pub(crate) const CAPACITY: usize = if T::IS_ZST {
        u8::MAX as usize
    } else {
        INLINE_BYTES / size_of::<T>()
    };

    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            _align: [],
            data: [MaybeUninit::uninit(); INLINE_BYTES],
            len: 0,
        }
    }

    #[inline(always)]
    pub(crate) const fn as_ptr(&self) -> *const T {
        &raw const self.data as *const T
    }

    #[inline(always)]
    pub(crate) const fn as_mut_ptr(&mut self) -> *mut T {
        &raw mut self.data as *mut T
    }

    #[inline(always)]
    pub(crate) const fn len(&self) -> usize {
        self.len as usize
    }

    /// # Safety
    /// - `new_len <= CAPACITY`.
    /// - Slots `[0, new_len)` must be initialized, and slots given up must not be dropped again.
    #[inline(always)]
    pub(crate) const unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= Self::CAPACITY);
        self.len = new_len as u8;
    }

    #[inline(always)]
    pub(crate) const fn is_full(&self) -> bool {
        self.len() >= Self::CAPACITY
    }

    #[inline(always)]
    pub(crate) const fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is initialized.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    #[inline(always)]
    pub(crate) const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `[0, len)` is initialized.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len()) }
    }

    /// # Safety
    /// `len < CAPACITY` before the call.
    #[inline(always)]
    pub(crate) const unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(!self.is_full());
        let len = self.len();
        // SAFETY: slot `len` is inside the block, see function docs.
        unsafe { ptr::write(self.as_mut_ptr().add(len), value) };
        self.len += 1;
    }

    #[inline]
    pub(crate) const fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            cold_path();
            None
        } else {
            self.len -= 1;
            // SAFETY: the slot was initialized and is no longer counted.
            unsafe { Some(ptr::read(self.as_ptr().add(self.len()))) }
        }
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        let old = self.len();
        if old > len {
            // Shrink first so a panicking destructor can't cause a double drop.
            self.len = len as u8;
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

impl<T: Clone> Clone for InlineVec<T> {
    fn clone(&self) -> Self {
        let mut vec = Self::new();
        for item in self.as_slice() {
            // SAFETY: `vec` never holds more than `self`.
            unsafe { vec.push_unchecked(item.clone()) };
        }
        vec
    }
}
