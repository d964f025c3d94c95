use alloc::alloc::{alloc, dealloc};
use core::{alloc::Layout, marker::PhantomData, mem, ptr, ptr::NonNull};

use crate::{
    error::{Error, Result},
    policy::Policy,
    utils::IsZST,
};

/// An exclusively owned heap allocation for `cap` values of `T`.
///
/// The buffer never tracks which slots are initialized, that is the job of
/// [`HeapVec`](crate::heap_vec::HeapVec). Dropping it returns the memory to
/// the global allocator without touching the contents.
///
/// A capacity of zero, or any zero sized `T`, owns no allocation and uses a
/// dangling (but non-null) pointer.
pub(crate) struct RawBuf<T, P: Policy> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<(T, fn() -> P)>,
}

// SAFETY: the buffer is uniquely owned, like `Box<[T]>`.
unsafe impl<T: Send, P: Policy> Send for RawBuf<T, P> {}
unsafe impl<T: Sync, P: Policy> Sync for RawBuf<T, P> {}

impl<T, P: Policy> Drop for RawBuf<T, P> {
    fn drop(&mut self) {
        if let Some(layout) = self.layout() {
            P::on_release(&layout);
            // SAFETY: allocated in `try_allocate` with exactly this layout.
            unsafe { dealloc(self.ptr.as_ptr().cast(), layout) };
        }
    }
}

impl<T, P: Policy> RawBuf<T, P> {
    /// A buffer that owns nothing.
    #[inline]
    pub(crate) const fn dangling() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: if T::IS_ZST { usize::MAX } else { 0 },
            _marker: PhantomData,
        }
    }

    /// Obtains room for `cap` values.
    pub(crate) fn try_allocate(cap: usize) -> Result<Self> {
        if T::IS_ZST || cap == 0 {
            return Ok(Self::dangling());
        }

        let layout = Layout::array::<T>(cap).map_err(|_| Error::CapacityOverflow)?;
        // SAFETY: `layout` has a non-zero size.
        let ptr = unsafe { alloc(layout) };
        let ptr = NonNull::new(ptr.cast::<T>()).ok_or(Error::AllocationFailure { layout })?;
        P::on_allocate(&layout);

        Ok(Self {
            ptr,
            cap,
            _marker: PhantomData,
        })
    }

    /// Moves the first `len` values into a fresh buffer of `new_cap` slots and
    /// releases the old one.
    ///
    /// On error nothing is moved and `self` keeps its buffer.
    ///
    /// # Safety
    /// `len <= self.capacity()` and `len <= new_cap`.
    pub(crate) unsafe fn try_reallocate(&mut self, new_cap: usize, len: usize) -> Result<()> {
        debug_assert!(len <= self.cap && len <= new_cap);
        if T::IS_ZST {
            return Ok(());
        }

        let mut fresh = Self::try_allocate(new_cap)?;
        // SAFETY: both buffers hold at least `len` slots and are distinct allocations.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), fresh.ptr.as_ptr(), len) };
        mem::swap(self, &mut fresh);
        // `fresh` now owns the old buffer; its values were moved out bitwise.
        drop(fresh);
        Ok(())
    }

    #[inline(always)]
    pub(crate) const fn capacity(&self) -> usize {
        self.cap
    }

    #[inline(always)]
    pub(crate) const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// The layout this buffer was allocated with, `None` when nothing is owned.
    #[inline]
    fn layout(&self) -> Option<Layout> {
        if T::IS_ZST || self.cap == 0 {
            None
        } else {
            // SAFETY: the same layout was validated by `Layout::array` at allocation.
            Some(unsafe {
                Layout::from_size_align_unchecked(
                    self.cap * mem::size_of::<T>(),
                    mem::align_of::<T>(),
                )
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{DefaultPolicy, testing::Counting};

    #[test]
    fn zero_capacity_owns_nothing() {
        let buf = RawBuf::<u32, Counting>::try_allocate(0).unwrap();
        assert_eq!(buf.capacity(), 0);
        drop(buf);
        assert_eq!(Counting::allocations(), 0);
        assert_eq!(Counting::releases(), 0);
    }

    #[test]
    fn allocation_is_released_once() {
        let buf = RawBuf::<u32, Counting>::try_allocate(10).unwrap();
        assert_eq!(buf.capacity(), 10);
        assert_eq!(Counting::live_bytes(), 40);
        drop(buf);
        assert_eq!(Counting::allocations(), 1);
        assert_eq!(Counting::releases(), 1);
        assert_eq!(Counting::live_bytes(), 0);
    }

    #[test]
    fn reallocate_moves_prefix() {
        let mut buf = RawBuf::<u64, Counting>::try_allocate(4).unwrap();
        unsafe {
            for i in 0..3 {
                buf.as_ptr().add(i).write(i as u64 * 10);
            }
            let before = buf.as_ptr();
            buf.try_reallocate(16, 3).unwrap();
            assert_ne!(before, buf.as_ptr());
            assert_eq!(buf.capacity(), 16);
            assert_eq!(*buf.as_ptr().add(2), 20);
        }
        assert_eq!(Counting::releases(), 1);
        assert_eq!(Counting::live_bytes(), 16 * 8);
    }

    #[test]
    fn overflow_is_reported() {
        let err = RawBuf::<u64, DefaultPolicy>::try_allocate(usize::MAX).err();
        assert_eq!(err, Some(Error::CapacityOverflow));
    }

    #[test]
    fn zero_sized_never_allocates() {
        let buf = RawBuf::<(), Counting>::try_allocate(1000).unwrap();
        assert_eq!(buf.capacity(), usize::MAX);
        assert_eq!(Counting::allocations(), 0);
    }
}
