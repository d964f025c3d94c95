use core::mem::size_of;

/// Compile-time check for zero sized types.
pub(crate) trait IsZST {
    const IS_ZST: bool;
}

impl<T> IsZST for T {
    const IS_ZST: bool = size_of::<T>() == 0;
}

/// Marks the branch that calls it as unlikely.
#[cold]
#[inline]
pub(crate) const fn cold_path() {}
