//! Errors reported by [`HybridVec`](crate::HybridVec).
//!
//! Checked operations fail before touching the container, so an `Err`
//! always means the vector is exactly as it was before the call.

use core::alloc::Layout;

/// Failure of a checked or fallible [`HybridVec`](crate::HybridVec) operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A checked access addressed a slot outside `0..len`.
    #[error("index {index} is out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// `pop_back` was called on an empty vector.
    #[error("pop_back on an empty vector")]
    Underflow,

    /// The requested capacity does not fit in `usize` or in `isize::MAX` bytes.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The global allocator refused the request.
    #[error("memory allocation failed for {layout:?}")]
    AllocationFailure { layout: Layout },
}

/// Shorthand used across the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unwraps the result of an allocating operation the same way [`Vec`](alloc::vec::Vec) does:
/// overflow panics, allocator failure goes through [`handle_alloc_error`](alloc::alloc::handle_alloc_error).
#[inline]
pub(crate) fn infallible<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(Error::AllocationFailure { layout }) => alloc::alloc::handle_alloc_error(layout),
        Err(err) => panic!("{err}"),
    }
}
