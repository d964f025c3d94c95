//! Per-type configuration of a [`HybridVec`](crate::HybridVec).
//!
//! A [`Policy`] fixes two things for every vector that names it:
//! - the growth factor applied when a push finds the vector full;
//! - a pair of hooks invoked around every heap allocation and release.
//!
//! The hooks observe allocations, they never take part in them, so a policy
//! cannot change whether an operation succeeds.
//!
//! ```
//! use hybridvec::{HybridVec, policy::Policy};
//!
//! struct Triple;
//!
//! impl Policy for Triple {
//!     const GROWTH_FACTOR: usize = 3;
//! }
//!
//! let mut vec: HybridVec<u32, Triple> = HybridVec::new();
//! let inline = vec.capacity();
//! for i in 0..=inline as u32 {
//!     vec.push(i);
//! }
//! assert_eq!(vec.capacity(), inline * 3);
//! ```

use core::{alloc::Layout, marker::PhantomData};

/// Growth factor and allocation observer of a [`HybridVec`](crate::HybridVec).
///
/// All items have defaults, an empty `impl Policy for X {}` behaves like [`DefaultPolicy`].
pub trait Policy {
    /// Multiplier used by automatic growth.
    ///
    /// The next capacity is `max(capacity, K) * GROWTH_FACTOR`, raised to at least
    /// `capacity + 1`, so factors of `0` or `1` degrade to linear growth instead of stalling.
    const GROWTH_FACTOR: usize = 2;

    /// Called after a heap buffer described by `layout` has been obtained.
    #[inline(always)]
    fn on_allocate(layout: &Layout) {
        let _ = layout;
    }

    /// Called right before a heap buffer described by `layout` is returned to the allocator.
    #[inline(always)]
    fn on_release(layout: &Layout) {
        let _ = layout;
    }
}

/// A silent policy with a fixed growth factor.
pub struct Growth<const FACTOR: usize>;

impl<const FACTOR: usize> Policy for Growth<FACTOR> {
    const GROWTH_FACTOR: usize = FACTOR;
}

/// Doubles on growth and observes nothing.
pub type DefaultPolicy = Growth<2>;

/// Wraps another policy and reports every allocation and release through [`tracing`].
///
/// Events are emitted at `DEBUG` level with the byte size and alignment of the buffer.
///
/// ```
/// use hybridvec::{HybridVec, policy::Logged};
///
/// let mut vec: HybridVec<u64, Logged> = HybridVec::new();
/// vec.extend(0..64);
/// assert!(vec.is_heap());
/// ```
pub struct Logged<P = DefaultPolicy>(PhantomData<P>);

impl<P: Policy> Policy for Logged<P> {
    const GROWTH_FACTOR: usize = P::GROWTH_FACTOR;

    #[inline]
    fn on_allocate(layout: &Layout) {
        tracing::debug!(
            size = layout.size(),
            align = layout.align(),
            "allocated heap buffer"
        );
        P::on_allocate(layout);
    }

    #[inline]
    fn on_release(layout: &Layout) {
        tracing::debug!(
            size = layout.size(),
            align = layout.align(),
            "released heap buffer"
        );
        P::on_release(layout);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::Counting;
    use super::*;
    use crate::HybridVec;

    #[test]
    fn default_factor_is_two() {
        assert_eq!(DefaultPolicy::GROWTH_FACTOR, 2);
        assert_eq!(<Logged as Policy>::GROWTH_FACTOR, 2);
        assert_eq!(<Logged<Growth<4>> as Policy>::GROWTH_FACTOR, 4);
    }

    #[test]
    fn logged_forwards_to_inner() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut vec: HybridVec<u64, Logged<Counting>> = HybridVec::new();
            vec.extend(0..10);
            assert!(vec.is_heap());
            assert_eq!(Counting::allocations(), 1);
            drop(vec);
            assert_eq!(Counting::releases(), 1);
            assert_eq!(Counting::live_bytes(), 0);
        });
    }

    #[test]
    fn linear_growth_still_progresses() {
        let mut vec: HybridVec<u64, Growth<1>> = HybridVec::new();
        let inline = vec.capacity();
        vec.extend(0..inline as u64);
        vec.push(0);
        assert_eq!(vec.capacity(), inline + 1);
        vec.push(0);
        assert_eq!(vec.capacity(), inline + 2);
    }
}
