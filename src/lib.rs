//! ## Intro
//!
//! A growable vector that keeps small contents inside the vector value itself
//! and moves them to an owned heap buffer, once, when they outgrow it.
//!
//! The inline capacity is not a type parameter. It is derived from the element
//! type so that the inline elements plus a one-byte length fill exactly the
//! bytes a heap descriptor (pointer, length, capacity) occupies. A
//! `HybridVec<T>` therefore never pays extra space for its inline mode.
//!
//! ```
//! # use hybridvec::{HybridVec, hybridvec};
//! let mut vec: HybridVec<i32> = hybridvec![1, 2, 3];
//! assert!(vec.is_inline()); // No allocation yet.
//!
//! // Outgrowing the inline capacity promotes to the heap.
//! vec.extend(4..=10);
//! assert!(vec.is_heap());
//! assert_eq!(vec, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
//! ```
//!
//! ## Layouts
//!
//! | | Inline | Heap |
//! |---|---|---|
//! | Storage | inside the value | owned buffer |
//! | Capacity | [`HybridVec::INLINE_CAPACITY`] | grows by [`Policy::GROWTH_FACTOR`] |
//! | Length counter | `u8` | `usize` |
//!
//! The transition is one-way: a vector that has been on the heap stays there.
//!
//! ## Errors
//!
//! Checked accessors ([`at`](HybridVec::at), [`front`](HybridVec::front),
//! [`pop_back`](HybridVec::pop_back), [`insert`](HybridVec::insert)) and every
//! `try_*` allocating method return [`Error`]. The non-`try` allocating
//! methods behave like [`Vec`]: they panic on capacity overflow and abort
//! through [`handle_alloc_error`](alloc::alloc::handle_alloc_error) on
//! allocator failure.
//!
//! ## Configuration
//!
//! The second type parameter is a [`Policy`]: a growth factor plus hooks that
//! observe every heap allocation and release. [`policy::Logged`] reports them
//! through `tracing`.
//!
//! ## `no_std` support
//!
//! This crate requires only `core` and `alloc`.
//!
//! ## Optional features
//!
//! ### `std`
//!
//! Implements `std::io::Write` for `HybridVec<u8, P>`.
//!
//! ### `serde`
//!
//! Implements `serde::Serialize` and `serde::Deserialize` for [`HybridVec`].
//!
//! [`Vec`]: alloc::vec::Vec
//! [`Policy`]: policy::Policy
//! [`Policy::GROWTH_FACTOR`]: policy::Policy::GROWTH_FACTOR
#![no_std]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

mod heap_vec;
mod inline_vec;
mod raw_buf;
mod utils;

pub mod error;
pub mod policy;

pub mod hybrid_vec;

#[cfg(feature = "serde")]
mod serde;

#[cfg(feature = "std")]
mod std_io;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use hybrid_vec::HybridVec;
#[doc(inline)]
pub use policy::{DefaultPolicy, Policy};
