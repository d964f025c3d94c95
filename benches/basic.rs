//! See `README.md`

use core::hint;
use criterion::{Bencher, Criterion, criterion_group, criterion_main};
use hybridvec::HybridVec;
use smallvec::SmallVec;
use std::sync::OnceLock;

use rand::Rng;

/// Inline capacity of `HybridVec<u16>` on 64-bit targets.
const INLINE_SIZE: usize = HybridVec::<u16>::INLINE_CAPACITY;
const LARGE_SIZE: usize = 40000;

/// A function used to generate a random amount of data.
///
/// Random bounds keep the compiler from specializing the loops
/// on a data volume it can see at compile time.
#[inline(never)]
fn gen_one(start: usize, end: usize) -> usize {
    let mut rng = rand::rng();
    rng.random_range(start..end)
}

/// Number of elements in small tests, always within the inline capacity.
static SMALL_BOUND: OnceLock<usize> = OnceLock::new();

/// Number of elements in large tests.
static LARGE_BOUND: OnceLock<usize> = OnceLock::new();

/// Generate an array of random content of a specified length.
#[inline(never)]
fn gen_rand(len: usize, start: u16, end: u16) -> Box<[u16]> {
    let mut rng = rand::rng();
    let mut vec: Vec<u16> = Vec::with_capacity(len);
    for _ in 0..len {
        vec.push(rng.random_range(start..end));
    }
    vec.into_boxed_slice()
}

/// The operations every compared container provides.
trait VecLike: Clone {
    fn new_empty() -> Self;
    fn new_large() -> Self;
    fn push(&mut self, value: u16);
    fn pop(&mut self) -> Option<u16>;
    fn get_mut(&mut self, index: usize) -> &mut u16;
    fn extend_from(&mut self, data: &[u16]);
    /// Used for quickly setting vector contents during testing.
    ///
    /// We use u16 testing and do not need to call [`Drop`].
    fn set_len(&mut self, len: usize);
}

macro_rules! impl_vec_like {
    ($name:ty) => {
        impl VecLike for $name {
            #[inline(always)]
            fn new_empty() -> Self {
                <$name>::new()
            }
            #[inline(always)]
            fn new_large() -> Self {
                <$name>::with_capacity(LARGE_SIZE)
            }
            #[inline(always)]
            fn push(&mut self, value: u16) {
                <$name>::push(self, value)
            }
            #[inline(always)]
            fn pop(&mut self) -> Option<u16> {
                <$name>::pop(self)
            }
            #[inline(always)]
            fn get_mut(&mut self, index: usize) -> &mut u16 {
                &mut self[index]
            }
            #[inline(always)]
            fn extend_from(&mut self, data: &[u16]) {
                self.extend_from_slice(data);
            }
            #[inline(always)]
            fn set_len(&mut self, len: usize) {
                unsafe {
                    <$name>::set_len(self, len);
                }
            }
        }
    };
}

impl_vec_like!(Vec<u16>);
impl_vec_like!(SmallVec<u16, INLINE_SIZE>);
impl_vec_like!(HybridVec<u16>);

macro_rules! gen_bench_group {
    ($c:ident => $fn_name:ident) => {{
        let mut group_new = $c.benchmark_group(stringify!($fn_name));
        group_new.bench_function("Vec", |b| $fn_name::<Vec<u16>>(b));
        group_new.bench_function("HybridVec", |b| $fn_name::<HybridVec<u16>>(b));
        group_new.bench_function("SmallVec", |b| {
            $fn_name::<SmallVec<u16, INLINE_SIZE>>(b)
        });
    }};
}

fn bench_vec(c: &mut Criterion) {
    SMALL_BOUND.get_or_init(|| gen_one(INLINE_SIZE - 3, INLINE_SIZE + 1));
    LARGE_BOUND.get_or_init(|| gen_one(36000, 36003));
    gen_bench_group!(c => new_empty);
    gen_bench_group!(c => new_large);
    gen_bench_group!(c => push_small_from_empty);
    gen_bench_group!(c => push_large);
    gen_bench_group!(c => push_large_from_empty);
    gen_bench_group!(c => extend_large_from_empty);
    gen_bench_group!(c => pop_small);
    gen_bench_group!(c => pop_large);
    gen_bench_group!(c => index_small);
    gen_bench_group!(c => index_large);
    gen_bench_group!(c => clone_small);
}

/// Creation time of an empty vector. None of them allocate.
#[inline(never)]
fn new_empty<T: VecLike>(b: &mut Bencher) {
    b.iter(|| hint::black_box(T::new_empty()));
}

/// Creation time of a vector with capacity `40000`.
///
/// Every vector allocates, so the times should be close.
#[inline(never)]
fn new_large<T: VecLike>(b: &mut Bencher) {
    b.iter(|| hint::black_box(T::new_large()));
}

/// Fills an empty vector within the inline capacity.
///
/// Only `Vec` allocates here.
#[inline(never)]
fn push_small_from_empty<T: VecLike>(b: &mut Bencher) {
    let data = gen_rand(*SMALL_BOUND.get().unwrap(), 0, 9999);
    let index = gen_one(0, *SMALL_BOUND.get().unwrap());

    b.iter(|| {
        let mut vec = T::new_empty();
        // Read back some data so the pushes are not optimized out.
        let mut counter = 0u16;
        for item in &data {
            vec.push(*item);
        }
        counter = counter.wrapping_add(*vec.get_mut(index));
        hint::black_box(counter)
    });
}

/// Pre allocate capacity and only test the efficiency of `push`.
///
/// The data volume is 36000-36002.
#[inline(never)]
fn push_large<T: VecLike>(b: &mut Bencher) {
    let mut vec = T::new_large();
    let data = gen_rand(*LARGE_BOUND.get().unwrap(), 0, 9999);
    let index = gen_rand(10, 0, *LARGE_BOUND.get().unwrap() as _);

    b.iter(|| {
        let mut counter = 0u16;
        vec.set_len(0);
        for item in &data {
            vec.push(*item);
        }
        for item in &index {
            counter = counter.wrapping_add(*vec.get_mut(*item as usize));
        }
        hint::black_box(counter)
    });
    vec.set_len(0);
}

/// Not pre allocating, every container grows repeatedly.
///
/// `HybridVec` and `SmallVec` pay for one promotion out of inline storage.
#[inline(never)]
fn push_large_from_empty<T: VecLike>(b: &mut Bencher) {
    let data = gen_rand(*LARGE_BOUND.get().unwrap(), 0, 9999);
    let index = gen_rand(10, 0, *LARGE_BOUND.get().unwrap() as _);

    b.iter(|| {
        let mut vec = T::new_empty();
        let mut counter = 0u16;
        for item in &data {
            vec.push(*item);
        }
        for item in &index {
            counter = counter.wrapping_add(*vec.get_mut(*item as usize));
        }
        hint::black_box(counter)
    });
}

/// Bulk append into an empty vector: a single reservation then a copy.
#[inline(never)]
fn extend_large_from_empty<T: VecLike>(b: &mut Bencher) {
    let data = gen_rand(*LARGE_BOUND.get().unwrap(), 0, 9999);
    let index = gen_one(0, *LARGE_BOUND.get().unwrap());

    b.iter(|| {
        let mut vec = T::new_empty();
        vec.extend_from(&data);
        hint::black_box(*vec.get_mut(index))
    });
}

/// Test `pop` efficient, will not reallocate memory.
#[inline(never)]
fn pop_small<T: VecLike>(b: &mut Bencher) {
    let mut vec = T::new_empty();
    let num = *SMALL_BOUND.get().unwrap();
    for _ in 0..num {
        vec.push(0);
    }

    b.iter(|| {
        let mut counter = 0u16;
        vec.set_len(num);
        for _ in 1..num {
            unsafe {
                counter = counter.wrapping_add(vec.pop().unwrap_unchecked());
            }
        }
        hint::black_box(counter)
    });
    vec.set_len(0);
}

/// Test `pop` efficient, will not reallocate memory.
///
/// The data volume is 36000-36002.
#[inline(never)]
fn pop_large<T: VecLike>(b: &mut Bencher) {
    let mut vec = T::new_large();
    let num = *LARGE_BOUND.get().unwrap();
    vec.extend_from(&gen_rand(num, 0, 9999));

    b.iter(|| {
        let mut counter = 0u16;
        vec.set_len(num);
        for _ in 1..num {
            unsafe {
                counter = counter.wrapping_add(vec.pop().unwrap_unchecked());
            }
        }
        hint::black_box(counter)
    });
    vec.set_len(0);
}

/// Random indexing within the inline capacity.
#[inline(never)]
fn index_small<T: VecLike>(b: &mut Bencher) {
    let mut vec = T::new_empty();
    vec.extend_from(&gen_rand(INLINE_SIZE, 0, 9999));

    let index = gen_one(0, INLINE_SIZE);
    let range = gen_rand(10, 0, INLINE_SIZE as u16);

    b.iter(|| {
        let mut counter = 0u16;
        for item in &range {
            let slot = vec.get_mut(*item as usize);
            *slot = slot.wrapping_add(*item);
        }
        counter = counter.wrapping_add(*vec.get_mut(index));
        hint::black_box(counter)
    });
}

/// Random indexing over a heap buffer.
///
/// The data volume is 36000.
#[inline(never)]
fn index_large<T: VecLike>(b: &mut Bencher) {
    let mut vec = T::new_large();
    vec.extend_from(&gen_rand(36000, 0, 9999));

    let index = gen_one(0, 36000);
    let range = gen_rand(2000, 0, 36000);

    b.iter(|| {
        let mut counter = 0u16;
        for item in &range {
            let slot = vec.get_mut(*item as usize);
            *slot = slot.wrapping_add(*item);
        }
        counter = counter.wrapping_add(*vec.get_mut(index));
        hint::black_box(counter)
    });
}

/// Copying a vector that fits inline. Only `Vec` allocates.
#[inline(never)]
fn clone_small<T: VecLike>(b: &mut Bencher) {
    let mut vec = T::new_empty();
    vec.extend_from(&gen_rand(*SMALL_BOUND.get().unwrap(), 0, 9999));

    b.iter(|| hint::black_box(vec.clone()));
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(500)
        .warm_up_time(core::time::Duration::from_secs(3))
        .measurement_time(core::time::Duration::from_secs(12))
        .confidence_level(0.96)
        .noise_threshold(0.04);
    targets = bench_vec,
}
criterion_main!(benches);
