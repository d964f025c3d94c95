use core::{fmt, marker::PhantomData};
use serde_core::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
};

use crate::{HybridVec, policy::Policy};

/// Upper bound on what an untrusted length hint may preallocate.
const MAX_PREALLOC_BYTES: usize = 1 << 20;

impl<T: Serialize, P: Policy> Serialize for HybridVec<T, P> {
    /// Serialize a `HybridVec` as a sequence.
    ///
    /// The format is identical whether the data is inline or on the heap.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>, P: Policy> Deserialize<'de> for HybridVec<T, P> {
    /// Deserialize a `HybridVec` from a sequence.
    ///
    /// Sequences longer than the inline capacity end up on the heap.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HybridVecVisitor<T, P> {
            _marker: PhantomData<(T, fn() -> P)>,
        }

        impl<'de, T: Deserialize<'de>, P: Policy> Visitor<'de> for HybridVecVisitor<T, P> {
            type Value = HybridVec<T, P>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let limit = MAX_PREALLOC_BYTES / core::mem::size_of::<T>().max(1);
                let mut vec = HybridVec::with_capacity(seq.size_hint().unwrap_or(0).min(limit));

                while let Some(element) = seq.next_element()? {
                    vec.push(element);
                }

                Ok(vec)
            }
        }

        deserializer.deserialize_seq(HybridVecVisitor {
            _marker: PhantomData,
        })
    }
}
