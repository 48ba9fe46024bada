use super::difficulty::*;

use crate::block;

use proptest::{arbitrary::Arbitrary, prelude::*};

impl Arbitrary for ExpandedDifficulty {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        (any::<[u8; 32]>())
            .prop_map(|v| ExpandedDifficulty::from(U256::from_little_endian(&v)))
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for CompactDifficulty {
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        // Skew towards small values, so that random thresholds have a
        // realistic number of leading zero bytes.
        (any::<[u8; 32]>(), 0..=255usize)
            .prop_filter_map("zero CompactDifficulty values are invalid", |(bytes, shift)| {
                // A CompactDifficulty is generated using the difficulty
                // adjustment functions. Instead of using those functions, we
                // make a random ExpandedDifficulty, then convert it to a
                // CompactDifficulty.
                let expanded = ExpandedDifficulty::from_hash(&block::Hash(bytes));
                let expanded = ExpandedDifficulty::from(U256::from(expanded) >> shift);

                if expanded.is_zero() {
                    return None;
                }

                Some(expanded.to_compact())
            })
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}
