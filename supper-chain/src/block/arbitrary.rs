//! Randomised property testing for [`Header`]s and [`Height`]s.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use crate::work::difficulty::CompactDifficulty;

use super::{Hash, Header, Height};

impl Arbitrary for Height {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        (Height::MIN.0..=Height::MAX.0).prop_map(Height).boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for Header {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        (
            any::<Hash>(),
            // block times are 32-bit unsigned integers
            0..=i64::from(u32::MAX),
            any::<CompactDifficulty>(),
        )
            .prop_map(|(previous_block_hash, timestamp, difficulty_threshold)| {
                let time = Utc
                    .timestamp_opt(timestamp, 0)
                    .single()
                    .expect("in-range number of seconds and valid nanosecond");

                Header::new(previous_block_hash, time, difficulty_threshold)
            })
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}
