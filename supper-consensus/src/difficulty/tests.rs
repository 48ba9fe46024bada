//! Tests for difficulty adjustment and difficulty transitions.

use supper_chain::{
    block::{self, Header},
    chain_ancestry::{
        generate::{header_chain, unix_time},
        HeaderChain,
    },
    parameters::ConsensusParams,
    work::difficulty::CompactDifficulty,
};


/// A realistic mainnet difficulty.
const BITS: CompactDifficulty = CompactDifficulty(0x1d00ffff);

/// The time of the first generated block.
const START_TIME: i64 = 1_700_000_000;

/// Returns a chain of one complete adjustment period for `params`.
///
/// The first block has `first_bits`, the others have `bits`. Every block has
/// `START_TIME`, except the tip, which is `timespan` seconds later.
fn one_period_chain(
    params: &ConsensusParams,
    timespan: i64,
    first_bits: CompactDifficulty,
    bits: CompactDifficulty,
) -> HeaderChain {
    let interval = params.difficulty_adjustment_interval();

    header_chain((0..interval).map(|height| {
        if height == 0 {
            (START_TIME, first_bits)
        } else if height + 1 == interval {
            (START_TIME + timespan, bits)
        } else {
            (START_TIME, bits)
        }
    }))
}

/// Returns a candidate header with `time`.
///
/// The candidate's previous hash and bits are not used by difficulty
/// adjustment.
fn candidate_at(time: i64) -> Header {
    Header::new(block::Hash([0; 32]), unix_time(time), BITS)
}
