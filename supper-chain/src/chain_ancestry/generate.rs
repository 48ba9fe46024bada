//! Generate header chains for tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    block::{self, Header, Height},
    work::difficulty::CompactDifficulty,
};

use super::HeaderChain;

/// Returns a distinct, deterministic hash for the block at `height`.
///
/// These are not real header hashes: they only link generated headers.
pub fn fake_hash(height: Height) -> block::Hash {
    let mut bytes = [0xa5; 32];
    bytes[..4].copy_from_slice(&height.0.to_le_bytes());
    block::Hash(bytes)
}

/// Returns the time `seconds` after the Unix epoch.
pub fn unix_time(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .expect("test times are in range")
}

/// Returns a chain with one block for each `(time, difficulty_threshold)`
/// pair, starting at the genesis block.
///
/// Panics if `blocks` is empty.
pub fn header_chain<I>(blocks: I) -> HeaderChain
where
    I: IntoIterator<Item = (i64, CompactDifficulty)>,
{
    let mut blocks = blocks.into_iter();
    let (genesis_time, genesis_bits) = blocks.next().expect("chains have a genesis block");

    let mut chain = HeaderChain::new(
        fake_hash(Height::MIN),
        Header::new(block::Hash([0; 32]), unix_time(genesis_time), genesis_bits),
    );

    for (time, bits) in blocks {
        push_header(&mut chain, time, bits);
    }

    chain
}

/// Adds a block with `time` and `bits` to the tip of `chain`.
pub fn push_header(chain: &mut HeaderChain, time: i64, bits: CompactDifficulty) {
    use super::ChainAncestry;

    let tip = *chain.tip();
    let height = tip.height.next().expect("test chains are short");

    chain
        .push(
            fake_hash(height),
            Header::new(tip.hash, unix_time(time), bits),
        )
        .expect("generated headers build on the tip");
}

/// Returns a chain of `len` blocks spaced `spacing` seconds apart, starting
/// at `start_time`, all with `bits`.
pub fn evenly_spaced_chain(
    len: u32,
    start_time: i64,
    spacing: i64,
    bits: CompactDifficulty,
) -> HeaderChain {
    header_chain((0..len).map(|height| (start_time + i64::from(height) * spacing, bits)))
}
