use chrono::{DateTime, Utc};

use crate::work::difficulty::CompactDifficulty;

use super::Hash;

/// The block header fields used by proof-of-work difficulty checks.
///
/// How are blocks chained together? They are chained together via the
/// backwards reference (previous header hash) present in the block
/// header. Each block points backwards to its parent, all the way
/// back to the genesis block (the first block in the blockchain).
///
/// Serialization and hashing of the full header belong to the block
/// structure crates, so only the fields this crate reads are kept here.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// The hash of the previous block, used to create a chain of blocks back to
    /// the genesis block.
    pub previous_block_hash: Hash,

    /// The block timestamp is a Unix epoch time (UTC) when the miner
    /// started hashing the header (according to the miner).
    pub time: DateTime<Utc>,

    /// An encoded version of the target threshold this block's header
    /// hash must be less than or equal to, in the nBits format.
    pub difficulty_threshold: CompactDifficulty,
}

impl Header {
    /// Returns a new header with the given fields.
    pub fn new(
        previous_block_hash: Hash,
        time: DateTime<Utc>,
        difficulty_threshold: CompactDifficulty,
    ) -> Header {
        Header {
            previous_block_hash,
            time,
            difficulty_threshold,
        }
    }

    /// Returns the block time in seconds since the Unix epoch.
    ///
    /// Difficulty arithmetic works on whole seconds, matching the 32-bit
    /// `nTime` header field.
    pub fn block_time(&self) -> i64 {
        self.time.timestamp()
    }
}
