//! Errors that can occur when checking proof-of-work consensus rules.
//!
//! Each error variant corresponds to a consensus rule, so enumerating
//! all possible verification failures enumerates the consensus rules we
//! implement, and ensures that we don't reject blocks or transactions
//! for a non-enumerated reason.

use chrono::{DateTime, Utc};
use thiserror::Error;

use supper_chain::{
    block,
    work::difficulty::{CompactDifficulty, ExpandedDifficulty},
};

/// A block header that fails a proof-of-work rule.
///
/// The calling block validation code must reject the whole block.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum BlockError {
    #[error("block {0:?} has invalid difficulty threshold {2:?}: {1:?}")]
    InvalidDifficulty(block::Height, block::Hash, CompactDifficulty),

    #[error(
        "block {0:?} has a difficulty threshold {2:?} that is easier than the \
         proof-of-work limit {3:?}: {1:?}"
    )]
    TargetDifficultyLimit(
        block::Height,
        block::Hash,
        ExpandedDifficulty,
        ExpandedDifficulty,
    ),

    #[error(
        "block {0:?} has a hash that is easier than its difficulty threshold \
         {2:?}: {1:?}"
    )]
    DifficultyFilter(block::Height, block::Hash, ExpandedDifficulty),

    #[error(
        "block {0:?} has difficulty threshold {2:?}, but the adjusted difficulty \
         is {3:?}: {1:?}"
    )]
    WrongDifficultyThreshold(
        block::Height,
        block::Hash,
        CompactDifficulty,
        CompactDifficulty,
    ),

    #[error(
        "block {height:?} changes the difficulty threshold from {old:?} to \
         {new:?}, which is outside the permitted range"
    )]
    InvalidDifficultyTransition {
        height: block::Height,
        old: CompactDifficulty,
        new: CompactDifficulty,
    },

    #[error(
        "block {height:?} starts an adjustment period with time {time:?}, \
         which is more than {max_timewarp}s before the previous block time \
         {previous_time:?}"
    )]
    TimeTooOld {
        height: block::Height,
        time: DateTime<Utc>,
        previous_time: DateTime<Utc>,
        max_timewarp: i64,
    },

    #[error("could not calculate the adjusted difficulty")]
    Adjustment(#[from] DifficultyError),
}

/// The chain ancestry view could not supply a header that difficulty
/// adjustment needs.
///
/// This means the view is inconsistent or too short. Malformed difficulty
/// bits never cause this error.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum DifficultyError {
    #[error("chain ancestry view is missing the ancestor at {0:?}")]
    MissingAncestor(block::Height),

    #[error("the next block height after {0:?} is above the maximum height")]
    HeightLimit(block::Height),

    #[error("tip {0:?} is below the end of the first adjustment period")]
    IncompletePeriod(block::Height),
}
