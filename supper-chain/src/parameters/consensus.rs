//! The proof-of-work consensus parameters for a network.

use crate::{
    block::Height,
    work::difficulty::{CompactDifficulty, ExpandedDifficulty},
};

use super::ParameterError;

/// The maximum number of seconds that the timestamp of the first block of a
/// difficulty adjustment period may be earlier than the last block of the
/// previous period, when the timewarp mitigation is active.
pub const MAX_TIMEWARP: i64 = 600;

/// The proof-of-work parameters of a network.
///
/// Every difficulty calculation and check reads its limits from this type.
/// It can only be constructed with a whole-number difficulty adjustment
/// interval, so the difficulty code never divides by zero, and never needs to
/// round the interval.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConsensusParams {
    /// The easiest target allowed on the network.
    ///
    /// `powLimit` in `bitcoind`.
    pow_limit: ExpandedDifficulty,

    /// The number of seconds one adjustment period should last.
    pow_target_timespan: u32,

    /// The number of seconds between blocks, on average.
    pow_target_spacing: u32,

    /// Allow minimum difficulty blocks after a long gap.
    pow_allow_min_difficulty_blocks: bool,

    /// Never change the difficulty.
    pow_no_retargeting: bool,

    /// Retarget from the first block of the period, and limit the first
    /// block's timestamp.
    enforce_timewarp_mitigation: bool,
}

impl ConsensusParams {
    /// Returns new proof-of-work parameters, with minimum difficulty blocks,
    /// fixed difficulty, and the timewarp mitigation all disabled.
    ///
    /// Returns an error if the `target_timespan` is not a whole, non-zero
    /// number of `target_spacing` blocks, or the `pow_limit` is zero.
    pub fn new(
        pow_limit: ExpandedDifficulty,
        target_timespan: u32,
        target_spacing: u32,
    ) -> Result<ConsensusParams, ParameterError> {
        if target_spacing == 0 {
            return Err(ParameterError::ZeroTargetSpacing);
        }

        if target_timespan < target_spacing {
            return Err(ParameterError::TimespanShorterThanSpacing {
                timespan: target_timespan,
                spacing: target_spacing,
            });
        }

        if target_timespan % target_spacing != 0 {
            return Err(ParameterError::FractionalAdjustmentInterval {
                timespan: target_timespan,
                spacing: target_spacing,
            });
        }

        if pow_limit.is_zero() {
            return Err(ParameterError::ZeroPowLimit);
        }

        Ok(ConsensusParams {
            pow_limit,
            pow_target_timespan: target_timespan,
            pow_target_spacing: target_spacing,
            pow_allow_min_difficulty_blocks: false,
            pow_no_retargeting: false,
            enforce_timewarp_mitigation: false,
        })
    }

    /// Allow or reject minimum difficulty blocks after a gap of more than
    /// twice the target spacing.
    pub fn with_min_difficulty_blocks(mut self, allow: bool) -> ConsensusParams {
        self.pow_allow_min_difficulty_blocks = allow;
        self
    }

    /// Disable or enable difficulty retargeting.
    pub fn with_no_retargeting(mut self, no_retargeting: bool) -> ConsensusParams {
        self.pow_no_retargeting = no_retargeting;
        self
    }

    /// Enable or disable the timewarp mitigation.
    pub fn with_timewarp_mitigation(mut self, enforce: bool) -> ConsensusParams {
        self.enforce_timewarp_mitigation = enforce;
        self
    }

    /// Returns the easiest target allowed on the network.
    ///
    /// This is the exact configured value, not its compact encoding.
    pub fn pow_limit(&self) -> ExpandedDifficulty {
        self.pow_limit
    }

    /// Returns the compact encoding of the proof-of-work limit.
    ///
    /// Minimum difficulty blocks use these bits.
    pub fn pow_limit_compact(&self) -> CompactDifficulty {
        self.pow_limit.to_compact()
    }

    /// Returns the number of seconds one adjustment period should last.
    pub fn pow_target_timespan(&self) -> u32 {
        self.pow_target_timespan
    }

    /// Returns the desired number of seconds between blocks.
    pub fn pow_target_spacing(&self) -> u32 {
        self.pow_target_spacing
    }

    /// Returns `true` if minimum difficulty blocks are allowed after a long gap.
    pub fn allows_min_difficulty_blocks(&self) -> bool {
        self.pow_allow_min_difficulty_blocks
    }

    /// Returns `true` if the difficulty never changes.
    pub fn no_retargeting(&self) -> bool {
        self.pow_no_retargeting
    }

    /// Returns `true` if the timewarp mitigation is active.
    pub fn enforces_timewarp_mitigation(&self) -> bool {
        self.enforce_timewarp_mitigation
    }

    /// Returns the number of blocks in each difficulty adjustment period.
    ///
    /// Always at least 1.
    pub fn difficulty_adjustment_interval(&self) -> u32 {
        self.pow_target_timespan / self.pow_target_spacing
    }

    /// Returns `true` if the difficulty is recalculated for the block at
    /// `height`.
    pub fn is_retarget_height(&self, height: Height) -> bool {
        height.0 % self.difficulty_adjustment_interval() == 0
    }
}
