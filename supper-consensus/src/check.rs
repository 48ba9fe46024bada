//! Consensus check functions for block headers.
//!
//! These functions wrap the proof-of-work rules in [`BlockError`]s, so block
//! validation code can reject blocks with a specific reason.

use chrono::{DateTime, Utc};

use supper_chain::{
    block::{self, Header, Height},
    chain_ancestry::ChainAncestry,
    parameters::{ConsensusParams, MAX_TIMEWARP},
    work::difficulty::CompactDifficulty,
};

use crate::{
    difficulty::{next_work_required, permitted_difficulty_transition},
    error::{BlockError, DifficultyError},
};

#[cfg(test)]
mod tests;

/// Returns `Ok(())` if `hash` passes:
///   - the target difficulty limit for `params` (PowLimit), and
///   - the difficulty filter,
/// based on the fields in `header`.
///
/// If the block is invalid, returns an error containing `height` and `hash`.
pub fn difficulty_is_valid(
    header: &Header,
    params: &ConsensusParams,
    height: &Height,
    hash: &block::Hash,
) -> Result<(), BlockError> {
    let difficulty_threshold = header.difficulty_threshold.to_expanded().ok_or(
        BlockError::InvalidDifficulty(*height, *hash, header.difficulty_threshold),
    )?;

    // Note: the comparisons in this function are u256 integer comparisons.
    // Greater values represent *less* work.

    if difficulty_threshold > params.pow_limit() {
        Err(BlockError::TargetDifficultyLimit(
            *height,
            *hash,
            difficulty_threshold,
            params.pow_limit(),
        ))?;
    }

    if hash > &difficulty_threshold {
        Err(BlockError::DifficultyFilter(
            *height,
            *hash,
            difficulty_threshold,
        ))?;
    }

    Ok(())
}

/// Returns `Ok(())` if the `candidate` header's difficulty threshold is the
/// adjusted difficulty for the block after the tip of `chain`.
pub fn difficulty_threshold_is_valid<C>(
    chain: &C,
    candidate: &Header,
    candidate_hash: &block::Hash,
    params: &ConsensusParams,
) -> Result<(), BlockError>
where
    C: ChainAncestry + ?Sized,
{
    let tip = chain.tip();
    let candidate_height = tip
        .height
        .next()
        .ok_or(DifficultyError::HeightLimit(tip.height))?;

    let expected = next_work_required(chain, candidate, params)?;

    if candidate.difficulty_threshold != expected {
        Err(BlockError::WrongDifficultyThreshold(
            candidate_height,
            *candidate_hash,
            candidate.difficulty_threshold,
            expected,
        ))?;
    }

    Ok(())
}

/// Returns `Ok(())` if a block at `height` may change the difficulty
/// threshold from `old` to `new`.
///
/// See [`permitted_difficulty_transition`] for details.
pub fn difficulty_transition_is_valid(
    params: &ConsensusParams,
    height: Height,
    old: CompactDifficulty,
    new: CompactDifficulty,
) -> Result<(), BlockError> {
    if !permitted_difficulty_transition(params, height, old, new) {
        Err(BlockError::InvalidDifficultyTransition { height, old, new })?;
    }

    Ok(())
}

/// Returns `Ok(())` if the block at `height` with `candidate_time` follows
/// the timewarp rule.
///
/// When the timewarp mitigation is active, the first block of each
/// adjustment period must not be more than [`MAX_TIMEWARP`] seconds earlier
/// than the previous block.
pub fn timewarp_is_valid(
    params: &ConsensusParams,
    height: Height,
    candidate_time: DateTime<Utc>,
    previous_time: DateTime<Utc>,
) -> Result<(), BlockError> {
    if !params.enforces_timewarp_mitigation() || !params.is_retarget_height(height) {
        return Ok(());
    }

    if candidate_time.timestamp() < previous_time.timestamp().saturating_sub(MAX_TIMEWARP) {
        Err(BlockError::TimeTooOld {
            height,
            time: candidate_time,
            previous_time,
            max_timewarp: MAX_TIMEWARP,
        })?;
    }

    Ok(())
}
