//! Calculate the difficulty threshold for the next block.

use chrono::{DateTime, Utc};

use supper_chain::{
    block::Header,
    chain_ancestry::{ChainAncestry, IndexedHeader},
    parameters::ConsensusParams,
    work::difficulty::CompactDifficulty,
};

use crate::error::DifficultyError;

use super::{max_actual_timespan, min_actual_timespan, period_start_height, scale_to_limit};

/// Returns the difficulty threshold that a `candidate` header building on the
/// tip of `chain` must use.
///
/// Outside retarget heights, this is the difficulty of the tip. On networks
/// that allow minimum difficulty blocks, a candidate more than twice the
/// target spacing after the tip may use the proof-of-work limit, and
/// otherwise uses the last difficulty that was not a minimum difficulty
/// block.
///
/// At retarget heights, see [`calculate_next_work_required`].
///
/// Returns an error if `chain` is missing an ancestor that the calculation
/// needs.
pub fn next_work_required<C>(
    chain: &C,
    candidate: &Header,
    params: &ConsensusParams,
) -> Result<CompactDifficulty, DifficultyError>
where
    C: ChainAncestry + ?Sized,
{
    let tip = chain.tip();
    let candidate_height = tip
        .height
        .next()
        .ok_or(DifficultyError::HeightLimit(tip.height))?;

    if !params.is_retarget_height(candidate_height) {
        if !params.allows_min_difficulty_blocks() {
            return Ok(tip.header.difficulty_threshold);
        }

        let min_difficulty_gap = i64::from(params.pow_target_spacing()) * 2;
        if candidate.block_time() > tip.header.block_time().saturating_add(min_difficulty_gap) {
            tracing::debug!(
                ?candidate_height,
                candidate_time = ?candidate.time,
                tip_time = ?tip.header.time,
                "allowing a minimum difficulty block after a long gap",
            );

            return Ok(params.pow_limit_compact());
        }

        return last_non_minimum_difficulty(chain, tip, params)
            .map(|block| block.header.difficulty_threshold);
    }

    let first_height = period_start_height(tip.height, params)
        .expect("retarget heights are a whole adjustment interval above genesis");
    let first = chain
        .ancestor(first_height)
        .ok_or(DifficultyError::MissingAncestor(first_height))?;

    calculate_next_work_required(chain, first.header.time, params)
}

/// Returns the difficulty threshold for the block after the tip of `chain`,
/// which must be the last block of an adjustment period that started at
/// `first_block_time`.
///
/// The new target is the old target scaled by the observed period timespan.
/// The timespan is clamped to between a quarter and four times the target
/// timespan, and the target is limited to the proof-of-work limit.
///
/// The old target is the tip's target, or the first block of the period's
/// target when the timewarp mitigation is active.
pub fn calculate_next_work_required<C>(
    chain: &C,
    first_block_time: DateTime<Utc>,
    params: &ConsensusParams,
) -> Result<CompactDifficulty, DifficultyError>
where
    C: ChainAncestry + ?Sized,
{
    let tip = chain.tip();

    if params.no_retargeting() {
        return Ok(tip.header.difficulty_threshold);
    }

    let actual_timespan = tip.header.block_time() - first_block_time.timestamp();
    let clamped_timespan = clamp_timespan(actual_timespan, params);

    let anchor = if params.enforces_timewarp_mitigation() {
        let first_height = period_start_height(tip.height, params)
            .ok_or(DifficultyError::IncompletePeriod(tip.height))?;

        chain
            .ancestor(first_height)
            .ok_or(DifficultyError::MissingAncestor(first_height))?
    } else {
        tip
    };

    // Malformed anchor bits are not rejected here: they were already checked
    // when the anchor block was accepted.
    let old_target = anchor.header.difficulty_threshold.decode().target;
    let new_target = scale_to_limit(old_target, clamped_timespan, params);

    tracing::trace!(
        tip_height = ?tip.height,
        anchor_height = ?anchor.height,
        ?actual_timespan,
        ?clamped_timespan,
        old_bits = ?anchor.header.difficulty_threshold,
        new_bits = ?new_target.to_compact(),
        "retargeting difficulty",
    );

    Ok(new_target.to_compact())
}

/// Returns `actual_timespan` clamped to the permitted retargeting range.
fn clamp_timespan(actual_timespan: i64, params: &ConsensusParams) -> u64 {
    let min = min_actual_timespan(params);
    let max = max_actual_timespan(params);

    match u64::try_from(actual_timespan) {
        Ok(timespan) => timespan.clamp(min, max),
        // Negative timespans are shorter than the minimum
        Err(_) => min,
    }
}

/// Walks back from `tip` past any minimum difficulty blocks, stopping at the
/// first retarget height, and returns the block it stops at.
fn last_non_minimum_difficulty<'c, C>(
    chain: &'c C,
    tip: &'c IndexedHeader,
    params: &ConsensusParams,
) -> Result<&'c IndexedHeader, DifficultyError>
where
    C: ChainAncestry + ?Sized,
{
    let pow_limit_compact = params.pow_limit_compact();
    let mut block = tip;

    while !params.is_retarget_height(block.height)
        && block.header.difficulty_threshold == pow_limit_compact
    {
        let previous_height = match block.height.previous() {
            Some(height) => height,
            None => break,
        };

        block = chain
            .previous(block)
            .ok_or(DifficultyError::MissingAncestor(previous_height))?;
    }

    if block.height != tip.height {
        tracing::trace!(
            tip_height = ?tip.height,
            height = ?block.height,
            bits = ?block.header.difficulty_threshold,
            "skipped minimum difficulty blocks",
        );
    }

    Ok(block)
}
