//! Difficulty adjustment and difficulty transition rules.
//!
//! [`next_work_required`] recalculates the difficulty from the chain's
//! timestamps. [`permitted_difficulty_transition`] is a cheaper cross-check,
//! which only looks at the old and new difficulty bits.

use supper_chain::{
    block::Height, parameters::ConsensusParams, work::difficulty::ExpandedDifficulty,
};

mod adjustment;
mod transition;

#[cfg(test)]
mod tests;

pub use adjustment::{calculate_next_work_required, next_work_required};
pub use transition::permitted_difficulty_transition;

/// Returns `target * timespan / params.pow_target_timespan()`, or the
/// proof-of-work limit if the result would be easier than the limit.
///
/// `timespan` must already be clamped to the permitted range.
fn scale_to_limit(
    target: ExpandedDifficulty,
    timespan: u64,
    params: &ConsensusParams,
) -> ExpandedDifficulty {
    let pow_limit = params.pow_limit();

    match target.scale(timespan, params.pow_target_timespan().into()) {
        Some(scaled) if scaled <= pow_limit => scaled,
        _ => pow_limit,
    }
}

/// Returns the shortest adjustment period timespan used for retargeting, in
/// seconds.
fn min_actual_timespan(params: &ConsensusParams) -> u64 {
    u64::from(params.pow_target_timespan()) / 4
}

/// Returns the longest adjustment period timespan used for retargeting, in
/// seconds.
fn max_actual_timespan(params: &ConsensusParams) -> u64 {
    u64::from(params.pow_target_timespan()) * 4
}

/// Returns the height of the first block in the adjustment period that ends
/// at `tip_height`.
///
/// Returns `None` if `tip_height` is below the end of the first period.
fn period_start_height(tip_height: Height, params: &ConsensusParams) -> Option<Height> {
    tip_height - (params.difficulty_adjustment_interval() - 1)
}
