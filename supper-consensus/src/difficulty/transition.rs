//! Check difficulty changes without the chain's timestamps.

use supper_chain::{
    block::Height, parameters::ConsensusParams, work::difficulty::CompactDifficulty,
};

use super::{max_actual_timespan, min_actual_timespan, scale_to_limit};

/// Returns `true` if a block at `height` may change the difficulty threshold
/// from `old` to `new`.
///
/// At retarget heights, the new target must be between the old target scaled
/// by the shortest and longest clamped timespans. At other heights, the bits
/// must not change. Networks that allow minimum difficulty blocks permit
/// every transition.
///
/// `old` is the previous block's difficulty. Outside minimum difficulty
/// networks, every block in a period has the same difficulty, so this is
/// also the first block's difficulty used by the timewarp mitigation.
///
/// Both bit values are compared by decoded magnitude, ignoring the negative
/// and overflow flags, as `bitcoind` does. New bits with the sign bit set can
/// pass this check, and are then rejected by
/// [`check_proof_of_work`](crate::pow::check_proof_of_work). Rejecting them
/// here instead would change which blocks are valid.
pub fn permitted_difficulty_transition(
    params: &ConsensusParams,
    height: Height,
    old: CompactDifficulty,
    new: CompactDifficulty,
) -> bool {
    if params.allows_min_difficulty_blocks() {
        return true;
    }

    if !params.is_retarget_height(height) {
        if old != new {
            tracing::debug!(?height, ?old, ?new, "difficulty changed between retargets");
            return false;
        }

        return true;
    }

    let old_target = old.decode().target;
    let observed_target = new.decode().target;

    // Easiest possible new target
    let largest_target = scale_to_limit(old_target, max_actual_timespan(params), params);

    // Hardest possible new target
    let smallest_target = scale_to_limit(old_target, min_actual_timespan(params), params);

    if observed_target > largest_target || observed_target < smallest_target {
        tracing::debug!(
            ?height,
            ?old,
            ?new,
            ?smallest_target,
            ?largest_target,
            "difficulty transition is outside the permitted range",
        );
        return false;
    }

    true
}
