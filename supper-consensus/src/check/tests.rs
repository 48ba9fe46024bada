//! Tests for block header consensus checks.

use color_eyre::eyre::Result;

use supper_chain::{
    block::{self, Header, Height},
    chain_ancestry::{
        generate::{evenly_spaced_chain, fake_hash, unix_time},
        ChainAncestry, IndexedHeader,
    },
    parameters::{ConsensusParams, Network},
    work::difficulty::{CompactDifficulty, ExpandedDifficulty, U256},
};

use crate::{
    difficulty::next_work_required,
    error::{BlockError, DifficultyError},
};

use super::*;

const BITS: CompactDifficulty = CompactDifficulty(0x1d00ffff);

fn header_with(bits: CompactDifficulty) -> Header {
    Header::new(block::Hash([0; 32]), unix_time(1_700_000_000), bits)
}

#[test]
fn difficulty_errors_are_distinct() {
    supper_test::init();

    let params = Network::Mainnet.consensus_params();
    let height = Height(1);
    let zero_hash = block::Hash([0; 32]);

    assert_eq!(
        difficulty_is_valid(&header_with(BITS), &params, &height, &zero_hash),
        Ok(())
    );

    let negative = CompactDifficulty(0x1d80ffff);
    assert_eq!(
        difficulty_is_valid(&header_with(negative), &params, &height, &zero_hash),
        Err(BlockError::InvalidDifficulty(height, zero_hash, negative))
    );

    let too_easy = CompactDifficulty(0x1e100000);
    assert_eq!(
        difficulty_is_valid(&header_with(too_easy), &params, &height, &zero_hash),
        Err(BlockError::TargetDifficultyLimit(
            height,
            zero_hash,
            ExpandedDifficulty::from(U256::from(0x10_0000u64) << 216),
            params.pow_limit(),
        ))
    );

    let max_hash = block::Hash([0xff; 32]);
    assert_eq!(
        difficulty_is_valid(&header_with(BITS), &params, &height, &max_hash),
        Err(BlockError::DifficultyFilter(
            height,
            max_hash,
            BITS.to_expanded().expect("valid bits"),
        ))
    );
}

#[test]
fn difficulty_threshold_must_match_adjustment() -> Result<()> {
    supper_test::init();

    let params = Network::Mainnet.consensus_params();
    let chain = evenly_spaced_chain(10, 1_700_000_000, 600, BITS);
    let tip = *chain.tip();

    let candidate = Header::new(tip.hash, unix_time(tip.header.block_time() + 600), BITS);
    let candidate_hash = fake_hash(Height(10));

    difficulty_threshold_is_valid(&chain, &candidate, &candidate_hash, &params)?;

    let wrong = Header {
        difficulty_threshold: CompactDifficulty(0x1c7fff80),
        ..candidate
    };
    assert_eq!(
        difficulty_threshold_is_valid(&chain, &wrong, &candidate_hash, &params),
        Err(BlockError::WrongDifficultyThreshold(
            Height(10),
            candidate_hash,
            CompactDifficulty(0x1c7fff80),
            BITS,
        ))
    );

    Ok(())
}

#[test]
fn difficulty_threshold_at_retarget_heights() -> Result<()> {
    supper_test::init();

    // Ten block adjustment periods.
    let params = ConsensusParams::new(Network::Mainnet.consensus_params().pow_limit(), 6000, 600)?;

    // The first period is 5400 seconds, so the difficulty goes up.
    let chain = evenly_spaced_chain(10, 1_700_000_000, 600, BITS);
    let tip = *chain.tip();
    let candidate_hash = fake_hash(Height(10));
    let candidate = Header::new(tip.hash, unix_time(tip.header.block_time() + 600), BITS);

    let expected = next_work_required(&chain, &candidate, &params)?;
    assert!(expected.decode().target < BITS.decode().target);

    assert_eq!(
        difficulty_threshold_is_valid(&chain, &candidate, &candidate_hash, &params),
        Err(BlockError::WrongDifficultyThreshold(
            Height(10),
            candidate_hash,
            BITS,
            expected,
        ))
    );

    let candidate = Header {
        difficulty_threshold: expected,
        ..candidate
    };
    difficulty_threshold_is_valid(&chain, &candidate, &candidate_hash, &params)?;

    // A chain view without the first block of the period can't be checked.
    let broken: &dyn ChainAncestry = &TipOnly(tip);
    assert_eq!(
        difficulty_threshold_is_valid(broken, &candidate, &candidate_hash, &params),
        Err(BlockError::Adjustment(DifficultyError::MissingAncestor(
            Height(0)
        )))
    );

    Ok(())
}

/// A chain view that only knows its tip.
struct TipOnly(IndexedHeader);

impl ChainAncestry for TipOnly {
    fn tip(&self) -> &IndexedHeader {
        &self.0
    }

    fn ancestor(&self, height: Height) -> Option<&IndexedHeader> {
        (height == self.0.height).then_some(&self.0)
    }
}

#[test]
fn difficulty_transition_errors() {
    supper_test::init();

    let params = Network::Mainnet.consensus_params();
    let new = CompactDifficulty(0x1c7fff80);

    assert_eq!(
        difficulty_transition_is_valid(&params, Height(2016), BITS, new),
        Ok(())
    );
    assert_eq!(
        difficulty_transition_is_valid(&params, Height(2017), BITS, new),
        Err(BlockError::InvalidDifficultyTransition {
            height: Height(2017),
            old: BITS,
            new,
        })
    );
}

#[test]
fn timewarp_rule() {
    supper_test::init();

    let previous_time = unix_time(1_700_000_000);
    let earliest = unix_time(1_700_000_000 - MAX_TIMEWARP);
    let too_early = unix_time(1_700_000_000 - MAX_TIMEWARP - 1);

    let params = Network::Regtest
        .consensus_params()
        .with_timewarp_mitigation(true);
    let period_start = Height(params.difficulty_adjustment_interval());

    assert_eq!(
        timewarp_is_valid(&params, period_start, earliest, previous_time),
        Ok(())
    );
    assert_eq!(
        timewarp_is_valid(&params, period_start, too_early, previous_time),
        Err(BlockError::TimeTooOld {
            height: period_start,
            time: too_early,
            previous_time,
            max_timewarp: MAX_TIMEWARP,
        })
    );

    // Only the first block of each period is limited.
    let next = Height(period_start.0 + 1);
    assert_eq!(
        timewarp_is_valid(&params, next, too_early, previous_time),
        Ok(())
    );

    // The rule is not active by default.
    let params = Network::Regtest.consensus_params();
    assert_eq!(
        timewarp_is_valid(&params, period_start, too_early, previous_time),
        Ok(())
    );
}
