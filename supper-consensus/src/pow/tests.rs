//! Tests for proof-of-work checks.

use supper_test::prelude::*;

use supper_chain::{
    block,
    parameters::Network,
    work::difficulty::{CompactDifficulty, ExpandedDifficulty, U256},
};

use super::*;

/// A realistic mainnet difficulty.
const BITS: CompactDifficulty = CompactDifficulty(0x1d00ffff);

/// Returns the hash with the same integer value as `target`.
fn hash_of(target: ExpandedDifficulty) -> block::Hash {
    let mut bytes = [0; 32];
    U256::from(target).to_little_endian(&mut bytes);
    block::Hash(bytes)
}

/// Returns the hash with the integer value of `target + delta`.
fn hash_above(target: ExpandedDifficulty, delta: u64) -> block::Hash {
    hash_of(ExpandedDifficulty::from(U256::from(target) + U256::from(delta)))
}

#[test]
fn derive_target_rejects_malformed_bits() {
    supper_test::init();

    let pow_limit = ExpandedDifficulty::from(U256::MAX);

    for bits in [
        // zero
        0x0000_0000,
        0x0200_0012,
        0x0180_1234,
        0x2000_0000,
        // negative
        0x0380_0001,
        0x0492_3456,
        0x1d80_ffff,
        0x20ff_ffff,
        // overflow
        0xff12_3456,
        0x2301_0000,
        0x2201_0000 | 0xff00,
        0x2101_0000 | 0xffff,
    ] {
        assert_eq!(
            derive_target(CompactDifficulty(bits), pow_limit),
            None,
            "bits: {bits:#010x}",
        );
    }

    // Small exponents shift the mantissa down.
    assert_eq!(
        derive_target(CompactDifficulty(0x0201_8000), pow_limit),
        Some(ExpandedDifficulty::from(U256::from(0x0180u64))),
    );
}

#[test]
fn derive_target_checks_pow_limit() {
    supper_test::init();

    let params = Network::Mainnet.consensus_params();

    assert_eq!(
        derive_target(params.pow_limit_compact(), params.pow_limit()),
        params.pow_limit_compact().to_expanded(),
    );
    assert_eq!(
        derive_target(CompactDifficulty(0x1e100000), params.pow_limit()),
        None
    );
    assert!(derive_target(BITS, params.pow_limit()).is_some());

    let regtest = Network::Regtest.consensus_params();
    assert!(derive_target(CompactDifficulty(0x207fffff), regtest.pow_limit()).is_some());
    assert_eq!(derive_target(CompactDifficulty(0x207fffff), params.pow_limit()), None);
}

#[test]
fn hash_at_target_passes() {
    supper_test::init();

    let params = Network::Mainnet.consensus_params();
    let target = BITS.to_expanded().expect("valid bits");

    assert!(check_proof_of_work(&hash_of(target), BITS, &params));
    assert!(check_proof_of_work(&block::Hash([0; 32]), BITS, &params));
    assert!(!check_proof_of_work(&hash_above(target, 1), BITS, &params));
    assert!(!check_proof_of_work(&block::Hash([0xff; 32]), BITS, &params));
}

#[test]
fn hashes_are_little_endian_integers() {
    supper_test::init();

    let params = Network::Mainnet.consensus_params();

    // A small integer, but a large first byte.
    let mut small = [0; 32];
    small[0] = 0xff;
    assert!(check_proof_of_work(&block::Hash(small), BITS, &params));

    // A large integer, but a small first byte.
    let mut large = [0; 32];
    large[31] = 0x01;
    assert!(!check_proof_of_work(&block::Hash(large), BITS, &params));
}

#[test]
fn malformed_bits_fail_every_hash() {
    supper_test::init();

    let params = Network::Regtest.consensus_params();
    let zero_hash = block::Hash([0; 32]);

    for bits in [0, 0x0492_3456, 0xff12_3456, 0x2100_ffff] {
        assert!(!check_proof_of_work(&zero_hash, CompactDifficulty(bits), &params));
    }
}

#[test]
fn verifier_modes() {
    supper_test::init();

    let params = Network::Mainnet.consensus_params();
    let target = BITS.to_expanded().expect("valid bits");

    let consensus = PowVerifier::new(params);
    assert_eq!(consensus.mode(), PowCheckMode::Consensus);
    assert_eq!(consensus.params(), &params);
    assert!(consensus.check(&hash_of(target), BITS));
    assert!(!consensus.check(&hash_above(target, 1), BITS));

    let fuzz = PowVerifier::with_mode(params, PowCheckMode::FuzzDeterminism);

    let mut top_bit_clear = [0xff; 32];
    top_bit_clear[31] = 0x7f;
    let mut top_bit_set = [0; 32];
    top_bit_set[31] = 0x80;

    // The fuzzing rule ignores the bits entirely.
    assert!(fuzz.check(&block::Hash(top_bit_clear), CompactDifficulty(0)));
    assert!(!fuzz.check(&block::Hash(top_bit_set), params.pow_limit_compact()));

    assert!(!consensus.check(&block::Hash(top_bit_clear), CompactDifficulty(0)));
}

proptest! {
    /// The proof-of-work check is the little-endian integer comparison.
    #[test]
    fn check_matches_integer_comparison(
        hash in any::<block::Hash>(),
        bits in any::<CompactDifficulty>(),
    ) {
        supper_test::init();

        let params = Network::Mainnet.consensus_params();
        let expected = match derive_target(bits, params.pow_limit()) {
            Some(target) => U256::from_little_endian(&hash.0) <= U256::from(target),
            None => false,
        };

        prop_assert_eq!(check_proof_of_work(&hash, bits, &params), expected);
    }

    /// Bits with the sign bit set and a non-zero mantissa never derive a
    /// target.
    #[test]
    fn negative_bits_never_derive(
        exponent in 3..=32u32,
        mantissa in 1..0x0080_0000u32,
    ) {
        supper_test::init();

        let bits = CompactDifficulty((exponent << 24) | 0x0080_0000 | mantissa);

        prop_assert_eq!(derive_target(bits, ExpandedDifficulty::from(U256::MAX)), None);
    }
}
