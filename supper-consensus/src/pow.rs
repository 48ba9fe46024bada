//! Proof-of-work checks for block hashes.

use supper_chain::{
    block,
    parameters::ConsensusParams,
    work::difficulty::{CompactDifficulty, ExpandedDifficulty},
};

#[cfg(test)]
mod tests;

/// Returns the target threshold encoded by `bits`, if it is usable as a
/// proof-of-work threshold.
///
/// Returns `None` if `bits` is negative, zero, overflows, or is easier than
/// `pow_limit`.
pub fn derive_target(
    bits: CompactDifficulty,
    pow_limit: ExpandedDifficulty,
) -> Option<ExpandedDifficulty> {
    bits.to_expanded().filter(|target| *target <= pow_limit)
}

/// Returns `true` if `hash` is less than or equal to the target encoded by
/// `bits`.
///
/// The hash is compared as a little-endian 256-bit integer. Undecodable bits
/// and bits easier than the network's proof-of-work limit always fail.
pub fn check_proof_of_work(
    hash: &block::Hash,
    bits: CompactDifficulty,
    params: &ConsensusParams,
) -> bool {
    match derive_target(bits, params.pow_limit()) {
        Some(target) => hash <= &target,
        None => {
            tracing::trace!(?bits, "undecodable or out of range difficulty threshold");
            false
        }
    }
}

/// The rule a [`PowVerifier`] uses to check block hashes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PowCheckMode {
    /// Compare the hash with the target encoded by the block's bits.
    #[default]
    Consensus,

    /// Only require the most significant bit of the hash to be clear.
    ///
    /// This accepts about half of all hashes, regardless of the bits, so
    /// fuzzers can generate valid blocks without mining. It is not a
    /// consensus rule, and is only available in tests and fuzzing builds.
    #[cfg(any(test, feature = "fuzz-determinism"))]
    FuzzDeterminism,
}

/// Checks block hashes against their claimed difficulty thresholds, for one
/// network.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PowVerifier {
    params: ConsensusParams,
    mode: PowCheckMode,
}

impl PowVerifier {
    /// Returns a verifier that applies the consensus rule for `params`.
    pub fn new(params: ConsensusParams) -> PowVerifier {
        PowVerifier {
            params,
            mode: PowCheckMode::Consensus,
        }
    }

    /// Returns a verifier that applies `mode` instead of the consensus rule.
    #[cfg(any(test, feature = "fuzz-determinism"))]
    pub fn with_mode(params: ConsensusParams, mode: PowCheckMode) -> PowVerifier {
        PowVerifier { params, mode }
    }

    /// Returns the consensus parameters used by this verifier.
    pub fn params(&self) -> &ConsensusParams {
        &self.params
    }

    /// Returns the rule used by this verifier.
    pub fn mode(&self) -> PowCheckMode {
        self.mode
    }

    /// Returns `true` if `hash` satisfies `bits`, using this verifier's rule.
    pub fn check(&self, hash: &block::Hash, bits: CompactDifficulty) -> bool {
        match self.mode {
            PowCheckMode::Consensus => check_proof_of_work(hash, bits, &self.params),
            #[cfg(any(test, feature = "fuzz-determinism"))]
            PowCheckMode::FuzzDeterminism => hash.0[31] & 0x80 == 0,
        }
    }
}
