//! The networks a node can join.

use std::fmt;

#[cfg(any(test, feature = "proptest-impl"))]
use proptest_derive::Arbitrary;

use crate::work::difficulty::{ExpandedDifficulty, U256};

use super::ConsensusParams;

/// Two weeks, in seconds.
const POW_TARGET_TIMESPAN: u32 = 14 * 24 * 60 * 60;

/// Ten minutes, in seconds.
const POW_TARGET_SPACING: u32 = 10 * 60;

/// An enum describing the possible network choices.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "proptest-impl"), derive(Arbitrary))]
pub enum Network {
    /// The production mainnet.
    #[default]
    Mainnet,

    /// The public test network.
    ///
    /// Allows minimum difficulty blocks when blocks are slow.
    Testnet,

    /// The local regression test network.
    ///
    /// Has a very easy, fixed difficulty.
    Regtest,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Mainnet => "Mainnet",
            Network::Testnet => "Testnet",
            Network::Regtest => "Regtest",
        })
    }
}

impl Network {
    /// Returns the easiest target difficulty allowed on `self`.
    ///
    /// See `powLimit` in `bitcoind`.
    pub fn target_difficulty_limit(&self) -> ExpandedDifficulty {
        let limit = match self {
            /* 2^236 - 1 */
            Network::Mainnet | Network::Testnet => U256::MAX >> 20,
            /* 2^255 - 1 */
            Network::Regtest => U256::MAX >> 1,
        };

        ExpandedDifficulty::from(limit)
    }

    /// Returns the proof-of-work consensus parameters for `self`.
    ///
    /// The timewarp mitigation is disabled on every network by default.
    pub fn consensus_params(&self) -> ConsensusParams {
        let params = ConsensusParams::new(
            self.target_difficulty_limit(),
            POW_TARGET_TIMESPAN,
            POW_TARGET_SPACING,
        )
        .expect("hard-coded network parameters are valid");

        match self {
            Network::Mainnet => params,
            Network::Testnet => params.with_min_difficulty_blocks(true),
            Network::Regtest => params
                .with_min_difficulty_blocks(true)
                .with_no_retargeting(true),
        }
    }

    /// Returns `true` if this is a test network.
    pub fn is_a_test_network(&self) -> bool {
        *self != Network::Mainnet
    }
}
