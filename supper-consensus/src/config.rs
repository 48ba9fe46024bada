//! Configuration for proof-of-work verification.

use serde::{Deserialize, Serialize};

use supper_chain::parameters::{ConsensusParams, Network};

/// Configuration for proof-of-work verification.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The network whose consensus parameters are used.
    pub network: Network,

    /// Enforce the timewarp mitigation on `Regtest`.
    ///
    /// Regtest retargeting is disabled, so this only changes the timestamp
    /// rule for the first block of each adjustment period. It is ignored on
    /// other networks.
    pub regtest_enforce_timewarp_mitigation: bool,
}

// we like our default configs to be explicit
#[allow(unknown_lints)]
#[allow(clippy::derivable_impls)]
impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            regtest_enforce_timewarp_mitigation: false,
        }
    }
}

impl Config {
    /// Returns the consensus parameters selected by this config.
    pub fn consensus_params(&self) -> ConsensusParams {
        let params = self.network.consensus_params();

        match self.network {
            Network::Regtest => {
                params.with_timewarp_mitigation(self.regtest_enforce_timewarp_mitigation)
            }
            Network::Mainnet | Network::Testnet => params,
        }
    }
}
