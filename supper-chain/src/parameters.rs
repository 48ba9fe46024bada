//! Proof-of-work consensus parameters for each Supperchain network.
//!
//! These parameters are loaded once, when the node selects its network, and
//! never change for the life of the process.

mod consensus;
mod error;
mod network;

pub use consensus::{ConsensusParams, MAX_TIMEWARP};
pub use error::ParameterError;
pub use network::Network;
