//! Error types for consensus parameters

use thiserror::Error;

/// An error in a network's proof-of-work parameters.
///
/// These are configuration errors: they are detected when the parameters are
/// constructed, and are fatal to node startup.
#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
pub enum ParameterError {
    /// Blocks can't be spaced zero seconds apart.
    #[error("target spacing must be at least one second")]
    ZeroTargetSpacing,

    /// The adjustment interval would be zero blocks.
    #[error("target timespan {timespan}s is shorter than the target spacing {spacing}s")]
    TimespanShorterThanSpacing {
        /// The configured target timespan, in seconds.
        timespan: u32,
        /// The configured target spacing, in seconds.
        spacing: u32,
    },

    /// The adjustment interval would not be a whole number of blocks.
    #[error(
        "target timespan {timespan}s is not a whole number of {spacing}s blocks: \
         the difficulty adjustment interval must be an integer"
    )]
    FractionalAdjustmentInterval {
        /// The configured target timespan, in seconds.
        timespan: u32,
        /// The configured target spacing, in seconds.
        spacing: u32,
    },

    /// A zero limit would make every block invalid.
    #[error("proof-of-work limit must be non-zero")]
    ZeroPowLimit,
}
