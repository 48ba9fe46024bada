//! Proof-of-work difficulty representations.

pub mod difficulty;

mod u256;

#[cfg(any(test, feature = "proptest-impl"))]
mod arbitrary;
