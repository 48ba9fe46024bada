//! Module for the fixed-width big int structures used by difficulty arithmetic.
// This is a separate module to make it easier to disable clippy because
// it raises a lot of issues in the macro.
#![allow(clippy::all)]
#![allow(clippy::range_plus_one)]
#![allow(clippy::fallible_impl_from)]
#![allow(missing_docs)]

use std::convert::TryFrom;

use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

construct_uint! {
    pub struct U512(8);
}

impl From<U256> for U512 {
    fn from(value: U256) -> U512 {
        let mut words = [0u64; 8];
        words[..4].copy_from_slice(&value.0);
        U512(words)
    }
}

/// The value does not fit in 256 bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct U256Overflow;

impl TryFrom<U512> for U256 {
    type Error = U256Overflow;

    fn try_from(value: U512) -> Result<U256, U256Overflow> {
        if value.0[4..].iter().any(|word| *word != 0) {
            return Err(U256Overflow);
        }

        let mut words = [0u64; 4];
        words.copy_from_slice(&value.0[..4]);
        Ok(U256(words))
    }
}
