//! Block difficulty data structures and calculations
//!
//! The block difficulty "target threshold" is stored in the block header as a
//! 32-bit `CompactDifficulty`. The `block::Hash` must be less than or equal
//! to the `ExpandedDifficulty` threshold, when represented as a 256-bit integer
//! in little-endian order.
//!
//! The conversions in this module are consensus-critical: every node must
//! produce bit-identical compact values from the same expanded value, and the
//! same expanded value from the same compact bits.
#![allow(clippy::unit_arg)]

use crate::block;

use std::{
    cmp::{Ordering, PartialEq, PartialOrd},
    convert::TryFrom,
    fmt,
};

pub use crate::work::u256::{U256Overflow, U256, U512};

#[cfg(test)]
mod tests;

/// A 32-bit "compact bits" value, which represents the difficulty threshold for
/// a block header.
///
/// Used for:
///   - checking the `difficulty_threshold` value in the block header,
///   - calculating the 256-bit `ExpandedDifficulty` threshold, for comparison
///     with the block header hash, and
///   - storing the result of each difficulty adjustment.
///
/// Details:
///
/// This is a floating-point encoding, with a 24-bit signed mantissa,
/// an 8-bit exponent, an offset of 3, and a radix of 256.
/// (IEEE 754 32-bit floating-point values use a separate sign bit, an implicit
/// leading mantissa bit, an offset of 127, and a radix of 2.)
///
/// The precise bit pattern of a `CompactDifficulty` value is
/// consensus-critical, because it is part of the block header, and it must be
/// bitwise equal to the compact encoding of the adjusted difficulty.
///
/// Without these consensus rules, some `ExpandedDifficulty` values would have
/// multiple equivalent `CompactDifficulty` values, due to redundancy in the
/// floating-point format.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CompactDifficulty(pub u32);

impl fmt::Debug for CompactDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // There isn't a standard way to show different representations of the
        // same value
        f.debug_tuple("CompactDifficulty")
            // Use hex, because it's a float
            .field(&format_args!("{:#010x}", self.0))
            // Use expanded difficulty, for bitwise difficulty comparisons
            .field(&format_args!("{:?}", self.to_expanded()))
            .finish()
    }
}

/// An invalid CompactDifficulty value, for testing.
pub const INVALID_COMPACT_DIFFICULTY: CompactDifficulty = CompactDifficulty(u32::MAX);

/// The result of decoding a [`CompactDifficulty`], before any validity checks.
///
/// `target` is always computed, even when the encoding is negative or
/// overflows, so callers can inspect the magnitude. Any value with `negative`
/// or `overflow` set, or a zero `target`, is not a usable threshold.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompactDecoding {
    /// The decoded magnitude, truncated to 256 bits.
    pub target: ExpandedDifficulty,

    /// The sign bit was set on a non-zero mantissa.
    pub negative: bool,

    /// The exponent places non-zero mantissa bits above bit 255.
    pub overflow: bool,
}

impl CompactDecoding {
    /// Returns the target if the encoding is non-negative, non-zero and does
    /// not overflow.
    pub fn valid_target(self) -> Option<ExpandedDifficulty> {
        if self.negative || self.overflow || self.target.is_zero() {
            None
        } else {
            Some(self.target)
        }
    }
}

/// A 256-bit unsigned "expanded difficulty" value.
///
/// Used as a target threshold for the difficulty of a `block::Hash`.
///
/// Details:
///
/// The precise bit pattern of an `ExpandedDifficulty` value is
/// consensus-critical, because it is compared with the `block::Hash`.
///
/// Note that each `CompactDifficulty` value can be converted from a
/// range of `ExpandedDifficulty` values, because the precision of
/// the floating-point format requires rounding on conversion.
///
/// Therefore, consensus-critical code must perform the specified
/// conversions to `CompactDifficulty`, even if the original
/// `ExpandedDifficulty` values are known.
///
/// Zero values are representable, but they are never valid thresholds.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ExpandedDifficulty(U256);

impl fmt::Debug for ExpandedDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buf = [0; 32];
        // Use the same byte order as block::Hash
        self.0.to_big_endian(&mut buf);
        f.debug_tuple("ExpandedDifficulty")
            .field(&hex::encode(buf))
            .finish()
    }
}

impl CompactDifficulty {
    /// CompactDifficulty exponent offset.
    const OFFSET: u32 = 3;

    /// CompactDifficulty floating-point precision.
    const PRECISION: u32 = 24;

    /// CompactDifficulty sign bit, part of the signed mantissa.
    const SIGN_BIT: u32 = 1 << (CompactDifficulty::PRECISION - 1);

    /// CompactDifficulty unsigned mantissa mask.
    ///
    /// Also the maximum unsigned mantissa value.
    const UNSIGNED_MANTISSA_MASK: u32 = CompactDifficulty::SIGN_BIT - 1;

    /// Returns the raw 32-bit `nBits` value.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Decode the compact representation into a 256-bit magnitude and its
    /// negative and overflow flags.
    ///
    /// This is `SetCompact()` in `bitcoind`. It never fails:
    /// malformed encodings are reported through the flags, and callers that
    /// need a usable threshold must use [`CompactDecoding::valid_target`] and
    /// also check the network's proof-of-work limit.
    pub fn decode(self) -> CompactDecoding {
        // The constants for this floating-point representation.
        // Alias the struct constants here, so the code is easier to read.
        const OFFSET: u32 = CompactDifficulty::OFFSET;
        const PRECISION: u32 = CompactDifficulty::PRECISION;
        const SIGN_BIT: u32 = CompactDifficulty::SIGN_BIT;
        const UNSIGNED_MANTISSA_MASK: u32 = CompactDifficulty::UNSIGNED_MANTISSA_MASK;

        // The exponent is the number of bytes in the expanded value,
        // including the 3 mantissa bytes.
        let size = self.0 >> PRECISION;
        let mut mantissa = self.0 & UNSIGNED_MANTISSA_MASK;

        let target = if size <= OFFSET {
            // Underflow: the low mantissa bytes are discarded, and the flags
            // below only see the remaining bytes.
            mantissa >>= 8 * (OFFSET - size);
            U256::from(mantissa)
        } else {
            let shift = 8 * (size - OFFSET);
            if shift >= 256 {
                U256::zero()
            } else {
                // Overflowing bits are discarded, they are flagged below.
                U256::from(mantissa) << shift as usize
            }
        };

        let negative = mantissa != 0 && (self.0 & SIGN_BIT) != 0;

        // A 1, 2 or 3 byte mantissa fits in 34, 33 or 32 bytes.
        let overflow = mantissa != 0
            && (size > 34
                || (mantissa > u8::MAX.into() && size > 33)
                || (mantissa > u16::MAX.into() && size > 32));

        CompactDecoding {
            target: ExpandedDifficulty(target),
            negative,
            overflow,
        }
    }

    /// Calculate the ExpandedDifficulty for a compact representation.
    ///
    /// Returns None for negative, zero, and overflow values. Nodes reject
    /// these values before comparing the hash.
    ///
    /// This does not check the network's proof-of-work limit.
    pub fn to_expanded(self) -> Option<ExpandedDifficulty> {
        self.decode().valid_target()
    }
}

impl From<ExpandedDifficulty> for CompactDifficulty {
    fn from(value: ExpandedDifficulty) -> Self {
        value.to_compact()
    }
}

impl ExpandedDifficulty {
    /// Returns the difficulty of the hash.
    ///
    /// Used to implement comparisons between difficulties and hashes.
    ///
    /// Usage:
    ///
    /// Compare the hash with the calculated difficulty value, using Rust's
    /// standard comparison operators.
    ///
    /// Hashes are not used to calculate the difficulties of future blocks, so
    /// users of this module should avoid converting hashes into difficulties.
    pub fn from_hash(hash: &block::Hash) -> ExpandedDifficulty {
        U256::from_little_endian(&hash.0).into()
    }

    /// Returns `true` if this is the (invalid) zero threshold.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Calculate the CompactDifficulty for an expanded difficulty.
    ///
    /// This is `GetCompact()` in `bitcoind`. The result
    /// keeps the 3 most significant bytes, rounding down, and never sets the
    /// sign bit. Zero encodes as `0x00000000`.
    pub fn to_compact(self) -> CompactDifficulty {
        // The constants for this floating-point representation.
        // Alias the constants here, so the code is easier to read.
        const OFFSET: u32 = CompactDifficulty::OFFSET;
        const PRECISION: u32 = CompactDifficulty::PRECISION;
        const SIGN_BIT: u32 = CompactDifficulty::SIGN_BIT;

        // The number of significant bytes, at most 32.
        let mut size = (self.0.bits() as u32 + 7) / 8;

        let mantissa = if size <= OFFSET {
            // Value is small, shift up if needed
            self.0 << (8 * (OFFSET - size)) as usize
        } else {
            // Value is large, shift down
            self.0 >> (8 * (size - OFFSET)) as usize
        };
        let mut mantissa = mantissa.low_u32();

        // Make sure the mantissa is non-negative, by shifting down values that
        // would otherwise overflow into the sign bit
        if mantissa & SIGN_BIT != 0 {
            mantissa >>= 8;
            size += 1;
        }

        CompactDifficulty(mantissa | (size << PRECISION))
    }

    /// Returns `self * numerator / denominator`.
    ///
    /// The product is calculated in 512 bits, so there is no intermediate
    /// overflow, and no precision is lost before the division.
    ///
    /// Returns `None` if `denominator` is zero, or the quotient does not fit
    /// in 256 bits. Difficulty adjustment clamps these results to the
    /// proof-of-work limit.
    pub fn scale(self, numerator: u64, denominator: u64) -> Option<ExpandedDifficulty> {
        if denominator == 0 {
            return None;
        }

        let product = U512::from(self.0) * U512::from(numerator);
        let quotient = product / U512::from(denominator);

        U256::try_from(quotient).ok().map(ExpandedDifficulty)
    }
}

impl From<U256> for ExpandedDifficulty {
    fn from(value: U256) -> Self {
        ExpandedDifficulty(value)
    }
}

impl From<ExpandedDifficulty> for U256 {
    fn from(value: ExpandedDifficulty) -> Self {
        value.0
    }
}

impl PartialEq<block::Hash> for ExpandedDifficulty {
    /// Is `self` equal to `other`?
    ///
    /// See `partial_cmp` for details.
    fn eq(&self, other: &block::Hash) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd<block::Hash> for ExpandedDifficulty {
    /// `block::Hash`es are compared with `ExpandedDifficulty` thresholds by
    /// converting the hash to a 256-bit integer in little-endian order.
    ///
    /// Greater values represent *less* work.
    fn partial_cmp(&self, other: &block::Hash) -> Option<Ordering> {
        self.partial_cmp(&ExpandedDifficulty::from_hash(other))
    }
}

impl PartialEq<ExpandedDifficulty> for block::Hash {
    /// Is `self` equal to `other`?
    ///
    /// See `<ExpandedDifficulty as PartialOrd<block::Hash>::partial_cmp`
    /// for details.
    fn eq(&self, other: &ExpandedDifficulty) -> bool {
        other.eq(self)
    }
}

impl PartialOrd<ExpandedDifficulty> for block::Hash {
    /// How does `self` compare to `other`?
    ///
    /// See `<ExpandedDifficulty as PartialOrd<block::Hash>::partial_cmp`
    /// for details.
    fn partial_cmp(&self, other: &ExpandedDifficulty) -> Option<Ordering> {
        // Use the canonical implementation, but reverse the order
        other.partial_cmp(self).map(Ordering::reverse)
    }
}
