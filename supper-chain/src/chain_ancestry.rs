//! Read-only access to the ancestors of a chain tip.
//!
//! Difficulty adjustment looks back through the headers before the block it
//! is calculating the difficulty for. This module provides that lookup as a
//! trait, so block validation can use whatever chain state it already has,
//! and an in-memory [`HeaderChain`] implementation.

use thiserror::Error;

use crate::block::{self, Header, Height};

#[cfg(any(test, feature = "proptest-impl"))]
pub mod generate;
#[cfg(test)]
mod tests;

/// A header at a known position in a chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexedHeader {
    /// The height of this block.
    pub height: Height,

    /// The hash of this block's header.
    pub hash: block::Hash,

    /// The header fields used by difficulty checks.
    pub header: Header,
}

/// Read-only access to an immutable chain of headers, ending at a tip.
///
/// Implementations must return the same headers for every call during a
/// validation pass: the difficulty rules assume a single consistent view of
/// the chain.
pub trait ChainAncestry {
    /// Returns the tip of this chain, the block the next block will build on.
    fn tip(&self) -> &IndexedHeader;

    /// Returns the ancestor of the tip at `height`.
    ///
    /// Returns `None` if `height` is above the tip.
    fn ancestor(&self, height: Height) -> Option<&IndexedHeader>;

    /// Returns the parent of `block`, by following its previous block hash.
    ///
    /// Returns `None` for the genesis block, and if the parent at the previous
    /// height does not have the expected hash.
    fn previous(&self, block: &IndexedHeader) -> Option<&IndexedHeader> {
        let parent = self.ancestor(block.height.previous()?)?;

        if parent.hash == block.header.previous_block_hash {
            Some(parent)
        } else {
            None
        }
    }
}

/// An error building a [`HeaderChain`].
#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
pub enum ChainError {
    /// The header does not build on the current tip.
    #[error(
        "header {hash:?} does not build on the chain tip: \
         previous block hash {previous_block_hash:?}, tip hash {tip_hash:?}"
    )]
    NotOnTip {
        /// The hash of the rejected header.
        hash: block::Hash,
        /// The rejected header's parent hash.
        previous_block_hash: block::Hash,
        /// The hash of the current chain tip.
        tip_hash: block::Hash,
    },

    /// The chain is already at the maximum height.
    #[error("chain is already at the maximum height {0:?}")]
    HeightLimit(Height),
}

/// An in-memory chain of headers, indexed by height.
///
/// The first header is the genesis block. Each added header must build on the
/// current tip.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeaderChain {
    /// The headers in height order. Never empty.
    headers: Vec<IndexedHeader>,
}

impl HeaderChain {
    /// Returns a new chain containing only the genesis block.
    pub fn new(genesis_hash: block::Hash, genesis: Header) -> HeaderChain {
        HeaderChain {
            headers: vec![IndexedHeader {
                height: Height::MIN,
                hash: genesis_hash,
                header: genesis,
            }],
        }
    }

    /// Adds `header` on top of the current tip, and returns the new tip.
    pub fn push(
        &mut self,
        hash: block::Hash,
        header: Header,
    ) -> Result<&IndexedHeader, ChainError> {
        let tip = *self.tip();

        if header.previous_block_hash != tip.hash {
            tracing::debug!(?hash, ?tip.hash, "rejected header that does not build on the tip");

            return Err(ChainError::NotOnTip {
                hash,
                previous_block_hash: header.previous_block_hash,
                tip_hash: tip.hash,
            });
        }

        let height = tip.height.next().ok_or(ChainError::HeightLimit(tip.height))?;

        self.headers.push(IndexedHeader {
            height,
            hash,
            header,
        });

        Ok(self.tip())
    }

    /// Returns the number of blocks in the chain, including the genesis block.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Always returns `false`: a chain has at least a genesis block.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the headers, from the genesis block to the tip.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedHeader> + '_ {
        self.headers.iter()
    }
}

impl ChainAncestry for HeaderChain {
    fn tip(&self) -> &IndexedHeader {
        self.headers
            .last()
            .expect("header chains always contain the genesis block")
    }

    fn ancestor(&self, height: Height) -> Option<&IndexedHeader> {
        let index = usize::try_from(height.0).ok()?;
        self.headers.get(index)
    }
}

impl<T> ChainAncestry for &T
where
    T: ChainAncestry + ?Sized,
{
    fn tip(&self) -> &IndexedHeader {
        (**self).tip()
    }

    fn ancestor(&self, height: Height) -> Option<&IndexedHeader> {
        (**self).ancestor(height)
    }

    fn previous(&self, block: &IndexedHeader) -> Option<&IndexedHeader> {
        (**self).previous(block)
    }
}
