//! Core Supperchain data structures for proof-of-work difficulty.
//!
//! This crate provides the block header fields that difficulty checks read,
//! the compact and expanded difficulty representations, the per-network
//! consensus parameters, and a read-only view over a chain of headers.
//!
//! It performs no validation itself: the consensus rules live in
//! `supper-consensus`.

// Standard lints
#![deny(missing_docs)]
#![allow(clippy::try_err)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate serde;

pub mod block;
pub mod chain_ancestry;
pub mod parameters;
pub mod work;
