//! Implementation of Supperchain proof-of-work consensus checks.
//!
//! This crate answers three questions about block headers:
//!
//! 1. *What difficulty should the next block use?* See
//!    [`difficulty::next_work_required`], which walks back through a
//!    [`ChainAncestry`](supper_chain::chain_ancestry::ChainAncestry) view.
//!
//! 2. *Is a claimed difficulty change allowed?* See
//!    [`difficulty::permitted_difficulty_transition`], which only needs the
//!    old and new compact bits.
//!
//! 3. *Does a block hash satisfy its claimed difficulty?* See
//!    [`pow::check_proof_of_work`] and [`PowVerifier`].
//!
//! Every function here is a pure, synchronous calculation over immutable
//! inputs, so they can be called from any number of validation threads.
//! The [`check`] module wraps the boolean results in [`BlockError`]s for
//! block validation code.

#![forbid(unsafe_code)]
#![allow(clippy::try_err)]

mod config;

pub mod check;
pub mod difficulty;
pub mod error;
pub mod pow;

pub use config::Config;
pub use error::{BlockError, DifficultyError};
pub use pow::{PowCheckMode, PowVerifier};
