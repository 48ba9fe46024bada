//! Block-related structures: hashes, heights and headers.

mod hash;
mod header;
mod height;

#[cfg(any(test, feature = "proptest-impl"))]
mod arbitrary;

pub use hash::Hash;
pub use header::Header;
pub use height::Height;
