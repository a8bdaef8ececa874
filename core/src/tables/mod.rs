//! Binary table loaders.
//!
//! Every size field in these files is untrusted: reads and allocations are
//! bounded by the bytes actually present, and malformed input is reported as
//! a [`LoadError`](crate::LoadError) rather than a panic.

mod reader;

pub mod gtab;
pub mod pho;
pub mod tsin;

pub use gtab::{GtabItem, GtabTable};
pub use pho::{PhoDictionary, PhoIndexEntry, PhoItem};
pub use tsin::TsinHeader;
