//! Spelling consolidation.
//!
//! Names that share a pronunciation are grouped and collapsed onto one
//! canonical spelling with merged statistics.

pub mod spelling;

pub use spelling::*;
