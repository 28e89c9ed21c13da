//! Pronunciations of names.
//!
//! Responsibilities:
//!
//! - resolve a name to its transcriptions (dictionary, then decomposition)
//! - derive stress / syllable / alliteration features from them

pub mod features;
pub mod resolver;

pub use features::*;
pub use resolver::*;
