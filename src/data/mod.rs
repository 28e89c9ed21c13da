//! External reference data.
//!
//! - `cmudict`: the CMU pronouncing dictionary (download + parse + lookup)

pub mod cmudict;

pub use cmudict::{DEFAULT_DICTIONARY_URL, PronouncingDictionary, load_or_fetch, syllable_count};
