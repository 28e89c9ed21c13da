//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and aggregated name rows (`NameRecord`, `AggregatedName`)
//! - pronunciations (`Transcription`) and their derived `PhoneticFeatures`
//! - consolidated and ranked outputs (`CanonicalNameEntry`, `NameProfile`, `RankedName`)

pub mod types;

pub use types::*;
