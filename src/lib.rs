//! `babynames` library crate.
//!
//! The binary (`babynames`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - the phonetic and consolidation stages are reusable on their own

pub mod app;
pub mod cli;
pub mod consolidate;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod phonetic;
pub mod report;
pub mod tally;
