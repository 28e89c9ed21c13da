//! Reporting: ranked per-sex tables and terminal output.

pub mod format;
pub mod ranking;

pub use format::*;
pub use ranking::*;
