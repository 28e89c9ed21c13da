//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - CSV table exports (`export`)
//! - run summary JSON (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
