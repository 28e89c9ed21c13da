//! Machine-readable run summary (JSON).

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::RunStats;
use crate::error::AppError;

/// Schema of the `--summary-json` file.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryFile<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub stats: &'a RunStats,
    pub outputs: &'a [PathBuf],
}

/// Write the run summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, stats: &RunStats, outputs: &[PathBuf]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    let summary = SummaryFile {
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        stats,
        outputs,
    };

    serde_json::to_writer_pretty(file, &summary)
        .map_err(|e| AppError::runtime(format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}
