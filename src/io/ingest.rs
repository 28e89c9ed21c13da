//! CSV ingest and validation.
//!
//! Two inputs feed the pipeline:
//!
//! - a directory of per-year registry files (`yob1990.txt`), headerless rows of
//!   `name,sex,count`; the birth year comes from the file name
//! - a biblical names CSV with a `name` column and an optional flag column
//!
//! Unlike a best-effort loader, any malformed row aborts the run (exit code 2):
//! a dropped or coerced row would silently skew every downstream total.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::debug;

use crate::domain::{NameRecord, Sex};
use crate::error::AppError;

/// A registry file and the birth year encoded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFile {
    pub path: PathBuf,
    pub year: i32,
}

/// Ingest output: every record plus where it came from.
#[derive(Debug, Clone)]
pub struct IngestedRecords {
    pub records: Vec<NameRecord>,
    pub files: Vec<YearFile>,
}

/// Read every year file under `dir`.
pub fn load_name_records(dir: &Path) -> Result<IngestedRecords, AppError> {
    let files = discover_year_files(dir)?;

    let mut records = Vec::new();
    for file in &files {
        let rows = read_year_file(file)?;
        debug!(path = %file.path.display(), year = file.year, rows = rows.len(), "read year file");
        records.extend(rows);
    }

    Ok(IngestedRecords { records, files })
}

/// All `*.txt` files in `dir`, sorted by path.
pub fn discover_year_files(dir: &Path) -> Result<Vec<YearFile>, AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::input(format!("Failed to read data directory '{}': {e}", dir.display())))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| AppError::input(format!("Failed to list data directory '{}': {e}", dir.display())))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(AppError::new(
            3,
            format!("No year files (*.txt) found in '{}'.", dir.display()),
        ));
    }

    paths
        .into_iter()
        .map(|path| {
            let year = year_from_file_name(&path)?;
            Ok(YearFile { path, year })
        })
        .collect()
}

/// Birth year from a file stem such as `yob1990`.
///
/// The stem must contain exactly one run of digits; `yob1990_v2` is rejected.
pub fn year_from_file_name(path: &Path) -> Result<i32, AppError> {
    let invalid = || {
        AppError::input(format!(
            "Cannot determine birth year from file name '{}' (expected exactly one digit run).",
            path.display()
        ))
    };

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let mut runs = stem.split(|c: char| !c.is_ascii_digit()).filter(|run| !run.is_empty());

    match (runs.next(), runs.next()) {
        (Some(digits), None) => digits.parse::<i32>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Parse one headerless `name,sex,count` file.
pub fn read_year_file(file: &YearFile) -> Result<Vec<NameRecord>, AppError> {
    let handle = File::open(&file.path)
        .map_err(|e| AppError::input(format!("Failed to open '{}': {e}", file.path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(handle);

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = result
            .as_ref()
            .ok()
            .and_then(|r| r.position())
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);

        let record = result.map_err(|e| {
            AppError::input(format!("{}:{line}: CSV parse error: {e}", file.path.display()))
        })?;

        let (name, sex, count) = parse_record(&record)
            .map_err(|msg| AppError::input(format!("{}:{line}: {msg}", file.path.display())))?;

        out.push(NameRecord {
            name,
            sex,
            birth_year: file.year,
            count,
        });
    }

    Ok(out)
}

fn parse_record(record: &StringRecord) -> Result<(String, Sex, u64), String> {
    if record.len() != 3 {
        return Err(format!(
            "expected 3 columns (name,sex,count), found {}.",
            record.len()
        ));
    }

    let name = record.get(0).unwrap_or("");
    if name.is_empty() {
        return Err("Empty name.".to_string());
    }

    let sex_raw = record.get(1).unwrap_or("");
    let sex = Sex::from_code(sex_raw).ok_or_else(|| format!("Invalid sex '{sex_raw}' (expected M or F)."))?;

    let count_raw = record.get(2).unwrap_or("");
    let count = count_raw
        .parse::<u64>()
        .map_err(|_| format!("Invalid count '{count_raw}' (expected a non-negative integer)."))?;

    Ok((name.to_string(), sex, count))
}

/// Names listed as biblical in the biblical names CSV.
///
/// A `biblical` (or `is_biblical`) column, when present, must be truthy for a
/// row to count; without one every listed name counts.
pub fn load_biblical_names(path: &Path) -> Result<HashSet<String>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open biblical names CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read biblical names CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let name_idx = *header_map
        .get("name")
        .ok_or_else(|| AppError::input("Biblical names CSV is missing required column: `name`"))?;
    let flag_idx = header_map
        .get("biblical")
        .or_else(|| header_map.get("is_biblical"))
        .copied();

    let mut names = HashSet::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: header line plus 1-based numbering.
        let line = idx + 2;
        let record = result.map_err(|e| {
            AppError::input(format!("{}:{line}: CSV parse error: {e}", path.display()))
        })?;

        let name = record.get(name_idx).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        let listed = match flag_idx {
            Some(i) => is_truthy(record.get(i).unwrap_or("")),
            None => true,
        };
        if listed {
            names.insert(name.to_string());
        }
    }

    Ok(names)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "1.0" | "true" | "yes" | "y"
    )
}
