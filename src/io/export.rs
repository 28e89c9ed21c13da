//! Write the consolidated name tables to CSV.
//!
//! Set-valued cells are written in sorted order so reruns produce identical
//! bytes. Flags are `1` when set and empty otherwise.

use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::domain::{NameProfile, RankedName};
use crate::error::AppError;

pub const ALL_NAMES_FILE: &str = "all-names.csv";

const ALL_NAMES_HEADER: [&str; 14] = [
    "name",
    "alt_spellings",
    "sex",
    "total_count",
    "first_year",
    "last_year",
    "peak_year",
    "is_biblical",
    "phones",
    "first_letter",
    "stress_pattern",
    "syllable_count",
    "has_internal_alliteration",
    "unisex",
];

const RANKED_HEADER: [&str; 15] = [
    "rank",
    "name",
    "alt_spellings",
    "total_count",
    "n_percent",
    "first_year",
    "last_year",
    "peak_year",
    "is_biblical",
    "phones",
    "first_letter",
    "stress_pattern",
    "syllable_count",
    "has_internal_alliteration",
    "unisex",
];

#[derive(Debug, Serialize)]
struct AllNamesRow<'a> {
    name: &'a str,
    alt_spellings: String,
    sex: &'static str,
    total_count: u64,
    first_year: i32,
    last_year: i32,
    peak_year: i32,
    is_biblical: &'static str,
    phones: String,
    first_letter: String,
    stress_pattern: String,
    syllable_count: u32,
    has_internal_alliteration: &'static str,
    unisex: &'static str,
}

#[derive(Debug, Serialize)]
struct RankedRow<'a> {
    rank: u32,
    name: &'a str,
    alt_spellings: String,
    total_count: u64,
    n_percent: String,
    first_year: i32,
    last_year: i32,
    peak_year: i32,
    is_biblical: &'static str,
    phones: String,
    first_letter: String,
    stress_pattern: String,
    syllable_count: u32,
    has_internal_alliteration: &'static str,
    unisex: &'static str,
}

impl<'a> AllNamesRow<'a> {
    fn from_profile(p: &'a NameProfile) -> Self {
        let e = &p.entry;
        Self {
            name: &e.name,
            alt_spellings: join_spellings(e.alt_spellings.iter()),
            sex: e.sex.code(),
            total_count: e.total_count,
            first_year: e.first_year,
            last_year: e.last_year,
            peak_year: e.peak_year,
            is_biblical: flag(e.is_biblical),
            phones: join_phones(p),
            first_letter: p.first_letter.map(String::from).unwrap_or_default(),
            stress_pattern: p.features.stress_pattern.join(" "),
            syllable_count: p.features.syllable_count,
            has_internal_alliteration: flag(p.features.has_internal_alliteration == Some(true)),
            unisex: flag(p.unisex),
        }
    }
}

impl<'a> RankedRow<'a> {
    fn from_ranked(r: &'a RankedName) -> Self {
        let base = AllNamesRow::from_profile(&r.profile);
        Self {
            rank: r.rank,
            name: base.name,
            alt_spellings: base.alt_spellings,
            total_count: base.total_count,
            n_percent: format!("{:.3}", r.n_percent),
            first_year: base.first_year,
            last_year: base.last_year,
            peak_year: base.peak_year,
            is_biblical: base.is_biblical,
            phones: base.phones,
            first_letter: base.first_letter,
            stress_pattern: base.stress_pattern,
            syllable_count: base.syllable_count,
            has_internal_alliteration: base.has_internal_alliteration,
            unisex: base.unisex,
        }
    }
}

/// Write the combined table (both sexes) in the given order.
pub fn write_all_names_csv(path: &Path, profiles: &[NameProfile]) -> Result<(), AppError> {
    let mut writer = open_writer(path, &ALL_NAMES_HEADER)?;
    for p in profiles {
        writer
            .serialize(AllNamesRow::from_profile(p))
            .map_err(|e| AppError::runtime(format!("Failed to write CSV row to '{}': {e}", path.display())))?;
    }
    finish(writer, path)
}

/// Write one sex's ranked table.
pub fn write_ranked_csv(path: &Path, ranked: &[RankedName]) -> Result<(), AppError> {
    let mut writer = open_writer(path, &RANKED_HEADER)?;
    for r in ranked {
        writer
            .serialize(RankedRow::from_ranked(r))
            .map_err(|e| AppError::runtime(format!("Failed to write CSV row to '{}': {e}", path.display())))?;
    }
    finish(writer, path)
}

fn open_writer(path: &Path, header: &[&str]) -> Result<Writer<std::fs::File>, AppError> {
    // The header is written by hand so that an empty table still gets one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| AppError::runtime(format!("Failed to create CSV '{}': {e}", path.display())))?;
    writer
        .write_record(header)
        .map_err(|e| AppError::runtime(format!("Failed to write CSV header to '{}': {e}", path.display())))?;
    Ok(writer)
}

fn finish(mut writer: Writer<std::fs::File>, path: &Path) -> Result<(), AppError> {
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush CSV '{}': {e}", path.display())))
}

fn flag(set: bool) -> &'static str {
    if set { "1" } else { "" }
}

fn join_spellings<'a>(spellings: impl Iterator<Item = &'a String>) -> String {
    spellings.map(String::as_str).collect::<Vec<_>>().join(" ")
}

fn join_phones(p: &NameProfile) -> String {
    p.entry
        .phones
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("|")
}
