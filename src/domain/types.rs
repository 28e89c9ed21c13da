//! Shared domain types.
//!
//! Each pipeline stage produces a new table of these types rather than
//! mutating the previous one:
//!
//! `NameRecord` -> `AggregatedName` -> `CanonicalNameEntry` -> `NameProfile` -> `RankedName`

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Sex as recorded by the registry files.
///
/// Ordering puts `F` before `M`, which is the ordering of the combined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Sex {
    F,
    M,
}

impl Sex {
    /// Report order: boys first, then girls.
    pub const ALL: [Sex; 2] = [Sex::M, Sex::F];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "F" => Some(Sex::F),
            "M" => Some(Sex::M),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Sex::F => "F",
            Sex::M => "M",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Sex::F => "Girls",
            Sex::M => "Boys",
        }
    }

    /// File name of the per-sex ranked report.
    pub fn report_file_name(self) -> &'static str {
        match self {
            Sex::F => "girls.csv",
            Sex::M => "boys.csv",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One row of a per-year registry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub name: String,
    pub sex: Sex,
    pub birth_year: i32,
    pub count: u64,
}

/// All years of one `(name, sex)` pair folded together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedName {
    pub name: String,
    pub sex: Sex,
    pub total_count: u64,
    pub first_year: i32,
    pub last_year: i32,
    /// Latest year in which the yearly count reached its maximum.
    pub peak_year: i32,
    pub is_biblical: bool,
}

/// One pronunciation of a word: an ordered list of ARPAbet phonemes.
///
/// Vowel phonemes carry a stress digit (`AA1`, `IY0`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transcription {
    phones: Vec<String>,
}

impl Transcription {
    pub fn new(phones: Vec<String>) -> Self {
        Self { phones }
    }

    /// Parse a space separated phoneme string (`"JH AA1 N"`).
    pub fn parse(text: &str) -> Self {
        Self {
            phones: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    /// `self` followed by `suffix`.
    pub fn concat(&self, suffix: &Transcription) -> Transcription {
        let mut phones = Vec::with_capacity(self.phones.len() + suffix.phones.len());
        phones.extend(self.phones.iter().cloned());
        phones.extend(suffix.phones.iter().cloned());
        Transcription { phones }
    }
}

impl fmt::Display for Transcription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phones.join(" "))
    }
}

/// Sound-pattern attributes derived from a set of transcriptions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhoneticFeatures {
    /// Distinct per-transcription stress strings (`"10"`, `"102"`), sorted.
    pub stress_pattern: Vec<String>,
    pub syllable_count: u32,
    /// `Some(true)` when a phoneme repeats inside one transcription,
    /// `None` when no transcription qualifies.
    pub has_internal_alliteration: Option<bool>,
}

/// A phonetic group resolved to its most popular spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalNameEntry {
    pub name: String,
    /// Every spelling sharing a pronunciation with the group, minus `name`.
    pub alt_spellings: BTreeSet<String>,
    pub sex: Sex,
    pub total_count: u64,
    pub first_year: i32,
    pub last_year: i32,
    pub peak_year: i32,
    pub is_biblical: bool,
    /// Union of the members' transcriptions.
    pub phones: BTreeSet<Transcription>,
    /// Spellings whose statistics were merged into this entry (includes `name`).
    pub members: BTreeSet<String>,
}

/// A canonical entry plus its derived per-name columns.
#[derive(Debug, Clone, PartialEq)]
pub struct NameProfile {
    pub entry: CanonicalNameEntry,
    pub first_letter: Option<char>,
    pub features: PhoneticFeatures,
    pub unisex: bool,
}

/// A profile placed in its per-sex ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedName {
    pub rank: u32,
    /// Cumulative share of all births of this sex, in percent.
    pub n_percent: f64,
    pub profile: NameProfile,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `.env`).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub biblical_path: PathBuf,
    pub out_dir: PathBuf,
    pub dictionary_path: PathBuf,
    pub dictionary_url: String,
    pub summary_json: Option<PathBuf>,
    pub top_n: usize,
    pub quiet: bool,
}

/// Per-sex counts for the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SexStats {
    pub sex: Sex,
    pub births: u64,
    pub spellings: usize,
    pub canonical_names: usize,
    pub unisex_names: usize,
}

/// Counts describing one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub year_files: usize,
    pub first_year: i32,
    pub last_year: i32,
    pub records: usize,
    pub biblical_names: usize,
    pub dictionary_words: usize,
    /// Distinct spellings with no dictionary entry and no decomposition.
    pub unresolved_names: usize,
    pub decomposition_cache_entries: usize,
    pub decomposition_cache_hits: usize,
    pub per_sex: Vec<SexStats>,
}
