//! Stress, syllable, and alliteration attributes of a pronunciation set.

use std::collections::{BTreeSet, HashSet};

use rayon::prelude::*;

use crate::data::syllable_count;
use crate::domain::{CanonicalNameEntry, NameProfile, PhoneticFeatures, Transcription};

/// Attach the first letter and phonetic features to every consolidated entry.
///
/// Rows are independent, so they are processed in parallel; output order
/// matches input order. `unisex` is left unset for the report stage.
pub fn profile_entries(entries: Vec<CanonicalNameEntry>) -> Vec<NameProfile> {
    entries
        .into_par_iter()
        .map(|entry| NameProfile {
            first_letter: entry.name.chars().next(),
            features: extract_features(&entry.phones),
            unisex: false,
            entry,
        })
        .collect()
}

/// Derive all phonetic features from the transcriptions of one name.
pub fn extract_features<'a, I>(transcriptions: I) -> PhoneticFeatures
where
    I: IntoIterator<Item = &'a Transcription> + Clone,
{
    PhoneticFeatures {
        stress_pattern: stress_pattern(transcriptions.clone()),
        syllable_count: syllables(transcriptions.clone()),
        has_internal_alliteration: internal_alliteration(transcriptions),
    }
}

/// Stress digits of each transcription (`"M EH1 R IY0"` -> `"10"`),
/// deduplicated and sorted. A transcription without any stress digit
/// contributes nothing, so no empty string appears in the output.
pub fn stress_pattern<'a>(transcriptions: impl IntoIterator<Item = &'a Transcription>) -> Vec<String> {
    transcriptions
        .into_iter()
        .map(|t| {
            t.phones()
                .iter()
                .flat_map(|phone| phone.chars())
                .filter(|c| matches!(c, '0'..='2'))
                .collect::<String>()
        })
        .filter(|stresses| !stresses.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Mean syllable count across transcriptions, rounded to one decimal and
/// then truncated (so 1.96 -> 2.0 -> 2, but 1.94 -> 1.9 -> 1).
pub fn syllables<'a>(transcriptions: impl IntoIterator<Item = &'a Transcription>) -> u32 {
    let counts: Vec<u32> = transcriptions.into_iter().map(syllable_count).collect();
    if counts.is_empty() {
        return 0;
    }

    let mean = counts.iter().map(|&c| f64::from(c)).sum::<f64>() / counts.len() as f64;
    round_one_decimal(mean).trunc() as u32
}

/// Round to one decimal using the exact binary value of `v`.
///
/// `(v * 10.0).round()` is off for values like 1.95, which is stored just
/// below 1.95 but multiplies up to exactly 19.5. Formatting rounds the exact
/// value (ties to even), so 1.95 -> 1.9.
fn round_one_decimal(v: f64) -> f64 {
    format!("{v:.1}").parse().unwrap_or(v)
}

/// `Some(true)` if any single transcription repeats a phoneme token
/// (stress digit included), otherwise `None`.
pub fn internal_alliteration<'a>(transcriptions: impl IntoIterator<Item = &'a Transcription>) -> Option<bool> {
    let repeats = transcriptions.into_iter().any(|t| {
        let mut seen = HashSet::new();
        t.phones().iter().any(|phone| !seen.insert(phone.as_str()))
    });
    repeats.then_some(true)
}
