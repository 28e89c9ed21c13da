//! Popularity ranks, cumulative shares, and unisex classification.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{NameProfile, RankedName, Sex};

/// A unisex name must still be in use after this year...
pub const UNISEX_MIN_LAST_YEAR: i32 = 1970;
/// ...and have more than this many births, for both sexes.
pub const UNISEX_MIN_TOTAL: u64 = 15_000;

/// Flag every row whose canonical name qualifies for both sexes.
pub fn mark_unisex(profiles: &[NameProfile]) -> Vec<NameProfile> {
    let mut qualifying: HashMap<&str, BTreeSet<Sex>> = HashMap::new();
    for p in profiles {
        if p.entry.last_year > UNISEX_MIN_LAST_YEAR && p.entry.total_count > UNISEX_MIN_TOTAL {
            qualifying.entry(p.entry.name.as_str()).or_default().insert(p.entry.sex);
        }
    }

    profiles
        .iter()
        .map(|p| NameProfile {
            unisex: qualifying
                .get(p.entry.name.as_str())
                .is_some_and(|sexes| sexes.len() > 1),
            ..p.clone()
        })
        .collect()
}

/// The ranked table for one sex: count descending, name ascending.
pub fn rank_sex(profiles: &[NameProfile], sex: Sex) -> Vec<RankedName> {
    let mut rows: Vec<&NameProfile> = profiles.iter().filter(|p| p.entry.sex == sex).collect();
    rows.sort_by(|a, b| {
        b.entry
            .total_count
            .cmp(&a.entry.total_count)
            .then_with(|| a.entry.name.cmp(&b.entry.name))
    });

    let counts: Vec<u64> = rows.iter().map(|p| p.entry.total_count).collect();
    let ranks = dense_ranks(&counts);
    let shares = cumulative_percent(&counts);

    rows.into_iter()
        .zip(ranks)
        .zip(shares)
        .map(|((profile, rank), n_percent)| RankedName {
            rank,
            n_percent,
            profile: profile.clone(),
        })
        .collect()
}

/// Dense ranks for counts sorted in descending order: ties share a rank and
/// the next distinct count gets the next integer.
pub fn dense_ranks(sorted_counts: &[u64]) -> Vec<u32> {
    let mut out = Vec::with_capacity(sorted_counts.len());
    let mut rank = 0u32;
    let mut previous: Option<u64> = None;
    for &count in sorted_counts {
        if previous != Some(count) {
            rank += 1;
            previous = Some(count);
        }
        out.push(rank);
    }
    out
}

/// Running total as a percentage of the grand total, rounded to 3 decimals.
pub fn cumulative_percent(counts: &[u64]) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }

    let mut running = 0u64;
    counts
        .iter()
        .map(|&c| {
            running += c;
            round3(100.0 * running as f64 / total as f64)
        })
        .collect()
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
