//! Merge alternate spellings that share a pronunciation.
//!
//! For every name we collect the *full alternate-spelling set*: every name
//! (either sex) that shares at least one transcription with it, itself
//! included. Names of the same sex whose full sets are identical form one
//! group.
//!
//! This grouping is intentionally narrower than a transitive closure. With
//! `Aiden = [EY1 D AH0 N]`, `Aidan = [EY1 D AH0 N, AY1 D AH0 N]` and
//! `Ayden = [AY1 D AH0 N]`, the three full sets all differ, so nothing is
//! merged even though the names are phonetically chained.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::{AggregatedName, CanonicalNameEntry, Sex, Transcription};
use crate::tally::table_order;

/// Identity of a phonetic group within one sex.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
    /// The full alternate-spelling set.
    Shared(BTreeSet<String>),
    /// No transcriptions: the name stands alone.
    Unresolved(String),
}

/// Transcription -> every name (either sex) that has it.
pub fn build_phone_index<'a>(
    names: &'a [AggregatedName],
    transcriptions: &'a HashMap<String, Vec<Transcription>>,
) -> BTreeMap<&'a Transcription, BTreeSet<&'a str>> {
    let mut index: BTreeMap<&Transcription, BTreeSet<&str>> = BTreeMap::new();
    for name in names {
        for phones in transcriptions_of(&name.name, transcriptions) {
            index.entry(phones).or_default().insert(name.name.as_str());
        }
    }
    index
}

/// Every name sharing any of `name`'s transcriptions, `name` included.
///
/// Empty when `name` has no transcriptions.
pub fn full_alt_spellings(
    name: &str,
    transcriptions: &HashMap<String, Vec<Transcription>>,
    index: &BTreeMap<&Transcription, BTreeSet<&str>>,
) -> BTreeSet<String> {
    transcriptions_of(name, transcriptions)
        .iter()
        .filter_map(|phones| index.get(phones))
        .flatten()
        .map(|n| n.to_string())
        .collect()
}

/// Group `names` by shared pronunciation and collapse each group onto its most
/// popular spelling.
///
/// Within a group the canonical spelling is the highest `total_count`, ties
/// broken alphabetically. Counts are summed, `first_year` is the minimum,
/// `last_year` and `peak_year` the maximum, and `is_biblical` is set if any
/// member is biblical. Output is sorted by sex, count descending, name.
pub fn consolidate(
    names: &[AggregatedName],
    transcriptions: &HashMap<String, Vec<Transcription>>,
) -> Vec<CanonicalNameEntry> {
    let index = build_phone_index(names, transcriptions);

    let mut groups: BTreeMap<(Sex, GroupKey), Vec<&AggregatedName>> = BTreeMap::new();
    for name in names {
        let full = full_alt_spellings(&name.name, transcriptions, &index);
        let key = if full.is_empty() {
            GroupKey::Unresolved(name.name.clone())
        } else {
            GroupKey::Shared(full)
        };
        groups.entry((name.sex, key)).or_default().push(name);
    }

    let mut out: Vec<CanonicalNameEntry> = groups
        .into_iter()
        .map(|((_, key), members)| merge_group(key, members, transcriptions))
        .collect();

    out.sort_by(|a, b| {
        table_order(
            (a.sex, a.total_count, a.name.as_str()),
            (b.sex, b.total_count, b.name.as_str()),
        )
    });
    out
}

fn merge_group(
    key: GroupKey,
    mut members: Vec<&AggregatedName>,
    transcriptions: &HashMap<String, Vec<Transcription>>,
) -> CanonicalNameEntry {
    members.sort_by(|a, b| b.total_count.cmp(&a.total_count).then_with(|| a.name.cmp(&b.name)));
    let canonical = members[0];

    let mut alt_spellings = match key {
        GroupKey::Shared(full) => full,
        GroupKey::Unresolved(_) => BTreeSet::new(),
    };
    alt_spellings.remove(&canonical.name);

    CanonicalNameEntry {
        name: canonical.name.clone(),
        alt_spellings,
        sex: canonical.sex,
        total_count: members.iter().map(|m| m.total_count).sum(),
        first_year: members.iter().map(|m| m.first_year).min().unwrap_or(canonical.first_year),
        last_year: members.iter().map(|m| m.last_year).max().unwrap_or(canonical.last_year),
        peak_year: members.iter().map(|m| m.peak_year).max().unwrap_or(canonical.peak_year),
        is_biblical: members.iter().any(|m| m.is_biblical),
        phones: members
            .iter()
            .flat_map(|m| transcriptions_of(&m.name, transcriptions))
            .cloned()
            .collect(),
        members: members.iter().map(|m| m.name.clone()).collect(),
    }
}

fn transcriptions_of<'a>(
    name: &str,
    transcriptions: &'a HashMap<String, Vec<Transcription>>,
) -> &'a [Transcription] {
    transcriptions.get(name).map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(name: &str, sex: Sex, total: u64, first: i32, last: i32) -> AggregatedName {
        AggregatedName {
            name: name.to_string(),
            sex,
            total_count: total,
            first_year: first,
            last_year: last,
            peak_year: last,
            is_biblical: false,
        }
    }

    fn phones(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<Transcription>> {
        pairs
            .iter()
            .map(|(name, ts)| (name.to_string(), ts.iter().map(|t| Transcription::parse(t)).collect()))
            .collect()
    }

    fn strings(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn jon_merges_into_john() {
        let names = vec![agg("John", Sex::M, 9500, 1990, 1990), agg("Jon", Sex::M, 500, 1990, 1990)];
        let ts = phones(&[("John", &["JH AA1 N"]), ("Jon", &["JH AA1 N"])]);

        let out = consolidate(&names, &ts);

        assert_eq!(out.len(), 1);
        let entry = &out[0];
        assert_eq!(entry.name, "John");
        assert_eq!(entry.alt_spellings, strings(&["Jon"]));
        assert_eq!(entry.total_count, 10_000);
        assert_eq!(entry.members, strings(&["John", "Jon"]));
        assert_eq!(entry.phones, BTreeSet::from([Transcription::parse("JH AA1 N")]));
    }

    #[test]
    fn merged_statistics() {
        let mut a = agg("Sara", Sex::F, 300, 1900, 1990);
        a.peak_year = 1950;
        a.is_biblical = false;
        let mut b = agg("Sarah", Sex::F, 900, 1880, 2020);
        b.peak_year = 1985;
        b.is_biblical = true;
        let ts = phones(&[("Sara", &["S EH1 R AH0"]), ("Sarah", &["S EH1 R AH0"])]);

        let out = consolidate(&[a, b], &ts);

        assert_eq!(out.len(), 1);
        let e = &out[0];
        assert_eq!(e.name, "Sarah");
        assert_eq!((e.first_year, e.last_year, e.peak_year), (1880, 2020, 1985));
        assert!(e.is_biblical);
    }

    #[test]
    fn count_tie_picks_alphabetical_canonical() {
        let names = vec![agg("Katie", Sex::F, 100, 2000, 2000), agg("Katey", Sex::F, 100, 2000, 2000)];
        let ts = phones(&[("Katie", &["K EY1 T IY0"]), ("Katey", &["K EY1 T IY0"])]);

        let out = consolidate(&names, &ts);

        assert_eq!(out[0].name, "Katey");
        assert_eq!(out[0].alt_spellings, strings(&["Katie"]));
    }

    #[test]
    fn sexes_are_never_merged() {
        let names = vec![agg("Jordan", Sex::M, 200, 1990, 2000), agg("Jordyn", Sex::F, 100, 1990, 2000)];
        let ts = phones(&[("Jordan", &["JH AO1 R D AH0 N"]), ("Jordyn", &["JH AO1 R D AH0 N"])]);

        let out = consolidate(&names, &ts);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].sex, Sex::F);
        assert_eq!(out[0].name, "Jordyn");
        // The reverse index spans both sexes.
        assert_eq!(out[0].alt_spellings, strings(&["Jordan"]));
        assert_eq!(out[1].name, "Jordan");
        assert_eq!(out[1].alt_spellings, strings(&["Jordyn"]));
    }

    #[test]
    fn unresolved_names_stay_single() {
        let names = vec![agg("Xq", Sex::M, 10, 2000, 2000), agg("Zz", Sex::M, 5, 2000, 2000)];
        let ts = phones(&[("Xq", &[]), ("Zz", &[])]);

        let out = consolidate(&names, &ts);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|e| e.alt_spellings.is_empty() && e.phones.is_empty()));
    }

    #[test]
    fn grouping_is_not_transitive() {
        let names = vec![
            agg("Aidan", Sex::M, 300, 2000, 2000),
            agg("Aiden", Sex::M, 200, 2000, 2000),
            agg("Ayden", Sex::M, 100, 2000, 2000),
        ];
        let ts = phones(&[
            ("Aiden", &["EY1 D AH0 N"]),
            ("Aidan", &["EY1 D AH0 N", "AY1 D AH0 N"]),
            ("Ayden", &["AY1 D AH0 N"]),
        ]);

        let out = consolidate(&names, &ts);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].name, "Aidan");
        assert_eq!(out[0].alt_spellings, strings(&["Aiden", "Ayden"]));
        assert_eq!(out[1].name, "Aiden");
        assert_eq!(out[1].alt_spellings, strings(&["Aidan"]));
        assert_eq!(out[2].alt_spellings, strings(&["Aidan"]));
    }

    #[test]
    fn identical_full_sets_merge_even_with_different_phones() {
        // Both names share every pronunciation they have with each other.
        let names = vec![agg("Lee", Sex::M, 50, 2000, 2000), agg("Leigh", Sex::M, 20, 2000, 2000)];
        let ts = phones(&[("Lee", &["L IY1"]), ("Leigh", &["L IY1", "L EY1"])]);

        let out = consolidate(&names, &ts);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Lee");
        assert_eq!(out[0].phones.len(), 2);
    }

    #[test]
    fn totals_are_preserved() {
        let names = vec![
            agg("John", Sex::M, 9500, 1990, 1990),
            agg("Jon", Sex::M, 500, 1990, 1990),
            agg("Jonn", Sex::F, 7, 1990, 1990),
            agg("Qx", Sex::F, 3, 1990, 1990),
        ];
        let ts = phones(&[("John", &["JH AA1 N"]), ("Jon", &["JH AA1 N"]), ("Jonn", &["JH AA1 N"])]);

        let out = consolidate(&names, &ts);

        let input: u64 = names.iter().map(|n| n.total_count).sum();
        let output: u64 = out.iter().map(|e| e.total_count).sum();
        assert_eq!(input, output);
        for entry in &out {
            let members: u64 = names
                .iter()
                .filter(|n| n.sex == entry.sex && entry.members.contains(&n.name))
                .map(|n| n.total_count)
                .sum();
            assert_eq!(entry.total_count, members);
        }
    }
}
