//! Fold yearly registry rows into one row per `(name, sex)`.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::domain::{AggregatedName, NameRecord, Sex};

#[derive(Debug, Clone, Copy)]
struct Tally {
    total: u64,
    first_year: i32,
    last_year: i32,
    peak_count: u64,
    peak_year: i32,
}

impl Tally {
    fn start(record: &NameRecord) -> Self {
        Self {
            total: record.count,
            first_year: record.birth_year,
            last_year: record.birth_year,
            peak_count: record.count,
            peak_year: record.birth_year,
        }
    }

    fn add(&mut self, record: &NameRecord) {
        self.total += record.count;
        self.first_year = self.first_year.min(record.birth_year);
        self.last_year = self.last_year.max(record.birth_year);
        match record.count.cmp(&self.peak_count) {
            Ordering::Greater => {
                self.peak_count = record.count;
                self.peak_year = record.birth_year;
            }
            Ordering::Equal => self.peak_year = self.peak_year.max(record.birth_year),
            Ordering::Less => {}
        }
    }
}

/// Sum counts and take year bounds per `(name, sex)`.
///
/// `peak_year` is the latest year in which the name hit its highest yearly
/// count. Output is sorted by [`table_order`]. `is_biblical` starts unset.
pub fn aggregate_records(records: &[NameRecord]) -> Vec<AggregatedName> {
    let mut tallies: HashMap<(&str, Sex), Tally> = HashMap::new();
    for record in records {
        tallies
            .entry((record.name.as_str(), record.sex))
            .and_modify(|t| t.add(record))
            .or_insert_with(|| Tally::start(record));
    }

    let mut out: Vec<AggregatedName> = tallies
        .into_iter()
        .map(|((name, sex), t)| AggregatedName {
            name: name.to_string(),
            sex,
            total_count: t.total,
            first_year: t.first_year,
            last_year: t.last_year,
            peak_year: t.peak_year,
            is_biblical: false,
        })
        .collect();

    out.sort_by(|a, b| {
        table_order(
            (a.sex, a.total_count, a.name.as_str()),
            (b.sex, b.total_count, b.name.as_str()),
        )
    });
    out
}

/// Mark names found (exact spelling) in the biblical list.
pub fn apply_biblical(names: &[AggregatedName], biblical: &HashSet<String>) -> Vec<AggregatedName> {
    names
        .iter()
        .map(|n| AggregatedName {
            is_biblical: biblical.contains(&n.name),
            ..n.clone()
        })
        .collect()
}

/// Sex ascending, then count descending, then name ascending.
pub fn table_order(a: (Sex, u64, &str), b: (Sex, u64, &str)) -> Ordering {
    a.0.cmp(&b.0)
        .then_with(|| b.1.cmp(&a.1))
        .then_with(|| a.2.cmp(b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, sex: Sex, year: i32, count: u64) -> NameRecord {
        NameRecord {
            name: name.to_string(),
            sex,
            birth_year: year,
            count,
        }
    }

    #[test]
    fn aggregates_per_name_and_sex() {
        let records = vec![
            rec("Jordan", Sex::M, 1990, 100),
            rec("Jordan", Sex::M, 1995, 300),
            rec("Jordan", Sex::M, 2000, 200),
            rec("Jordan", Sex::F, 1998, 50),
        ];

        let out = aggregate_records(&records);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].sex, Sex::F);
        assert_eq!(
            out[1],
            AggregatedName {
                name: "Jordan".into(),
                sex: Sex::M,
                total_count: 600,
                first_year: 1990,
                last_year: 2000,
                peak_year: 1995,
                is_biblical: false,
            }
        );
    }

    #[test]
    fn peak_year_tie_takes_latest() {
        let records = vec![
            rec("Ann", Sex::F, 1950, 40),
            rec("Ann", Sex::F, 1960, 40),
            rec("Ann", Sex::F, 1955, 10),
        ];

        assert_eq!(aggregate_records(&records)[0].peak_year, 1960);
    }

    #[test]
    fn sorted_by_sex_then_count_then_name() {
        let records = vec![
            rec("Bob", Sex::M, 2000, 5),
            rec("Al", Sex::M, 2000, 5),
            rec("Cy", Sex::M, 2000, 9),
            rec("Zoe", Sex::F, 2000, 1),
        ];

        let names: Vec<String> = aggregate_records(&records).into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["Zoe", "Cy", "Al", "Bob"]);
    }

    #[test]
    fn biblical_match_is_exact() {
        let names = aggregate_records(&[rec("John", Sex::M, 2000, 5), rec("Johnny", Sex::M, 2000, 3)]);
        let biblical = HashSet::from(["John".to_string()]);

        let marked = apply_biblical(&names, &biblical);

        assert!(marked[0].is_biblical);
        assert!(!marked[1].is_biblical);
    }
}
