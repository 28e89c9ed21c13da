//! Formatted terminal output.
//!
//! We keep formatting code in one place so the pipeline stages stay free of
//! presentation concerns.

use crate::domain::{RankedName, RunStats, Sex};

/// Format the run summary (inputs, phonetic coverage, per-sex counts).
pub fn format_run_summary(stats: &RunStats) -> String {
    let mut out = String::new();

    out.push_str("=== babynames - phonetic name report ===\n");
    out.push_str(&format!(
        "Input: {} year files ({}-{}) | {} records | {} biblical names\n",
        stats.year_files, stats.first_year, stats.last_year, stats.records, stats.biblical_names
    ));
    out.push_str(&format!(
        "Phonetics: dictionary={} words | unresolved={} | decomposition cache={} entries, {} hits\n",
        stats.dictionary_words,
        stats.unresolved_names,
        stats.decomposition_cache_entries,
        stats.decomposition_cache_hits,
    ));

    out.push('\n');
    for s in &stats.per_sex {
        out.push_str(&format!(
            "{:<6} births={} spellings={} canonical={} unisex={}\n",
            s.sex.display_name(),
            s.births,
            s.spellings,
            s.canonical_names,
            s.unisex_names
        ));
    }

    out
}

/// Format the top-N rows of one sex's ranked table.
pub fn format_rankings(ranked: &[RankedName], sex: Sex, top_n: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("Top {} {}:\n", top_n.min(ranked.len()), sex.display_name().to_lowercase()));
    out.push_str(
        format!(
            "{:>5} {:<16} {:>10} {:>8} {:>5} {:<24}\n",
            "rank", "name", "births", "pct", "syl", "variants"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<5} {:-<16} {:-<10} {:-<8} {:-<5} {:-<24}\n", "", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for r in ranked.iter().take(top_n) {
        let e = &r.profile.entry;
        let variants: Vec<&str> = e.alt_spellings.iter().map(String::as_str).collect();
        out.push_str(
            format!(
                "{:>5} {:<16} {:>10} {:>8.3} {:>5} {:<24}\n",
                r.rank,
                truncate(&e.name, 16),
                e.total_count,
                r.n_percent,
                r.profile.features.syllable_count,
                truncate(&variants.join(" "), 24),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
