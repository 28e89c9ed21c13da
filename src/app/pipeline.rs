//! The batch pipeline shared by the binary and the tests.
//!
//! ingest -> aggregate -> resolve phones -> consolidate -> features -> unisex -> rank
//!
//! Every stage returns a new table; nothing feeds back into an earlier stage.

use std::collections::HashMap;
use std::fs::create_dir_all;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::consolidate::consolidate;
use crate::data::{PronouncingDictionary, load_or_fetch};
use crate::domain::{
    AggregatedName, NameProfile, PipelineConfig, RankedName, RunStats, Sex, SexStats, Transcription,
};
use crate::error::AppError;
use crate::io::{
    ALL_NAMES_FILE, IngestedRecords, load_biblical_names, load_name_records, write_all_names_csv,
    write_ranked_csv,
};
use crate::phonetic::{DecompositionCache, profile_entries, resolve};
use crate::report::{mark_unisex, rank_sex};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stats: RunStats,
    /// Combined table, sorted by sex, count descending, name.
    pub profiles: Vec<NameProfile>,
    /// Ranked tables in report order (boys, then girls).
    pub ranked: Vec<(Sex, Vec<RankedName>)>,
}

impl RunOutput {
    pub fn ranked_for(&self, sex: Sex) -> &[RankedName] {
        self.ranked
            .iter()
            .find(|(s, _)| *s == sex)
            .map(|(_, rows)| rows.as_slice())
            .unwrap_or(&[])
    }
}

/// Execute the full pipeline: load the dictionary (downloading it if needed),
/// then process the inputs.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunOutput, AppError> {
    let dictionary = load_or_fetch(&config.dictionary_path, &config.dictionary_url)?;
    info!(words = dictionary.len(), "pronouncing dictionary ready");
    run_with_dictionary(config, &dictionary)
}

/// Execute the pipeline with an already loaded dictionary.
pub fn run_with_dictionary(
    config: &PipelineConfig,
    dictionary: &PronouncingDictionary,
) -> Result<RunOutput, AppError> {
    // 1) Load registry rows and the biblical list.
    let IngestedRecords { records, files } = load_name_records(&config.data_dir)?;
    if records.is_empty() {
        return Err(AppError::new(
            3,
            format!("No name records found in '{}'.", config.data_dir.display()),
        ));
    }
    info!(files = files.len(), records = records.len(), "registry files loaded");

    let biblical = load_biblical_names(&config.biblical_path)?;

    // 2) One row per (name, sex).
    let aggregated = crate::tally::apply_biblical(&crate::tally::aggregate_records(&records), &biblical);
    info!(names = aggregated.len(), "names aggregated");

    // 3) Pronunciations, one resolution per distinct spelling.
    let mut cache = DecompositionCache::new();
    let transcriptions = resolve_all(&aggregated, dictionary, &mut cache);
    let unresolved = transcriptions.values().filter(|t| t.is_empty()).count();
    if unresolved > 0 {
        warn!(unresolved, "names without any pronunciation");
    }
    debug!(entries = cache.len(), hits = cache.hits(), "decomposition cache");

    // 4) Merge spellings, derive features, classify unisex names.
    let entries = consolidate(&aggregated, &transcriptions);
    info!(groups = entries.len(), "spellings consolidated");
    let profiles = mark_unisex(&profile_entries(entries));

    // 5) Per-sex rankings.
    let ranked: Vec<(Sex, Vec<RankedName>)> =
        Sex::ALL.iter().map(|&sex| (sex, rank_sex(&profiles, sex))).collect();

    let stats = RunStats {
        year_files: files.len(),
        first_year: files.iter().map(|f| f.year).min().unwrap_or_default(),
        last_year: files.iter().map(|f| f.year).max().unwrap_or_default(),
        records: records.len(),
        biblical_names: biblical.len(),
        dictionary_words: dictionary.len(),
        unresolved_names: unresolved,
        decomposition_cache_entries: cache.len(),
        decomposition_cache_hits: cache.hits(),
        per_sex: Sex::ALL
            .iter()
            .map(|&sex| sex_stats(sex, &aggregated, &profiles))
            .collect(),
    };

    Ok(RunOutput {
        stats,
        profiles,
        ranked,
    })
}

/// Write `all-names.csv` and the per-sex tables into the output directory.
pub fn write_outputs(config: &PipelineConfig, output: &RunOutput) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(&config.out_dir).map_err(|e| {
        AppError::runtime(format!(
            "Failed to create output dir '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    let mut written = Vec::new();

    let all_path = config.out_dir.join(ALL_NAMES_FILE);
    write_all_names_csv(&all_path, &output.profiles)?;
    written.push(all_path);

    for (sex, rows) in &output.ranked {
        let path = config.out_dir.join(sex.report_file_name());
        write_ranked_csv(&path, rows)?;
        written.push(path);
    }

    for path in &written {
        info!(path = %path.display(), "wrote");
    }
    Ok(written)
}

fn resolve_all(
    names: &[AggregatedName],
    dictionary: &PronouncingDictionary,
    cache: &mut DecompositionCache,
) -> HashMap<String, Vec<Transcription>> {
    let mut out: HashMap<String, Vec<Transcription>> = HashMap::new();
    for n in names {
        if !out.contains_key(&n.name) {
            let phones = resolve(&n.name, dictionary, cache);
            out.insert(n.name.clone(), phones);
        }
    }
    out
}

fn sex_stats(sex: Sex, aggregated: &[AggregatedName], profiles: &[NameProfile]) -> SexStats {
    let rows = || profiles.iter().filter(move |p| p.entry.sex == sex);
    SexStats {
        sex,
        births: rows().map(|p| p.entry.total_count).sum(),
        spellings: aggregated.iter().filter(|n| n.sex == sex).count(),
        canonical_names: rows().count(),
        unisex_names: rows().filter(|p| p.unisex).count(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;

    fn dictionary() -> PronouncingDictionary {
        PronouncingDictionary::from_pairs([
            ("john", "JH AA1 N"),
            ("jon", "JH AA1 N"),
            ("jordan", "JH AO1 R D AH0 N"),
            ("mary", "M EH1 R IY0"),
            ("marie", "M ER0 IY1"),
            ("marie", "M EH1 R IY0"),
            ("anna", "AE1 N AH0"),
            ("belle", "B EH1 L"),
        ])
    }

    fn fixture(root: &Path) -> PipelineConfig {
        let data = root.join("names");
        fs::create_dir_all(&data).unwrap();
        fs::write(
            data.join("yob1990.txt"),
            "John,M,9000\nJon,M,500\nJordan,M,12000\nJordan,F,10000\nMary,F,800\nMarie,F,300\nAnnabelle,F,40\nZzyzx,M,5\n",
        )
        .unwrap();
        fs::write(
            data.join("yob1995.txt"),
            "John,M,500\nJordan,M,8000\nJordan,F,8000\nMary,F,900\n",
        )
        .unwrap();
        let biblical = root.join("biblical_names.csv");
        fs::write(&biblical, "name\nJohn\nMary\n").unwrap();

        PipelineConfig {
            data_dir: data,
            biblical_path: biblical,
            out_dir: root.join("out"),
            dictionary_path: root.join("cmudict.dict"),
            dictionary_url: "http://127.0.0.1:9/unused".to_string(),
            summary_json: None,
            top_n: 5,
            quiet: true,
        }
    }

    fn find<'a>(output: &'a RunOutput, name: &str, sex: Sex) -> &'a NameProfile {
        output
            .profiles
            .iter()
            .find(|p| p.entry.name == name && p.entry.sex == sex)
            .unwrap()
    }

    #[test]
    fn end_to_end_tables() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());

        let output = run_with_dictionary(&config, &dictionary()).unwrap();

        let john = find(&output, "John", Sex::M);
        assert_eq!(john.entry.total_count, 10_000);
        assert_eq!(john.entry.alt_spellings.iter().collect::<Vec<_>>(), vec!["Jon"]);
        assert!(john.entry.is_biblical);
        assert_eq!((john.entry.first_year, john.entry.last_year), (1990, 1995));

        // Jordan: >15000 for both sexes and used after 1970.
        assert!(find(&output, "Jordan", Sex::M).unisex);
        assert!(find(&output, "Jordan", Sex::F).unisex);
        assert!(!john.unisex);

        // Every pronunciation of Marie is shared with Mary or Marie itself.
        let mary = find(&output, "Mary", Sex::F);
        assert_eq!(mary.entry.total_count, 2_000);
        assert_eq!(mary.entry.phones.len(), 2);
        assert!(output.profiles.iter().all(|p| p.entry.name != "Marie"));

        // Decomposed: anna + belle.
        let annabelle = find(&output, "Annabelle", Sex::F);
        assert_eq!(annabelle.features.syllable_count, 3);

        // Unresolvable names still appear.
        let zz = find(&output, "Zzyzx", Sex::M);
        assert!(zz.entry.phones.is_empty());
        assert_eq!(zz.features.has_internal_alliteration, None);
        assert_eq!(output.stats.unresolved_names, 1);

        let boys = output.ranked_for(Sex::M);
        assert_eq!(boys[0].profile.entry.name, "Jordan");
        assert_eq!(boys.last().unwrap().n_percent, 100.0);
        let girls = output.ranked_for(Sex::F);
        assert_eq!(girls.last().unwrap().n_percent, 100.0);

        let total_in: u64 = 9000 + 500 + 12000 + 10000 + 800 + 300 + 40 + 5 + 500 + 8000 + 8000 + 900;
        let total_out: u64 = output.profiles.iter().map(|p| p.entry.total_count).sum();
        assert_eq!(total_in, total_out);
    }

    #[test]
    fn ranks_are_dense_in_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());

        let output = run_with_dictionary(&config, &dictionary()).unwrap();

        for (_, rows) in &output.ranked {
            for pair in rows.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                if a.profile.entry.total_count == b.profile.entry.total_count {
                    assert_eq!(a.rank, b.rank);
                } else {
                    assert_eq!(a.rank + 1, b.rank);
                }
            }
        }
    }

    #[test]
    fn reruns_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fixture(dir.path());
        let dict = dictionary();

        let first = run_with_dictionary(&config, &dict).unwrap();
        let first_paths = write_outputs(&config, &first).unwrap();

        config.out_dir = dir.path().join("out-again");
        let second = run_with_dictionary(&config, &dict).unwrap();
        let second_paths = write_outputs(&config, &second).unwrap();

        assert_eq!(first_paths.len(), 3);
        for (a, b) in first_paths.iter().zip(&second_paths) {
            assert_eq!(a.file_name(), b.file_name());
            assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
        }
    }

    #[test]
    fn missing_biblical_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fixture(dir.path());
        config.biblical_path = dir.path().join("nope.csv");

        let err = run_with_dictionary(&config, &dictionary()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_year_files_are_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());
        fs::write(config.data_dir.join("yob1990.txt"), "").unwrap();
        fs::write(config.data_dir.join("yob1995.txt"), "").unwrap();

        let err = run_with_dictionary(&config, &dictionary()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
