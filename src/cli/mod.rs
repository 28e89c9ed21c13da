//! Command-line parsing.
//!
//! Every option has a default matching the conventional data layout, so a bare
//! `babynames` run reads `data/` and writes the three tables into the current
//! directory. Path options may also come from the environment (or `.env`).

use std::path::PathBuf;

use clap::Parser;

use crate::data::DEFAULT_DICTIONARY_URL;

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "babynames",
    version,
    about = "Consolidate baby-name registry data by pronunciation and write ranked reports"
)]
pub struct Cli {
    /// Directory of per-year registry files (`yob1990.txt`: `name,sex,count`).
    #[arg(long, env = "BABYNAMES_DATA_DIR", default_value = "data/babynames")]
    pub data_dir: PathBuf,

    /// Biblical names CSV (needs a `name` column).
    #[arg(long, env = "BABYNAMES_BIBLICAL", default_value = "data/biblical_names.csv")]
    pub biblical: PathBuf,

    /// Directory for `all-names.csv`, `boys.csv` and `girls.csv`.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Local copy of the CMU pronouncing dictionary (downloaded if missing).
    #[arg(long, env = "BABYNAMES_DICT", default_value = "data/cmudict.dict")]
    pub dictionary: PathBuf,

    /// Where to download the dictionary from.
    #[arg(long, env = "BABYNAMES_DICT_URL", default_value = DEFAULT_DICTIONARY_URL)]
    pub dictionary_url: String,

    /// Also write a JSON run summary.
    #[arg(long, value_name = "JSON")]
    pub summary_json: Option<PathBuf>,

    /// Show top-N names per sex in the terminal summary.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Do not print the terminal summary.
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}
