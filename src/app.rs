//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initialises logging
//! - runs the pipeline and writes the three CSV tables
//! - prints the terminal summary and the optional JSON summary

use clap::Parser;
use tracing::Level;

use crate::cli::Cli;
use crate::domain::PipelineConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `babynames` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = pipeline_config_from_args(&cli);
    let output = pipeline::run_pipeline(&config)?;
    let written = pipeline::write_outputs(&config, &output)?;

    if !config.quiet {
        println!("{}", crate::report::format_run_summary(&output.stats));
        for (sex, rows) in &output.ranked {
            println!("{}", crate::report::format_rankings(rows, *sex, config.top_n));
        }
    }

    if let Some(path) = &config.summary_json {
        crate::io::write_summary_json(path, &output.stats, &written)?;
    }

    Ok(())
}

pub fn pipeline_config_from_args(cli: &Cli) -> PipelineConfig {
    PipelineConfig {
        data_dir: cli.data_dir.clone(),
        biblical_path: cli.biblical.clone(),
        out_dir: cli.out_dir.clone(),
        dictionary_path: cli.dictionary.clone(),
        dictionary_url: cli.dictionary_url.clone(),
        summary_json: cli.summary_json.clone(),
        top_n: cli.top,
        quiet: cli.quiet,
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
