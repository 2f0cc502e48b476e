//! Typing log analyzer - batch statistics over hold-to-remap typing logs

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

use typing_log_analyzer::{
    cli::{Cli, USAGE},
    config::Config,
    events::{self, discovery},
    pipeline::{self, PlotOutcome},
    plots::{PlotGenerator, PlotStyle},
    report::{render_console, AnalysisReport},
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    if !cli.has_input() {
        eprintln!("{}", USAGE);
        return Ok(ExitCode::FAILURE);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Ignoring config file: {}", e);
            Config::default()
        }),
    };

    let inputs = resolve_inputs(&cli, &config)?;
    for path in &inputs {
        println!("Loading log file: {}", path.display());
    }
    let dataset = events::load_files(&inputs)?;

    if dataset.is_empty() {
        eprintln!("No log data found.");
        return Ok(ExitCode::FAILURE);
    }
    info!(
        "{} records loaded, {} malformed lines skipped",
        dataset.len(),
        dataset.skipped_lines()
    );

    let sections = pipeline::run_analyses(&dataset, &config.analysis);

    let plots = if cli.no_plots {
        PlotOutcome::Disabled
    } else {
        let style = PlotStyle::init(&config.plots);
        let output_dir = cli
            .output_dir
            .clone()
            .unwrap_or_else(|| config.plots.output_dir.clone());
        pipeline::run_plots(&PlotGenerator::new(style, output_dir), &dataset)
    };

    let report = AnalysisReport::new(&dataset, sections, plots);
    print!("{}", render_console(&report));

    if let Some(path) = &cli.json {
        match report.export_json(path) {
            Ok(()) => println!("Report saved: {}", path.display()),
            Err(e) => {
                warn!("Report export failed: {}", e);
                println!("Warning: could not write report {}: {}", path.display(), e);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Files to load: the named log, or every discovered log for `--all`.
fn resolve_inputs(cli: &Cli, config: &Config) -> Result<Vec<PathBuf>> {
    if let Some(path) = &cli.log_file {
        return Ok(vec![path.clone()]);
    }

    let Some(dir) = cli
        .log_dir
        .clone()
        .or_else(|| config.logs.log_dir.clone())
        .or_else(discovery::default_log_dir)
    else {
        bail!("Could not determine the typing log directory; pass --log-dir");
    };

    let files = discovery::find_typing_logs(&dir);
    if files.is_empty() {
        bail!("No typing logs found in {}", dir.display());
    }
    Ok(files)
}
