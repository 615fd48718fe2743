use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use chess_coverage::config::SearchConfig;
use chess_coverage::error::CoverageError;
use chess_coverage::search::{self, SearchOutcome};

/// Find a cheap set of pieces covering every cell of the board.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board side length (1..=8).
    #[arg(long)]
    size: Option<u8>,

    /// Initial score bound.
    #[arg(long)]
    bound: Option<u32>,

    /// Worker threads (default: cores - 1).
    #[arg(long)]
    workers: Option<usize>,

    /// Stop after this many seconds.
    #[arg(long)]
    timeout: Option<f64>,

    /// Write the run summary as JSON to this file.
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl Cli {
    fn search_config(&self) -> Result<SearchConfig, CoverageError> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::load(path)?,
            None => SearchConfig::default(),
        };
        if let Some(size) = self.size {
            config.board_size = size;
        }
        if let Some(bound) = self.bound {
            config.initial_bound = bound;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.timeout.is_some() {
            config.deadline_secs = self.timeout;
        }
        Ok(config)
    }
}

fn write_summary(path: &Path, outcome: &SearchOutcome) -> Result<(), CoverageError> {
    let json = serde_json::to_string_pretty(outcome).map_err(|source| CoverageError::Json {
        stage: "encode summary",
        source,
    })?;
    fs::write(path, json).map_err(|source| CoverageError::Io {
        stage: "write summary",
        path: path.display().to_string(),
        source,
    })
}

fn run(cli: &Cli) -> Result<(), CoverageError> {
    let config = cli.search_config()?;
    let outcome = search::run(&config)?;

    match &outcome.best {
        Some(best) => println!("best covering:\n{best}"),
        None => println!(
            "no covering found within bound {} ({:?})",
            config.initial_bound, outcome.termination
        ),
    }

    if let Some(path) = &cli.summary {
        write_summary(path, &outcome)?;
        info!("summary written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
