// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Comicpress — turns folders of scraped comic pages into uniform PDFs.
//
// Entry point. Initialises logging, loads the config, reads the entries file
// and processes every comic in it.

mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use comicpress_core::AppConfig;
use comicpress_core::error::Result;
use tracing::{error, info};

use services::batch::BatchRunner;
use services::entries::read_entries_file;
use services::progress::ConsoleProgress;

/// Collect comic pages into one PDF per comic, removing host banners and
/// turning landscape pages.
#[derive(Debug, Parser)]
#[command(name = "comicpress", version, about)]
struct Cli {
    /// Config file (JSON). Missing file means defaults.
    #[arg(short, long, default_value = "comicpress.json")]
    config: PathBuf,

    /// Entries file with one `name;source_dir` per line.
    #[arg(short, long)]
    entries: Option<PathBuf>,

    /// Where working copies of the pages are kept.
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Where finished PDFs are written.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Derive the page height from each comic's reference page.
    #[arg(long)]
    adaptive_canvas: bool,

    /// Log per-page detail.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Command-line flags win over the config file.
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(entries) = &self.entries {
            config.entries_file = entries.clone();
        }
        if let Some(work_dir) = &self.work_dir {
            config.work_dir = work_dir.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if self.adaptive_canvas {
            config.adaptive_canvas = true;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Comicpress starting");

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "run aborted");
            eprintln!("comicpress: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let mut config = AppConfig::load(&cli.config)?;
    cli.apply_to(&mut config);
    config.validate()?;

    let Some(lines) = read_entries_file(&config.entries_file)? else {
        println!(
            "Can't find the '{}' file. I created one for you. Make sure to fill it with entries!",
            config.entries_file.display()
        );
        return Ok(ExitCode::SUCCESS);
    };

    std::fs::create_dir_all(&config.output_dir)?;
    println!("Found {} Entries", lines.len());
    if lines.is_empty() {
        println!(
            "No entries in '{}'. Did nothing.",
            config.entries_file.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let reporter = ConsoleProgress;
    let runner = BatchRunner::new(config, &reporter);
    let summary = runner.run_all(&lines);
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "run finished"
    );

    Ok(if summary.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
