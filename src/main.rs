/*!
 * Command-line interface for CodeGatherer
 */

use std::io;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use codegatherer::clipboard::copy_file_to_clipboard;
use codegatherer::config::{Args, Command, Config};
use codegatherer::progress::BarProgress;
use codegatherer::report::{GatherReport, Reporter};
use codegatherer::{Aggregator, Result, StructureRenderer};

fn main() {
    let args = Args::parse();
    setup_logging(args.quiet, args.verbose);
    log::debug!("CLI args parsed: {:?}", args);

    let exit_code = match run(args) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> Result<()> {
    if let Command::Completions { shell } = &args.command {
        clap_complete::generate(*shell, &mut Args::command(), "codegatherer", &mut io::stdout());
        return Ok(());
    }

    let config = Config::from_args(&args)?;
    config.validate()?;

    match args.command {
        Command::Gather { paths, .. } => gather(config, &paths),
        Command::Structure { root } => {
            let root = root.unwrap_or_else(|| config.workspace_root.clone());
            let renderer = StructureRenderer::new(config);
            let path = renderer.generate(&root)?;
            println!("Project structure written to {}", path.display());
            Ok(())
        }
        Command::Completions { .. } => Ok(()),
    }
}

fn gather(config: Config, paths: &[PathBuf]) -> Result<()> {
    let progress = ProgressBar::new(paths.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} ({percent}%) ⏱️  {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📂 Gathering");

    let clip = config.clip;
    let report_format = config.report_format;
    let aggregator = Aggregator::new(config);
    let sink = BarProgress::new(progress.clone());

    let start_time = Instant::now();
    let outcome = aggregator.gather(paths, &sink);
    progress.finish_and_clear();
    let outcome = outcome?;

    if clip {
        if let Some(first) = outcome.first_document() {
            match copy_file_to_clipboard(&first.path) {
                Ok(()) => println!("📋 Copied {} to clipboard", first.path.display()),
                Err(e) => log::warn!("Failed to copy to clipboard: {}", e),
            }
        }
    }

    let report = GatherReport::new(outcome, start_time.elapsed());
    Reporter::new(report_format).print_report(&report)?;

    Ok(())
}
