//! Main entry point for the zwf CLI application.
//!
//! This binary lists and extracts the contents of Zwift WAD files.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use zwf::cli::{Command, ExtractArgs, ListArgs};
use zwf::{
    Cli, EntryHeader, EntryPredicate, ExtractOptions, GlobPattern, ListOptions, LocalFileReader,
    WadExtractor, select_all,
};

/// Application entry point.
///
/// Parses command-line arguments, runs the selected command and reports
/// failures as `Fatal: <message>` with a non-zero exit status.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.is_verbose());

    let result = match &cli.command {
        Command::List(args) => list(args).await,
        Command::Extract(args) => extract(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Fatal: {err:#}");
            if cli.traceback {
                eprintln!("\nTraceback follows:\n");
                eprintln!("{err:?}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over the default level, which is `info` with
/// `--verbose` and `warn` otherwise.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

async fn open(path: &Path) -> Result<WadExtractor<LocalFileReader>> {
    let reader = LocalFileReader::new(path)
        .with_context(|| format!("Cannot open `{}`", path.display()))?;
    let wad = WadExtractor::open(Arc::new(reader)).await?;
    Ok(wad)
}

/// Print one line per entry.
async fn list(args: &ListArgs) -> Result<()> {
    let wad = open(&args.file).await?;

    let lines = wad
        .list(ListOptions {
            long: args.long,
            human_readable: args.human_readable,
        })
        .await?;
    for line in lines {
        println!("{line}");
    }

    Ok(())
}

/// Extract every entry, or those matching the glob, into `args.dir`.
async fn extract(args: &ExtractArgs) -> Result<()> {
    let wad = open(&args.file).await?;

    if args.verbose {
        println!("  Zwift WAD:  {}", args.file.display());
        println!("Destination:  {}", args.dir.display());
    }

    let predicate: Box<EntryPredicate<'_>> = match &args.glob {
        Some(glob) => {
            let pattern = GlobPattern::new(glob);
            Box::new(move |header: &EntryHeader| pattern.matches_entry(header))
        }
        None => Box::new(select_all),
    };

    let stats = wad
        .extract(
            &args.dir,
            predicate.as_ref(),
            ExtractOptions {
                verbose: args.verbose,
            },
        )
        .await?;

    if args.verbose {
        println!(
            "Extracted {} files ({}), skipped {}",
            stats.files_extracted,
            humansize::format_size(stats.bytes_written, humansize::BINARY),
            stats.entries_skipped
        );
    }

    Ok(())
}
