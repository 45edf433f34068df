//! CLI entry point for the album downloader.

use std::process::ExitCode;

use album_dl_core::{AlbumPipeline, ScrapeConfig};
use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};

mod cli;

use cli::{Args, USAGE};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let Some(page_url) = args.url else {
        println!("{USAGE}");
        return Ok(ExitCode::from(1));
    };

    // Halts and critical errors are reported, not signalled through the exit code.
    let pipeline = match AlbumPipeline::new(ScrapeConfig::default()) {
        Ok(pipeline) => pipeline.with_progress(!args.quiet),
        Err(err) => {
            error!(kind = err.kind().label(), error = %err, "pipeline setup failed");
            println!("{err}");
            return Ok(ExitCode::SUCCESS);
        }
    };

    match pipeline.run(&page_url).await {
        Ok(summary) => println!("\n{summary}"),
        Err(err) => {
            debug!(kind = err.kind().label(), error = ?err, "run halted");
            println!("{err}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
