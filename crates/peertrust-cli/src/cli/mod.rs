//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::{Context as _, Result};
use args::{Cli, Commands};
use clap::Parser;
use peertrust::Config;
use std::process::ExitCode;

use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let output_format = cli.output.unwrap_or(OutputFormat::Pretty);
    init_logging(output_format, cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = match &cli.config {
        Some(path) => {
            anyhow::ensure!(path.exists(), "config file {} not found", path.display());
            Config::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    let ctx = commands::Context {
        config,
        output_format,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Verify(args) => commands::verify::execute(ctx, args).await,
        Commands::Fingerprint(args) => commands::fingerprint::execute(ctx, args).await,
    }
}

/// Logs go to stderr; JSON mode keeps them to errors only.
fn init_logging(format: OutputFormat, verbose: bool) {
    let level = if format == OutputFormat::Json {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // Already set when embedded in a host that installed its own subscriber.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
