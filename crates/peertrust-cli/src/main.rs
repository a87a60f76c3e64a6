//! peertrust - verify TLS peer certificate chains from the command line.
//!
//! Exit status: 0 accepted, 1 rejected, 2 usage or I/O error.

use colored::Colorize;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match peertrust_cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(peertrust_cli::EXIT_ERROR)
        }
    }
}
