//! `peertrust fingerprint` - Print certificate digests for pins and anchors.

use anyhow::{Context as _, Result};
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use super::Context;
use crate::cli::args::FingerprintArgs;
use crate::output::OutputFormat;
use crate::EXIT_ACCEPTED;

#[derive(Debug, Serialize)]
struct Fingerprint {
    file: String,
    sha256: String,
    subject: String,
    not_after: String,
}

pub async fn execute(ctx: Context, args: FingerprintArgs) -> Result<ExitCode> {
    let mut rows = Vec::new();
    for path in &args.files {
        let certs = peertrust::store::load_certificates(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?;
        for cert in certs {
            rows.push(Fingerprint {
                file: path.display().to_string(),
                sha256: cert.digest().to_hex(),
                subject: cert.subject().to_string(),
                not_after: cert.not_after().to_rfc3339(),
            });
        }
    }

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Pretty => {
            for row in &rows {
                println!("{}  {}", row.sha256.green(), row.subject);
                if ctx.verbose {
                    println!("    {} {}", "file:".dimmed(), row.file);
                    println!("    {} {}", "expires:".dimmed(), row.not_after);
                }
            }
        }
    }

    Ok(ExitCode::from(EXIT_ACCEPTED))
}
