//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Verify TLS peer certificate chains against trust anchors and pins.
///
/// Trust comes from anchored roots (any peer) or pinned certificates (one
/// hostname). Names are checked against reference identities, which default
/// to the hostname.
#[derive(Parser, Debug)]
#[command(name = "peertrust")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Config file (TOML)
    #[arg(short, long, global = true, env = "PEERTRUST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify a presented certificate chain
    Verify(VerifyArgs),

    /// Print SHA-256 fingerprints of certificates
    Fingerprint(FingerprintArgs),
}

// ============================================================================
// Verify command
// ============================================================================

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Hostname of the connection; scopes pin lookups
    #[arg(long = "hostname", short = 'H')]
    pub hostname: String,

    /// Reference identity the leaf must match (repeatable; defaults to the hostname)
    #[arg(long = "reference", short = 'r')]
    pub references: Vec<String>,

    /// Extra anchor file or directory (repeatable)
    #[arg(long = "anchor", short = 'a')]
    pub anchors: Vec<PathBuf>,

    /// Pin a certificate file to a hostname, as HOST=FILE (repeatable)
    #[arg(long = "pin", value_parser = parse_pin)]
    pub pins: Vec<(String, PathBuf)>,

    /// Also trust the operating system's CA bundles
    #[arg(long)]
    pub system_anchors: bool,

    /// Skip notBefore / notAfter checks
    #[arg(long)]
    pub no_validity_check: bool,

    /// Certificate type tag declared for every chain element
    #[arg(long, default_value = "x509")]
    pub cert_type: String,

    /// Chain files, leaf first. A PEM file may hold several certificates.
    #[arg(required = true)]
    pub chain: Vec<PathBuf>,
}

// ============================================================================
// Fingerprint command
// ============================================================================

#[derive(Args, Debug)]
pub struct FingerprintArgs {
    /// Certificate files or directories
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

fn parse_pin(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((host, file)) if !host.is_empty() && !file.is_empty() => {
            Ok((host.to_string(), PathBuf::from(file)))
        }
        _ => Err(format!("expected HOST=FILE, got {s:?}")),
    }
}
