//! `peertrust verify` - Verify a presented certificate chain.

use anyhow::{Context as _, Result};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

use super::Context;
use crate::cli::args::VerifyArgs;
use crate::output::{render_result, OutputFormat};
use crate::{EXIT_ACCEPTED, EXIT_REJECTED};
use peertrust::{PinConfig, Verifier};

pub async fn execute(ctx: Context, args: VerifyArgs) -> Result<ExitCode> {
    let mut config = ctx.config;
    config.trust.anchor_files.extend(args.anchors);
    config.trust.system_anchors |= args.system_anchors;
    config.trust.pins.extend(args.pins.into_iter().map(|(peer, file)| PinConfig {
        peer,
        certificate: Some(file),
        sha256: None,
    }));
    if args.no_validity_check {
        config.verifier.check_validity = false;
    }

    let verifier = Verifier::from_config(&config)
        .await
        .context("building trust store")?;

    let mut blobs = Vec::new();
    for path in &args.chain {
        blobs.extend(read_chain_file(path).await?);
    }
    debug!(blobs = blobs.len(), "read presented chain");

    let references = if args.references.is_empty() {
        vec![args.hostname.clone()]
    } else {
        args.references
    };

    let result = verifier
        .verify_async(
            blobs.as_slice(),
            &args.cert_type,
            &args.hostname,
            references.as_slice(),
        )
        .await?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Pretty => {
            println!("{}", render_result(&result, &args.hostname, blobs.len()));
        }
    }

    Ok(ExitCode::from(if result.is_accepted() {
        EXIT_ACCEPTED
    } else {
        EXIT_REJECTED
    }))
}

/// One blob per PEM block, or the whole file when it is not PEM.
///
/// Blocks are re-armoured rather than decoded so a non-certificate block is
/// reported as malformed instead of silently dropped.
async fn read_chain_file(path: &Path) -> Result<Vec<Vec<u8>>> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    if !content.windows(10).any(|w| w == b"-----BEGIN") {
        return Ok(vec![content]);
    }
    match pem::parse_many(&content) {
        Ok(blocks) if !blocks.is_empty() => Ok(blocks
            .iter()
            .map(|block| pem::encode(block).into_bytes())
            .collect()),
        _ => Ok(vec![content]),
    }
}
