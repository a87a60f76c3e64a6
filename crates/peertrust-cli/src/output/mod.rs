//! Output formatting for verification results and fingerprints.

use clap::ValueEnum;
use colored::Colorize;
use peertrust::{Rejection, VerificationResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable, colored
    #[default]
    Pretty,
    /// JSON output
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render a verification result for a terminal.
pub fn render_result(result: &VerificationResult, hostname: &str, chain_len: usize) -> String {
    match result {
        VerificationResult::Accepted => format!(
            "{} {} (chain of {chain_len})",
            "✓ accepted".green().bold(),
            hostname.cyan()
        ),
        VerificationResult::Rejected(rejection) => render_rejection(rejection, hostname),
    }
}

fn render_rejection(rejection: &Rejection, hostname: &str) -> String {
    let mut out = format!(
        "{} {}: {} (certificate {})\n  {}",
        "✗ rejected".red().bold(),
        hostname.cyan(),
        rejection.reason.to_string().yellow(),
        rejection.certificate_index,
        rejection.message
    );
    for (key, value) in &rejection.details {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out.push_str(&format!("\n  {}: {value}", key.dimmed()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use peertrust::RejectReason;

    #[test]
    fn format_names() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::Pretty.to_string(), "pretty");
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn rejection_lists_details() {
        colored::control::set_override(false);
        let mut details = peertrust::RejectDetails::new();
        details.insert("hostname".into(), serde_json::json!("a.example"));
        let result = VerificationResult::Rejected(Rejection {
            reason: RejectReason::SelfSigned,
            certificate_index: 1,
            message: "no trusted anchor".into(),
            details,
        });
        let text = render_result(&result, "a.example", 2);
        assert!(text.contains("rejected a.example: self-signed (certificate 1)"));
        assert!(text.contains("hostname: a.example"));
    }
}
