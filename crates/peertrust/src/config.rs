//! Verifier and trust-store configuration.
//!
//! ```toml
//! [verifier]
//! purpose = "server-auth"
//! check_validity = true
//!
//! [trust]
//! system_anchors = false
//! anchor_files = ["ca.pem"]
//!
//! [[trust.pins]]
//! peer = "test-server.empathy.gnome.org"
//! certificate = "server-cert.pem"
//! ```
//!
//! Relative paths are resolved against the directory holding the config
//! file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::hash::CertDigest;
use crate::store::Purpose;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub verifier: VerifierConfig,

    #[serde(default)]
    pub trust: TrustConfig,
}

/// How the verifier runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Purpose every trust-store lookup is scoped to.
    #[serde(default)]
    pub purpose: Purpose,

    /// Reject expired or not-yet-valid certificates on the trusted path.
    #[serde(default = "default_true")]
    pub check_validity: bool,
}

/// Where trust assertions come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Load the OS CA bundles as anchors.
    #[serde(default)]
    pub system_anchors: bool,

    /// PEM/DER files or directories whose certificates become anchors.
    #[serde(default)]
    pub anchor_files: Vec<PathBuf>,

    /// Anchors known only by digest (cannot complete a chain).
    #[serde(default)]
    pub anchor_digests: Vec<CertDigest>,

    /// Per-peer pinned certificates.
    #[serde(default)]
    pub pins: Vec<PinConfig>,
}

/// One pinned certificate, by file or by digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    /// Hostname the pin is valid for, compared exactly.
    pub peer: String,

    /// Certificate file (PEM or DER); every certificate in it is pinned.
    #[serde(default)]
    pub certificate: Option<PathBuf>,

    /// SHA-256 of the certificate's DER encoding.
    #[serde(default)]
    pub sha256: Option<CertDigest>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            purpose: Purpose::default(),
            check_validity: default_true(),
        }
    }
}

impl Config {
    /// Load config from a TOML file, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let path_str = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path_str,
            reason: e.to_string(),
        })?;
        if let Some(base) = path.parent() {
            config.trust.resolve_paths(base);
        }
        Ok(config)
    }
}

impl TrustConfig {
    /// Make every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for file in &mut self.anchor_files {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
        for pin in &mut self.pins {
            if let Some(file) = pin.certificate.as_mut() {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
    }
}

const fn default_true() -> bool {
    true
}
