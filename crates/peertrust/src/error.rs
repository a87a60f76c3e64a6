//! Error types for peertrust.
//!
//! Untrustworthy peers are never reported through these types: they end in
//! a [`Rejection`](crate::Rejection). Errors here mean the input could not be
//! parsed, the caller misused the API, or a collaborator failed.

use thiserror::Error;

/// Result type for verification operations.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// A single certificate blob could not be turned into a [`Certificate`](crate::Certificate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CertificateError {
    /// The declared certificate type is not one we can parse.
    #[error("unsupported certificate type {0:?}")]
    UnsupportedType(String),

    /// PEM armour was present but could not be decoded.
    #[error("invalid PEM armour: {0}")]
    Pem(String),

    /// PEM block label was not `CERTIFICATE`.
    #[error("PEM block is {0:?}, expected CERTIFICATE")]
    UnexpectedPemTag(String),

    /// DER structure did not parse as X.509.
    #[error("invalid X.509 certificate: {0}")]
    Der(String),

    /// Bytes left over after the certificate.
    #[error("{0} trailing bytes after certificate")]
    TrailingData(usize),
}

/// Chain assembly failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The peer presented no certificates at all.
    #[error("certificate chain is empty")]
    Empty,

    /// One element of the chain is unusable.
    #[error("certificate {index}: {source}")]
    Certificate {
        /// Position in the presented chain (0 = leaf).
        index: usize,
        #[source]
        source: CertificateError,
    },
}

impl ChainError {
    /// Index of the certificate responsible for the failure.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Certificate { index, .. } => *index,
        }
    }
}

/// Errors that can occur while loading or querying a trust store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// File could not be read.
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// PEM bundle could not be decoded.
    #[error("PEM decode error in {path}: {reason}")]
    PemDecode { path: String, reason: String },

    /// Certificate inside a trust file did not parse.
    #[error("certificate parse error in {path}: {reason}")]
    CertParse { path: String, reason: String },

    /// A digest string was not 32 bytes of hex.
    #[error("invalid sha256 digest {0:?}")]
    InvalidDigest(String),

    /// A pin names neither a certificate file nor a digest.
    #[error("pin for {peer:?} needs either `certificate` or `sha256`")]
    IncompletePin { peer: String },

    /// Backend-specific lookup failure (hardware module, remote service).
    #[error("trust store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Shorthand for wrapping an I/O error with the path it happened on.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML did not match the expected layout.
    #[error("invalid config {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Caller errors and collaborator failures surfaced by the verifier.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Reference identities must contain at least one entry.
    #[error("reference identity set is empty")]
    EmptyReferenceIdentities,

    /// A reference identity entry was blank.
    #[error("reference identity at position {0} is empty")]
    EmptyReferenceIdentity(usize),

    /// The trust store failed to answer a lookup.
    #[error("trust store lookup failed: {0}")]
    TrustStore(#[from] StoreError),

    /// The peer chain could not be fetched.
    #[error("peer chain source failed: {0}")]
    ChainSource(String),

    /// Delivering the decision to the certificate handle failed.
    #[error("certificate handle failed: {0}")]
    Handle(String),
}
