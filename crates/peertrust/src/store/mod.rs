//! Trust store contract and implementations.
//!
//! A trust store records two kinds of assertion, both keyed by the SHA-256
//! digest of a certificate's DER encoding:
//!
//! - **Anchor**: the certificate is a trusted root for any peer.
//! - **Pinned**: the certificate is trusted, but only for one peer name.
//!
//! Stores also hand out issuer certificates so a chain the peer presented
//! without its root can still reach an anchor.
//!
//! The verifier only reads from a store. Loading and mutation happen before
//! the store is shared, or are synchronized by whoever owns it.

pub mod memory;
pub mod system;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::certificate::{eku, Certificate};
use crate::error::StoreError;
use crate::hash::CertDigest;

pub use memory::MemoryTrustStore;
pub use system::{discover_system_anchors, load_certificates, CA_STORE_PATHS};

/// Usage an assertion is recorded for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Purpose {
    /// TLS server authentication.
    #[default]
    ServerAuth,
    /// TLS client authentication.
    ClientAuth,
}

impl Purpose {
    /// Extended key usage OID for this purpose.
    #[must_use]
    pub const fn oid(self) -> &'static str {
        match self {
            Self::ServerAuth => eku::SERVER_AUTH,
            Self::ClientAuth => eku::CLIENT_AUTH,
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerAuth => write!(f, "server-auth"),
            Self::ClientAuth => write!(f, "client-auth"),
        }
    }
}

/// A fact recorded in a trust store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TrustAssertion {
    /// Trusted as a root CA for any peer.
    Anchor { digest: CertDigest, purpose: Purpose },
    /// Trusted only when the verification hostname equals `peer`.
    Pinned {
        digest: CertDigest,
        purpose: Purpose,
        peer: String,
    },
}

impl TrustAssertion {
    #[must_use]
    pub const fn digest(&self) -> &CertDigest {
        match self {
            Self::Anchor { digest, .. } | Self::Pinned { digest, .. } => digest,
        }
    }
}

/// Read-only lookups the verifier performs against a trust store.
///
/// Implementations must be safe to query concurrently without any lock held
/// by the caller. Lookups may block on I/O (hardware modules, remote
/// services), hence `async`.
#[async_trait]
pub trait TrustStore: Send + Sync {
    /// Is there an `Anchor` assertion for `digest` and `purpose`?
    async fn lookup_anchor(&self, digest: &CertDigest, purpose: Purpose)
        -> Result<bool, StoreError>;

    /// Is there a `Pinned` assertion for `digest` and `purpose` whose peer is
    /// exactly `peer`? Comparison is byte-for-byte.
    async fn lookup_pin(
        &self,
        digest: &CertDigest,
        purpose: Purpose,
        peer: &str,
    ) -> Result<bool, StoreError>;

    /// A stored CA certificate that issued `cert`, if any. When several
    /// qualify, one anchored for `purpose` is preferred.
    ///
    /// The default has no certificates to offer.
    async fn lookup_issuer(
        &self,
        _cert: &Certificate,
        _purpose: Purpose,
    ) -> Result<Option<Certificate>, StoreError> {
        Ok(None)
    }
}
