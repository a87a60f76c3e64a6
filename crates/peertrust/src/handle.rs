//! Collaborator seams around the verifier: where the presented chain comes
//! from, and who receives the decision.
//!
//! The verifier never talks to the live connection object. It takes a
//! [`PeerChain`] snapshot and reports back through [`CertificateHandle`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chain::RawCertificate;
use crate::error::VerifyError;
use crate::reject::Rejection;

/// The chain a peer presented: one type tag for every blob, leaf first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerChain {
    pub cert_type: String,
    pub chain_data: Vec<Vec<u8>>,
}

impl PeerChain {
    pub fn new(cert_type: impl Into<String>, chain_data: Vec<Vec<u8>>) -> Self {
        Self {
            cert_type: cert_type.into(),
            chain_data,
        }
    }

    /// Per-blob view, each blob carrying the chain's type tag.
    #[must_use]
    pub fn raw_certificates(&self) -> Vec<RawCertificate> {
        self.chain_data
            .iter()
            .map(|data| RawCertificate::new(data.clone(), self.cert_type.clone()))
            .collect()
    }
}

/// Supplies the peer's chain. Fetching may cross a process boundary.
#[async_trait]
pub trait PeerChainSource: Send + Sync {
    async fn fetch_chain(&self) -> Result<PeerChain, VerifyError>;
}

/// An already-fetched chain is its own source.
#[async_trait]
impl PeerChainSource for PeerChain {
    async fn fetch_chain(&self) -> Result<PeerChain, VerifyError> {
        Ok(self.clone())
    }
}

/// Capability held by whoever owns the peer's network identity.
#[async_trait]
pub trait CertificateHandle: Send + Sync {
    /// The peer is trusted.
    async fn accept(&self) -> Result<(), VerifyError>;

    /// The peer is not trusted, for these reasons.
    async fn reject(&self, rejections: &[Rejection]) -> Result<(), VerifyError>;
}
