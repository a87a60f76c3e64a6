//! In-process trust store.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::{system, Purpose, TrustAssertion, TrustStore};
use crate::certificate::Certificate;
use crate::config::TrustConfig;
use crate::error::StoreError;
use crate::hash::CertDigest;

/// Trust store held entirely in memory.
///
/// Populate it with the `add_*` methods, then share it behind an `Arc`.
/// Lookups take `&self` and need no locking.
#[derive(Debug, Clone, Default)]
pub struct MemoryTrustStore {
    assertions: HashSet<TrustAssertion>,
    /// Stored certificates keyed by raw subject name, for issuer lookups.
    by_subject: HashMap<Vec<u8>, Vec<Certificate>>,
}

impl MemoryTrustStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the `[trust]` section of the config.
    ///
    /// Anchor and pin files must load; the system bundles are best-effort.
    pub async fn from_config(config: &TrustConfig, purpose: Purpose) -> Result<Self, StoreError> {
        let mut store = Self::new();

        if config.system_anchors {
            for cert in system::discover_system_anchors().await {
                store.add_anchor(cert, purpose);
            }
        }

        for path in &config.anchor_files {
            let certs = system::load_certificates(path).await?;
            debug!(path = %path.display(), count = certs.len(), "loaded anchor file");
            for cert in certs {
                store.add_anchor(cert, purpose);
            }
        }

        for digest in &config.anchor_digests {
            store.add_assertion(TrustAssertion::Anchor {
                digest: *digest,
                purpose,
            });
        }

        for pin in &config.pins {
            match (&pin.certificate, &pin.sha256) {
                (Some(path), _) => {
                    for cert in system::load_certificates(path).await? {
                        store.add_pin(cert.digest(), purpose, &pin.peer);
                    }
                }
                (None, Some(digest)) => store.add_pin(digest, purpose, &pin.peer),
                (None, None) => {
                    return Err(StoreError::IncompletePin {
                        peer: pin.peer.clone(),
                    })
                }
            }
        }

        info!(
            assertions = store.assertions.len(),
            certificates = store.certificate_count(),
            "trust store loaded"
        );
        Ok(store)
    }

    /// Record `cert` as a root for any peer. The certificate is also kept for
    /// issuer lookups.
    pub fn add_anchor(&mut self, cert: Certificate, purpose: Purpose) {
        self.add_assertion(TrustAssertion::Anchor {
            digest: *cert.digest(),
            purpose,
        });
        self.add_certificate(cert);
    }

    /// Pin a certificate digest to one exact peer name.
    pub fn add_pin(&mut self, digest: &CertDigest, purpose: Purpose, peer: &str) {
        self.add_assertion(TrustAssertion::Pinned {
            digest: *digest,
            purpose,
            peer: peer.to_string(),
        });
    }

    pub fn add_assertion(&mut self, assertion: TrustAssertion) {
        self.assertions.insert(assertion);
    }

    /// Keep a certificate available for issuer lookups without trusting it.
    pub fn add_certificate(&mut self, cert: Certificate) {
        let bucket = self.by_subject.entry(cert.subject_raw().to_vec()).or_default();
        if !bucket.iter().any(|c| c.digest() == cert.digest()) {
            bucket.push(cert);
        }
    }

    pub fn assertions(&self) -> impl Iterator<Item = &TrustAssertion> {
        self.assertions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    fn is_anchor(&self, digest: &CertDigest, purpose: Purpose) -> bool {
        self.assertions.contains(&TrustAssertion::Anchor {
            digest: *digest,
            purpose,
        })
    }

    fn certificate_count(&self) -> usize {
        self.by_subject.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl TrustStore for MemoryTrustStore {
    async fn lookup_anchor(&self, digest: &CertDigest, purpose: Purpose) -> Result<bool, StoreError> {
        Ok(self.is_anchor(digest, purpose))
    }

    async fn lookup_pin(
        &self,
        digest: &CertDigest,
        purpose: Purpose,
        peer: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.assertions.contains(&TrustAssertion::Pinned {
            digest: *digest,
            purpose,
            peer: peer.to_string(),
        }))
    }

    async fn lookup_issuer(
        &self,
        cert: &Certificate,
        purpose: Purpose,
    ) -> Result<Option<Certificate>, StoreError> {
        let Some(candidates) = self.by_subject.get(cert.issuer_raw()) else {
            return Ok(None);
        };
        let issuers: Vec<&Certificate> = candidates
            .iter()
            .filter(|c| c.can_sign_certificates() && cert.is_issued_by(c))
            .collect();
        // Cross-signed roots share subject and key; take the anchored one.
        let chosen = issuers
            .iter()
            .find(|c| self.is_anchor(c.digest(), purpose))
            .or_else(|| issuers.first());
        Ok(chosen.map(|c| (*c).clone()))
    }
}
