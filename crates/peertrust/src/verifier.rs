//! Verification orchestrator.
//!
//! Every request walks the same stages and stops at the first failure:
//!
//! ```text
//! Built ──► AnchorSearch ──► Anchored ──► IdentityCheck ──► Accepted
//!   │            │              │               │
//!   ▼            ▼              ▼               ▼
//! Malformed   SelfSigned   Expired /      HostnameMismatch
//!                          NotActivated
//! ```
//!
//! A leaf whose extended key usage excludes the configured purpose is
//! untrusted for it and also ends as `SelfSigned`, with the purpose in the
//! details.
//!
//! Identity is never checked before trust, so an untrusted chain with the
//! wrong name is reported as `SelfSigned`. The only suspension points are
//! trust-store lookups; dropping the future abandons the request with
//! nothing to clean up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::certificate::{Certificate, Validity};
use crate::chain::{build_chain, RawCertificate};
use crate::config::{Config, VerifierConfig};
use crate::error::{Result, StoreError};
use crate::handle::{CertificateHandle, PeerChain, PeerChainSource};
use crate::identity::{self, ReferenceIdentities};
use crate::reject::{map_failure, Failure, RejectReason, Rejection};
use crate::resolver::{Resolution, TrustAnchorResolver};
use crate::store::{MemoryTrustStore, TrustStore};

/// Immutable input to one verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub chain: Vec<RawCertificate>,
    /// Connection hostname. Only used to scope pin lookups.
    pub hostname: String,
    /// Names the leaf must match.
    pub references: ReferenceIdentities,
}

impl VerificationRequest {
    pub fn new(
        chain: Vec<RawCertificate>,
        hostname: impl Into<String>,
        references: ReferenceIdentities,
    ) -> Self {
        Self {
            chain,
            hostname: hostname.into(),
            references,
        }
    }

    pub fn from_peer(
        peer: &PeerChain,
        hostname: impl Into<String>,
        references: ReferenceIdentities,
    ) -> Self {
        Self::new(peer.raw_certificates(), hostname, references)
    }
}

/// Terminal outcome of a verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum VerificationResult {
    Accepted,
    Rejected(Rejection),
}

impl VerificationResult {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<RejectReason> {
        self.rejection().map(|r| r.reason)
    }
}

/// Decides whether a peer's chain is trusted for a set of reference
/// identities.
///
/// Cheap to clone; clones share the trust store. Concurrent verifications
/// share nothing else.
#[derive(Clone)]
pub struct Verifier {
    store: Arc<dyn TrustStore>,
    config: VerifierConfig,
}

impl Verifier {
    /// Verifier with default settings (server-auth, validity checks on).
    pub fn new(store: Arc<dyn TrustStore>) -> Self {
        Self::with_config(store, VerifierConfig::default())
    }

    pub fn with_config(store: Arc<dyn TrustStore>, config: VerifierConfig) -> Self {
        Self { store, config }
    }

    /// Build the trust store described by `config` and wrap it.
    pub async fn from_config(config: &Config) -> std::result::Result<Self, StoreError> {
        let store = MemoryTrustStore::from_config(&config.trust, config.verifier.purpose).await?;
        Ok(Self::with_config(Arc::new(store), config.verifier.clone()))
    }

    #[must_use]
    pub const fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify one request. Exactly one terminal result per call.
    ///
    /// Errors are reserved for trust-store failures; an untrusted peer is an
    /// `Ok(VerificationResult::Rejected(..))`.
    pub async fn verify(&self, request: &VerificationRequest) -> Result<VerificationResult> {
        let result = match self.decide(request).await? {
            None => VerificationResult::Accepted,
            Some(failure) => VerificationResult::Rejected(map_failure(failure)),
        };

        match &result {
            VerificationResult::Accepted => info!(
                hostname = %request.hostname,
                chain_len = request.chain.len(),
                "peer certificate accepted"
            ),
            VerificationResult::Rejected(rejection) => info!(
                hostname = %request.hostname,
                chain_len = request.chain.len(),
                reason = %rejection.reason,
                index = rejection.certificate_index,
                "peer certificate rejected"
            ),
        }
        Ok(result)
    }

    /// Verify raw chain bytes that all share one type tag.
    ///
    /// An empty `reference_identities` is a caller error, not a rejection.
    pub async fn verify_async<B, S>(
        &self,
        chain_bytes: &[B],
        cert_type: &str,
        hostname: &str,
        reference_identities: &[S],
    ) -> Result<VerificationResult>
    where
        B: AsRef<[u8]> + Sync,
        S: AsRef<str> + Sync,
    {
        let references =
            ReferenceIdentities::new(reference_identities.iter().map(|s| s.as_ref().to_string()))?;
        let chain = chain_bytes
            .iter()
            .map(|b| RawCertificate::new(b.as_ref(), cert_type))
            .collect();
        self.verify(&VerificationRequest::new(chain, hostname, references))
            .await
    }

    /// Fetch the chain from `source`, verify it, and settle `handle` with
    /// exactly one `accept` or `reject` call.
    pub async fn verify_and_settle(
        &self,
        source: &dyn PeerChainSource,
        handle: &dyn CertificateHandle,
        hostname: &str,
        references: &ReferenceIdentities,
    ) -> Result<VerificationResult> {
        let peer = source.fetch_chain().await?;
        let request = VerificationRequest::from_peer(&peer, hostname, references.clone());
        let result = self.verify(&request).await?;
        match &result {
            VerificationResult::Accepted => handle.accept().await?,
            VerificationResult::Rejected(rejection) => {
                handle.reject(std::slice::from_ref(rejection)).await?;
            }
        }
        Ok(result)
    }

    /// Run the stages. `None` means accepted.
    async fn decide(
        &self,
        request: &VerificationRequest,
    ) -> std::result::Result<Option<Failure>, StoreError> {
        // Built
        let chain = match build_chain(&request.chain) {
            Ok(chain) => chain,
            Err(error) => {
                let cert_type = request
                    .chain
                    .get(error.index())
                    .map(|b| b.cert_type.clone())
                    .unwrap_or_default();
                return Ok(Some(Failure::Malformed { error, cert_type }));
            }
        };
        debug!(chain_len = chain.len(), "chain built");

        // AnchorSearch
        let resolver = TrustAnchorResolver::new(self.store.as_ref(), self.config.purpose);
        let anchor = match resolver.resolve(&chain, &request.hostname).await? {
            Resolution::Trusted(anchor) => anchor,
            Resolution::NotFound { index } => {
                return Ok(Some(Failure::NotAnchored {
                    index,
                    hostname: request.hostname.clone(),
                }));
            }
        };

        // Anchored
        if self.config.check_validity {
            if let Some(failure) = check_validity(&anchor.path, Utc::now()) {
                return Ok(Some(failure));
            }
        }

        let leaf = chain.leaf();
        if !leaf.allows_usage(self.config.purpose.oid()) {
            debug!(purpose = %self.config.purpose, "leaf not valid for purpose");
            return Ok(Some(Failure::WrongPurpose {
                purpose: self.config.purpose,
                extended_key_usage: leaf.extended_key_usage().unwrap_or_default().to_vec(),
            }));
        }

        // IdentityCheck
        if identity::matches(leaf, &request.references) {
            Ok(None)
        } else {
            Ok(Some(Failure::IdentityMismatch {
                certificate_identities: identity::certificate_identities(leaf),
                reference_identities: request.references.as_slice().to_vec(),
            }))
        }
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// First certificate on the trusted path, leaf first, outside its window.
fn check_validity(path: &[Certificate], now: DateTime<Utc>) -> Option<Failure> {
    path.iter()
        .enumerate()
        .find_map(|(index, cert)| match cert.validity_at(now) {
            Validity::Valid => None,
            Validity::NotYetValid => Some(Failure::NotActivated {
                index,
                not_before: cert.not_before(),
            }),
            Validity::Expired => Some(Failure::Expired {
                index,
                not_after: cert.not_after(),
            }),
        })
}
