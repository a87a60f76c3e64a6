//! Trust anchor resolution: pins first, then anchored roots.
//!
//! ```text
//! presented chain
//!        │
//!        ▼
//!   verified prefix (each cert signed by the next, issuers must be CAs)
//!        │
//!        ├──► pin lookup (prefix only, exact hostname) ──► Pinned
//!        ▼
//!   completion from store (lookup_issuer until self-signed)
//!        │
//!        ▼
//!   anchor lookup, root end first ──► Anchored | NotFound
//! ```

use tracing::debug;

use crate::certificate::Certificate;
use crate::chain::CertificateChain;
use crate::error::StoreError;
use crate::store::{Purpose, TrustStore};

/// Upper bound on the completed path length.
pub const MAX_CHAIN_DEPTH: usize = 10;

/// How trust was established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorKind {
    /// The certificate at `index` is pinned for the connection hostname.
    Pinned,
    /// The certificate at `index` is an anchored root.
    Anchored,
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    pub kind: AnchorKind,
    /// Position of the trusted certificate in `path`.
    pub index: usize,
    /// The leaf through the trusted certificate, inclusive.
    pub path: Vec<Certificate>,
}

/// Outcome of [`TrustAnchorResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Trusted(TrustAnchor),
    /// Nothing in the chain or the store vouches for it. `index` is the
    /// topmost presented certificate that still chains to the leaf.
    NotFound { index: usize },
}

/// Finds the trust anchor for a chain in a [`TrustStore`].
pub struct TrustAnchorResolver<'a> {
    store: &'a dyn TrustStore,
    purpose: Purpose,
}

impl<'a> TrustAnchorResolver<'a> {
    pub fn new(store: &'a dyn TrustStore, purpose: Purpose) -> Self {
        Self { store, purpose }
    }

    /// Resolve trust for `chain` when connecting to `hostname`.
    ///
    /// First match wins: a pin for exactly `hostname` on a certificate of
    /// the verified prefix, then the anchor nearest the root end of the
    /// completed chain.
    pub async fn resolve(
        &self,
        chain: &CertificateChain,
        hostname: &str,
    ) -> Result<Resolution, StoreError> {
        let (path, presented) = self.complete(chain).await?;

        if let Some(index) = self.find_pin(&path[..presented], hostname).await? {
            debug!(index, hostname, "chain trusted by pin");
            return Ok(Resolution::Trusted(TrustAnchor {
                kind: AnchorKind::Pinned,
                index,
                path: path[..=index].to_vec(),
            }));
        }

        for (index, cert) in path.iter().enumerate().rev() {
            if self.store.lookup_anchor(cert.digest(), self.purpose).await? {
                debug!(index, subject = cert.subject(), "chain trusted by anchor");
                return Ok(Resolution::Trusted(TrustAnchor {
                    kind: AnchorKind::Anchored,
                    index,
                    path: path[..=index].to_vec(),
                }));
            }
        }

        debug!(path_len = path.len(), "no anchor found");
        Ok(Resolution::NotFound {
            index: presented - 1,
        })
    }

    async fn find_pin(
        &self,
        prefix: &[Certificate],
        hostname: &str,
    ) -> Result<Option<usize>, StoreError> {
        for (index, cert) in prefix.iter().enumerate() {
            if self
                .store
                .lookup_pin(cert.digest(), self.purpose, hostname)
                .await?
            {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Keep the prefix of the presented chain that actually chains, then
    /// extend it with issuers from the store. Every issuer must be allowed
    /// to sign certificates at its depth.
    ///
    /// Returns the path and how many of its certificates were presented.
    async fn complete(
        &self,
        chain: &CertificateChain,
    ) -> Result<(Vec<Certificate>, usize), StoreError> {
        let mut path = vec![chain.leaf().clone()];
        for cert in chain.iter().skip(1) {
            let Some(last) = path.last() else { break };
            if !last.is_issued_by(cert) {
                debug!(
                    subject = cert.subject(),
                    "presented certificate does not issue its predecessor, ignoring rest"
                );
                break;
            }
            if !may_issue_at(cert, path.len()) {
                debug!(
                    subject = cert.subject(),
                    depth = path.len(),
                    "presented issuer may not sign certificates here, ignoring rest"
                );
                break;
            }
            path.push(cert.clone());
        }
        let presented = path.len();

        while path.len() < MAX_CHAIN_DEPTH {
            let Some(top) = path.last() else { break };
            if top.is_self_signed() {
                break;
            }
            match self.store.lookup_issuer(top, self.purpose).await? {
                Some(issuer)
                    if may_issue_at(&issuer, path.len())
                        && !path.iter().any(|c| c.digest() == issuer.digest()) =>
                {
                    debug!(subject = issuer.subject(), "completed chain from store");
                    path.push(issuer);
                }
                _ => break,
            }
        }

        Ok((path, presented))
    }
}

/// Whether `issuer` may sit at `depth` (1 = directly above the leaf).
///
/// `pathLenConstraint` bounds the number of intermediates below the issuer,
/// which is `depth - 1`.
fn may_issue_at(issuer: &Certificate, depth: usize) -> bool {
    if !issuer.can_sign_certificates() {
        return false;
    }
    issuer.path_len_constraint().map_or(true, |max| {
        usize::try_from(max).map_or(true, |max| depth.saturating_sub(1) <= max)
    })
}
