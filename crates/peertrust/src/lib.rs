//! # peertrust
//!
//! Decides whether the certificate chain a TLS peer presented is
//! trustworthy for the identities the caller expects.
//!
//! Trust comes from two places: anchored roots that vouch for any peer, and
//! pinned certificates that vouch for exactly one hostname. Names come from
//! the caller's reference identities, never from the connection hostname.
//!
//! ## Data Flow
//!
//! ```text
//! PeerChainSource ──► raw blobs ──► build_chain() ──► CertificateChain
//!                                                         │
//!                         TrustStore ◄── TrustAnchorResolver (pins, then anchors)
//!                                                         │
//!                                         validity window over trusted path
//!                                                         │
//!                                    identity::matches(leaf, references)
//!                                                         │
//!                          VerificationResult ──► CertificateHandle accept/reject
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use peertrust::{MemoryTrustStore, Verifier};
//!
//! # async fn run(chain: Vec<Vec<u8>>) -> peertrust::Result<()> {
//! let store = Arc::new(MemoryTrustStore::new());
//! let verifier = Verifier::new(store);
//! let result = verifier
//!     .verify_async(&chain, "x509", "example.org", &["example.org"])
//!     .await?;
//! println!("accepted: {}", result.is_accepted());
//! # Ok(())
//! # }
//! ```

pub mod certificate;
pub mod chain;
pub mod config;
pub mod error;
pub mod handle;
pub mod hash;
pub mod identity;
pub mod reject;
pub mod resolver;
pub mod store;
pub mod verifier;

pub use certificate::{Certificate, CertificateType, Validity};
pub use chain::{build_chain, CertificateChain, RawCertificate};
pub use config::{Config, PinConfig, TrustConfig, VerifierConfig};
pub use error::{CertificateError, ChainError, ConfigError, Result, StoreError, VerifyError};
pub use handle::{CertificateHandle, PeerChain, PeerChainSource};
pub use hash::CertDigest;
pub use identity::ReferenceIdentities;
pub use reject::{RejectDetails, RejectReason, Rejection};
pub use resolver::{AnchorKind, Resolution, TrustAnchor, TrustAnchorResolver, MAX_CHAIN_DEPTH};
pub use store::{MemoryTrustStore, Purpose, TrustAssertion, TrustStore};
pub use verifier::{VerificationRequest, VerificationResult, Verifier};
