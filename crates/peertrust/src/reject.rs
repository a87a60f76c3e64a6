//! Rejection taxonomy and the mapping from internal failure points to it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ChainError;
use crate::store::Purpose;

/// Why a peer was not trusted. This set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    /// A chain element failed to parse or declared an unsupported type.
    MalformedCertificate,
    /// No anchor or pin was found. Also used for chains that are merely
    /// incomplete or unknown to the store, not only literal self-signed ones.
    SelfSigned,
    /// Trusted chain, but the leaf matches no reference identity.
    HostnameMismatch,
    /// A certificate on the trusted path is past its `notAfter`.
    Expired,
    /// A certificate on the trusted path is before its `notBefore`.
    NotActivated,
}

impl RejectReason {
    /// Stable machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedCertificate => "malformed-certificate",
            Self::SelfSigned => "self-signed",
            Self::HostnameMismatch => "hostname-mismatch",
            Self::Expired => "expired",
            Self::NotActivated => "not-activated",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form diagnostic detail attached to a rejection.
pub type RejectDetails = BTreeMap<String, Value>;

/// A complete rejection: reason, responsible certificate, and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub reason: RejectReason,
    /// Index of the certificate primarily responsible. Indexes at or past
    /// the presented chain length refer to issuers supplied by the store.
    pub certificate_index: usize,
    /// Human-readable summary.
    pub message: String,
    #[serde(default)]
    pub details: RejectDetails,
}

/// Internal failure points the orchestrator can stop at.
#[derive(Debug, Clone)]
pub(crate) enum Failure {
    Malformed {
        error: ChainError,
        cert_type: String,
    },
    NotAnchored {
        index: usize,
        hostname: String,
    },
    WrongPurpose {
        purpose: Purpose,
        extended_key_usage: Vec<String>,
    },
    NotActivated {
        index: usize,
        not_before: DateTime<Utc>,
    },
    Expired {
        index: usize,
        not_after: DateTime<Utc>,
    },
    IdentityMismatch {
        certificate_identities: Vec<String>,
        reference_identities: Vec<String>,
    },
}

/// Turn a failure point into a [`Rejection`].
pub(crate) fn map_failure(failure: Failure) -> Rejection {
    let mut details = RejectDetails::new();
    let (reason, certificate_index, message) = match failure {
        Failure::Malformed { error, cert_type } => {
            details.insert("certificate-type".into(), json!(cert_type));
            details.insert("error".into(), json!(error.to_string()));
            (
                RejectReason::MalformedCertificate,
                error.index(),
                format!("malformed certificate chain: {error}"),
            )
        }
        Failure::NotAnchored { index, hostname } => {
            details.insert("hostname".into(), json!(hostname));
            (
                RejectReason::SelfSigned,
                index,
                "no trusted anchor or pinned certificate found for the chain".to_string(),
            )
        }
        Failure::WrongPurpose {
            purpose,
            extended_key_usage,
        } => {
            details.insert("purpose".into(), json!(purpose.to_string()));
            details.insert("extended-key-usage".into(), json!(extended_key_usage));
            (
                RejectReason::SelfSigned,
                0,
                format!("leaf certificate is not valid for {purpose}"),
            )
        }
        Failure::NotActivated { index, not_before } => {
            details.insert("not-before".into(), json!(rfc3339(not_before)));
            (
                RejectReason::NotActivated,
                index,
                format!("certificate {index} is not valid before {}", rfc3339(not_before)),
            )
        }
        Failure::Expired { index, not_after } => {
            details.insert("not-after".into(), json!(rfc3339(not_after)));
            (
                RejectReason::Expired,
                index,
                format!("certificate {index} expired at {}", rfc3339(not_after)),
            )
        }
        Failure::IdentityMismatch {
            certificate_identities,
            reference_identities,
        } => {
            details.insert(
                "certificate-identities".into(),
                json!(certificate_identities),
            );
            details.insert("reference-identities".into(), json!(reference_identities));
            (
                RejectReason::HostnameMismatch,
                0,
                "certificate identities match no reference identity".to_string(),
            )
        }
    };

    Rejection {
        reason,
        certificate_index,
        message,
        details,
    }
}

fn rfc3339(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}
