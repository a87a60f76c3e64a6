//! Matching a leaf certificate's identities against reference identities.
//!
//! Reference identities are supplied by the caller and are the only names
//! checked here; the connection hostname plays no part. That lets a caller
//! accept a certificate issued for an alias while connecting through a
//! different literal hostname.
//!
//! ## Rules
//!
//! - Candidates are the SAN `dNSName` entries, or the subject CN when the
//!   certificate has none.
//! - `*.example.org` matches exactly one extra leftmost label. A bare `*`,
//!   a wildcard anywhere but the whole leftmost label, or a wildcard over a
//!   single remaining label never matches.
//! - DNS comparison is ASCII case-insensitive and ignores one trailing dot.
//! - A reference that parses as an IP address only matches SAN `iPAddress`
//!   entries.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::certificate::Certificate;
use crate::error::VerifyError;

/// Ordered, non-empty list of names acceptable for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ReferenceIdentities(Vec<String>);

impl ReferenceIdentities {
    /// Fails on an empty list or a blank entry; both are caller errors.
    pub fn new<I, S>(identities: I) -> Result<Self, VerifyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identities: Vec<String> = identities.into_iter().map(Into::into).collect();
        if identities.is_empty() {
            return Err(VerifyError::EmptyReferenceIdentities);
        }
        if let Some(pos) = identities.iter().position(|i| i.trim().is_empty()) {
            return Err(VerifyError::EmptyReferenceIdentity(pos));
        }
        Ok(Self(identities))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false once constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<String>> for ReferenceIdentities {
    type Error = VerifyError;

    fn try_from(identities: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(identities)
    }
}

impl From<ReferenceIdentities> for Vec<String> {
    fn from(ids: ReferenceIdentities) -> Self {
        ids.0
    }
}

/// Names the certificate claims, in the form reported in rejection details.
#[must_use]
pub fn certificate_identities(leaf: &Certificate) -> Vec<String> {
    let mut names: Vec<String> = dns_candidates(leaf).map(str::to_string).collect();
    names.extend(leaf.ip_addresses().iter().map(ToString::to_string));
    names
}

/// True iff at least one certificate identity matches at least one
/// reference identity.
#[must_use]
pub fn matches(leaf: &Certificate, references: &ReferenceIdentities) -> bool {
    references.iter().any(|reference| matches_reference(leaf, reference))
}

fn matches_reference(leaf: &Certificate, reference: &str) -> bool {
    if let Ok(ip) = reference.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
        return leaf.ip_addresses().contains(&ip);
    }
    dns_candidates(leaf).any(|pattern| dns_name_matches(pattern, reference))
}

fn dns_candidates(leaf: &Certificate) -> Box<dyn Iterator<Item = &str> + '_> {
    if leaf.dns_names().is_empty() {
        Box::new(leaf.common_name().into_iter())
    } else {
        Box::new(leaf.dns_names().iter().map(String::as_str))
    }
}

/// Compare one certificate name (possibly a wildcard) with one hostname.
#[must_use]
pub fn dns_name_matches(pattern: &str, host: &str) -> bool {
    let pattern = normalize(pattern);
    let host = normalize(host);
    if pattern.is_empty() || host.is_empty() || host.contains('*') {
        return false;
    }

    match pattern.strip_prefix("*.") {
        Some(suffix) => {
            // `*.com` style patterns are too broad to honour.
            if suffix.contains('*') || !suffix.contains('.') {
                return false;
            }
            match host.split_once('.') {
                Some((label, rest)) => !label.is_empty() && rest == suffix,
                None => false,
            }
        }
        None => !pattern.contains('*') && pattern == host,
    }
}

fn normalize(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase()
}
