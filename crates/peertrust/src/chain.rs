//! Certificate chain assembly from raw peer-supplied blobs.
//!
//! The chain is taken exactly as presented: leaf first, each following
//! certificate presumed to be the issuer of the one before it. Nothing here
//! checks signatures or requires the chain to reach a root; that is the
//! resolver's job.

use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::slice;

use crate::certificate::{Certificate, CertificateType};
use crate::error::{CertificateError, ChainError};

/// One certificate as it arrived from the peer: bytes plus the type tag it
/// was declared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCertificate {
    pub data: Vec<u8>,
    pub cert_type: String,
}

impl RawCertificate {
    pub fn new(data: impl Into<Vec<u8>>, cert_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            cert_type: cert_type.into(),
        }
    }

    /// Blob declared as `x509`.
    pub fn x509(data: impl Into<Vec<u8>>) -> Self {
        Self::new(data, CertificateType::X509.as_str())
    }
}

/// Ordered, non-empty list of parsed certificates. Index 0 is the leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    certs: Vec<Certificate>,
}

impl CertificateChain {
    /// Wrap already-parsed certificates. Returns `None` for an empty list.
    #[must_use]
    pub fn new(certs: Vec<Certificate>) -> Option<Self> {
        if certs.is_empty() {
            None
        } else {
            Some(Self { certs })
        }
    }

    /// The peer's own certificate.
    #[must_use]
    pub fn leaf(&self) -> &Certificate {
        &self.certs[0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.certs.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Certificate> {
        self.certs.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Certificate> {
        self.certs.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Certificate] {
        &self.certs
    }
}

impl Index<usize> for CertificateChain {
    type Output = Certificate;

    fn index(&self, index: usize) -> &Certificate {
        &self.certs[index]
    }
}

impl<'a> IntoIterator for &'a CertificateChain {
    type Item = &'a Certificate;
    type IntoIter = slice::Iter<'a, Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.certs.iter()
    }
}

/// Parse every blob, in order, into a [`CertificateChain`].
///
/// The first blob that declares an unsupported type or fails to parse aborts
/// the build; the error carries its index.
pub fn build_chain(blobs: &[RawCertificate]) -> Result<CertificateChain, ChainError> {
    let mut certs = Vec::with_capacity(blobs.len());
    for (index, blob) in blobs.iter().enumerate() {
        let cert = parse_blob(blob).map_err(|source| ChainError::Certificate { index, source })?;
        certs.push(cert);
    }
    CertificateChain::new(certs).ok_or(ChainError::Empty)
}

fn parse_blob(blob: &RawCertificate) -> Result<Certificate, CertificateError> {
    let cert_type: CertificateType = blob.cert_type.parse()?;
    Certificate::from_bytes(&blob.data, cert_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};

    fn der(cn: &str) -> Vec<u8> {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(vec![cn.to_string()]).unwrap();
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, cn);
        params.distinguished_name = dn;
        params.self_signed(&key).unwrap().der().to_vec()
    }

    #[test]
    fn single_certificate_is_a_valid_chain() {
        let chain = build_chain(&[RawCertificate::x509(der("leaf.example"))]).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.leaf().common_name(), Some("leaf.example"));
    }

    #[test]
    fn order_is_preserved() {
        let chain = build_chain(&[
            RawCertificate::x509(der("leaf.example")),
            RawCertificate::x509(der("ca.example")),
        ])
        .unwrap();
        assert_eq!(chain[0].common_name(), Some("leaf.example"));
        assert_eq!(chain[1].common_name(), Some("ca.example"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(build_chain(&[]).unwrap_err(), ChainError::Empty);
    }

    #[test]
    fn parse_failure_carries_index() {
        let err = build_chain(&[
            RawCertificate::x509(der("leaf.example")),
            RawCertificate::x509(b"\x30\x03junk".to_vec()),
        ])
        .unwrap_err();
        assert_eq!(err.index(), 1);
        assert!(matches!(
            err,
            ChainError::Certificate {
                source: CertificateError::Der(_),
                ..
            }
        ));
    }

    #[test]
    fn unsupported_type_carries_index() {
        let err = build_chain(&[RawCertificate::new(der("leaf.example"), "openpgp")]).unwrap_err();
        assert_eq!(
            err,
            ChainError::Certificate {
                index: 0,
                source: CertificateError::UnsupportedType("openpgp".into()),
            }
        );
    }
}
