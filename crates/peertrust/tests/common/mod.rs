//! Shared fixtures: a throwaway PKI and a recording certificate handle.

#![allow(dead_code)]

use async_trait::async_trait;
use peertrust::{
    Certificate, CertificateHandle, MemoryTrustStore, PeerChain, Purpose, Rejection, VerifyError,
};
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyPair,
};
use std::sync::Mutex;

pub const SERVER_HOST: &str = "test-server.empathy.gnome.org";
pub const OTHER_HOST: &str = "another.gnome.org";
pub const INVALID_HOST: &str = "invalid.host.name";

/// A root CA and the server certificate it issued.
pub struct Pki {
    pub ca_cert: rcgen::Certificate,
    pub ca_key: KeyPair,
    pub server_cert: rcgen::Certificate,
    pub server_key: KeyPair,
}

impl Pki {
    pub fn new() -> Self {
        Self::with_server_names(&[SERVER_HOST])
    }

    /// Server certificate carries `names` as SAN entries and the first one
    /// as its CN.
    pub fn with_server_names(names: &[&str]) -> Self {
        Self::build(names, Vec::new())
    }

    /// Server certificate for [`SERVER_HOST`] restricted to `usages`.
    pub fn with_server_usages(usages: &[ExtendedKeyUsagePurpose]) -> Self {
        Self::build(&[SERVER_HOST], usages.to_vec())
    }

    fn build(names: &[&str], usages: Vec<ExtendedKeyUsagePurpose>) -> Self {
        let ca_key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
        params.distinguished_name = cn("Empathy Test Certificate Authority");
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        let ca_cert = params.self_signed(&ca_key).unwrap();

        let server_key = KeyPair::generate().unwrap();
        let mut params =
            CertificateParams::new(names.iter().map(|n| (*n).to_string()).collect::<Vec<_>>())
                .unwrap();
        params.distinguished_name = cn(names.first().copied().unwrap_or(SERVER_HOST));
        params.is_ca = IsCa::ExplicitNoCa;
        params.extended_key_usages = usages;
        let server_cert = params.signed_by(&server_key, &ca_cert, &ca_key).unwrap();

        Self {
            ca_cert,
            ca_key,
            server_cert,
            server_key,
        }
    }

    /// A certificate for `host` signed with the server's own key, as if the
    /// server certificate were a CA.
    pub fn forge(&self, host: &str) -> Vec<u8> {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(vec![host.to_string()]).unwrap();
        params.distinguished_name = cn(host);
        params
            .signed_by(&key, &self.server_cert, &self.server_key)
            .unwrap()
            .der()
            .to_vec()
    }

    pub fn ca_der(&self) -> Vec<u8> {
        self.ca_cert.der().to_vec()
    }

    pub fn server_der(&self) -> Vec<u8> {
        self.server_cert.der().to_vec()
    }

    pub fn ca(&self) -> Certificate {
        Certificate::from_der(self.ca_der()).unwrap()
    }

    pub fn server(&self) -> Certificate {
        Certificate::from_der(self.server_der()).unwrap()
    }

    /// Leaf only.
    pub fn leaf_chain(&self) -> PeerChain {
        PeerChain::new("x509", vec![self.server_der()])
    }

    /// Leaf followed by the root.
    pub fn full_chain(&self) -> PeerChain {
        PeerChain::new("x509", vec![self.server_der(), self.ca_der()])
    }

    /// Store with the root anchored for server auth.
    pub fn anchored_store(&self) -> MemoryTrustStore {
        let mut store = MemoryTrustStore::new();
        store.add_anchor(self.ca(), Purpose::ServerAuth);
        store
    }

    /// Store with the server certificate pinned to `peer`.
    pub fn pinned_store(&self, peer: &str) -> MemoryTrustStore {
        let mut store = MemoryTrustStore::new();
        store.add_pin(self.server().digest(), Purpose::ServerAuth, peer);
        store
    }
}

fn cn(name: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, name);
    dn
}

/// Lifecycle of a [`MockHandle`].
#[derive(Debug, Clone, PartialEq)]
pub enum HandleState {
    Pending,
    Accepted,
    Rejected(Vec<Rejection>),
}

/// Certificate handle that records what it was told.
#[derive(Debug)]
pub struct MockHandle {
    state: Mutex<HandleState>,
    calls: Mutex<usize>,
}

impl MockHandle {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HandleState::Pending),
            calls: Mutex::new(0),
        }
    }

    pub fn state(&self) -> HandleState {
        self.state.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn settle(&self, state: HandleState) -> Result<(), VerifyError> {
        *self.calls.lock().unwrap() += 1;
        let mut current = self.state.lock().unwrap();
        if *current != HandleState::Pending {
            return Err(VerifyError::Handle("handle already settled".into()));
        }
        *current = state;
        Ok(())
    }
}

#[async_trait]
impl CertificateHandle for MockHandle {
    async fn accept(&self) -> Result<(), VerifyError> {
        self.settle(HandleState::Accepted)
    }

    async fn reject(&self, rejections: &[Rejection]) -> Result<(), VerifyError> {
        self.settle(HandleState::Rejected(rejections.to_vec()))
    }
}
