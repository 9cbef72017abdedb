// Copyright Relaygate Contributors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::errors::ResolverError;
use crate::{AuthCertResolver, AuthSslCert, parse_name_ns};

/// In-memory secret store keyed by full `namespace/name` reference.
///
/// Populated by whatever watches the cluster for secret changes; parsers
/// only read from it through [`AuthCertResolver`].
#[derive(Debug, Default)]
pub struct SecretStore {
    certs: RwLock<HashMap<String, AuthSslCert>>,
}

impl SecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the certificate for a reference.
    pub fn insert(&self, reference: impl Into<String>, cert: AuthSslCert) {
        self.certs.write().insert(reference.into(), cert);
    }

    /// Remove the certificate for a reference, returning it if present.
    pub fn remove(&self, reference: &str) -> Option<AuthSslCert> {
        self.certs.write().remove(reference)
    }

    pub fn len(&self) -> usize {
        self.certs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.certs.read().is_empty()
    }
}

impl AuthCertResolver for SecretStore {
    fn get_auth_certificate(&self, name: &str) -> Result<AuthSslCert, ResolverError> {
        // Reject malformed references before touching the map
        parse_name_ns(name)?;

        self.certs
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ResolverError::SecretNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_cert() -> AuthSslCert {
        AuthSslCert::new("default/demo-secret", "/ssl/ca.crt", "abc")
    }

    #[test]
    fn test_store_hit() {
        let store = SecretStore::new();
        store.insert("default/demo-secret", demo_cert());

        let cert = store.get_auth_certificate("default/demo-secret").unwrap();
        assert_eq!(cert.secret, "default/demo-secret");
        assert_eq!(cert.ca_file_name, "/ssl/ca.crt");
        assert_eq!(cert.ca_sha, "abc");
    }

    #[test]
    fn test_store_miss() {
        let store = SecretStore::new();
        assert!(matches!(
            store.get_auth_certificate("default/unknown"),
            Err(ResolverError::SecretNotFound(_))
        ));
    }

    #[test]
    fn test_store_rejects_malformed_reference() {
        let store = SecretStore::new();
        // Even a stored value is unreachable through a malformed reference
        store.insert("demo-secret", demo_cert());
        assert!(matches!(
            store.get_auth_certificate("demo-secret"),
            Err(ResolverError::MalformedReference(_))
        ));
    }

    #[test]
    fn test_store_remove() {
        let store = SecretStore::new();
        store.insert("default/demo-secret", demo_cert());
        assert_eq!(store.len(), 1);

        assert!(store.remove("default/demo-secret").is_some());
        assert!(store.is_empty());
        assert!(store.get_auth_certificate("default/demo-secret").is_err());
    }
}
