// Copyright Relaygate Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod errors;
pub mod store;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use errors::ResolverError;

pub use store::SecretStore;

/// A CA bundle loaded from a secret, used to authenticate the upstream
/// during proxied TLS handshakes.
#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct AuthSslCert {
    /// The `namespace/name` reference of the secret the bundle came from.
    pub secret: String,

    /// Path of the CA bundle on disk, as materialized for the proxy.
    pub ca_file_name: String,

    /// Digest of the CA bundle content.
    pub ca_sha: String,
}

// Two certificates describe the same configuration iff they come from the
// same secret. File name and digest are derived from the secret content and
// are not part of the drift-detection contract.
impl PartialEq for AuthSslCert {
    fn eq(&self, other: &Self) -> bool {
        self.secret == other.secret
    }
}

impl Eq for AuthSslCert {}

impl AuthSslCert {
    pub fn new(
        secret: impl Into<String>,
        ca_file_name: impl Into<String>,
        ca_sha: impl Into<String>,
    ) -> Self {
        AuthSslCert {
            secret: secret.into(),
            ca_file_name: ca_file_name.into(),
            ca_sha: ca_sha.into(),
        }
    }
}

/// Split a `namespace/name` secret reference into its parts.
///
/// References without an explicit namespace are rejected. No namespace is
/// ever inferred on behalf of the caller.
pub fn parse_name_ns(reference: &str) -> Result<(&str, &str), ResolverError> {
    match reference.split_once('/') {
        Some((ns, name)) if !ns.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((ns, name))
        }
        _ => Err(ResolverError::MalformedReference(reference.to_string())),
    }
}

/// Capability to turn a secret reference into a loaded CA bundle.
///
/// Implementations are expected to be fast local lookups. Callers hold the
/// resolver behind this trait so parsers stay deterministic and testable
/// with a substitute implementation.
pub trait AuthCertResolver: Send + Sync {
    fn get_auth_certificate(&self, name: &str) -> Result<AuthSslCert, ResolverError>;
}
