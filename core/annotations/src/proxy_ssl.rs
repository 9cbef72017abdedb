// Copyright Relaygate Contributors
// SPDX-License-Identifier: Apache-2.0

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use relaygate_resolver::{AuthCertResolver, AuthSslCert};

use crate::ingress::Ingress;
use crate::parser::{AnnotationError, IngressAnnotator, get_string_annotation};

const PROXY_SSL_SECRET_ANNOTATION: &str = "proxy-ssl-secret";
const PROXY_SSL_CIPHERS_ANNOTATION: &str = "proxy-ssl-ciphers";
const PROXY_SSL_PROTOCOLS_ANNOTATION: &str = "proxy-ssl-protocols";
const PROXY_SSL_NAME_ANNOTATION: &str = "proxy-ssl-name";
const PROXY_SSL_SERVER_NAME_ANNOTATION: &str = "proxy-ssl-server-name";
const PROXY_SSL_SESSION_REUSE_ANNOTATION: &str = "proxy-ssl-session-reuse";
const PROXY_SSL_VERIFY_ANNOTATION: &str = "proxy-ssl-verify";
const PROXY_SSL_VERIFY_DEPTH_ANNOTATION: &str = "proxy-ssl-verify-depth";

/// Protocol tokens the proxy understands, in canonical ascending order.
/// Normalized protocol strings always list tokens in this order.
const RECOGNIZED_PROTOCOLS: [&str; 6] = [
    "SSLv2", "SSLv3", "TLSv1", "TLSv1.1", "TLSv1.2", "TLSv1.3",
];

pub const DEFAULT_PROXY_SSL_PROTOCOLS: &str = "TLSv1.2 TLSv1.3";
pub const DEFAULT_PROXY_SSL_VERIFY: &str = "off";
pub const DEFAULT_PROXY_SSL_VERIFY_DEPTH: u32 = 1;
pub const DEFAULT_PROXY_SSL_SERVER_NAME: &str = "off";
pub const DEFAULT_PROXY_SSL_SESSION_REUSE: &str = "on";

/// Validated upstream TLS configuration for a routing rule.
///
/// Always fully populated: optional annotations that are absent or carry an
/// unrecognized value are replaced by their defaults, never left unset.
#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct ProxySslConfig {
    /// CA bundle used to authenticate the upstream.
    pub auth_ssl_cert: AuthSslCert,

    /// Cipher list for upstream handshakes. Free-form, passed through.
    pub ciphers: String,

    /// Space-separated protocol tokens, in canonical ascending order.
    pub protocols: String,

    /// SNI name sent to the upstream. May be a templated placeholder.
    pub proxy_ssl_name: String,

    /// Whether to pass the SNI name during the upstream handshake.
    pub proxy_ssl_server_name: String,

    /// Whether upstream TLS sessions may be reused.
    pub proxy_ssl_session_reuse: String,

    /// Whether to verify the upstream certificate.
    pub verify: String,

    /// Maximum upstream certificate chain length to validate.
    pub verify_depth: u32,
}

// Drift detection compares the certificate reference, ciphers, protocols,
// verify, verify depth and the SNI toggle. The SNI name and session-reuse
// toggle do not participate.
impl PartialEq for ProxySslConfig {
    fn eq(&self, other: &Self) -> bool {
        self.auth_ssl_cert == other.auth_ssl_cert
            && self.ciphers == other.ciphers
            && self.protocols == other.protocols
            && self.verify == other.verify
            && self.verify_depth == other.verify_depth
            && self.proxy_ssl_server_name == other.proxy_ssl_server_name
    }
}

impl Eq for ProxySslConfig {}

impl ProxySslConfig {
    /// Structural comparison against a possibly-absent counterpart. Absent
    /// always compares unequal, including against the zero-valued record.
    pub fn equal(&self, other: Option<&ProxySslConfig>) -> bool {
        other.is_some_and(|other| self == other)
    }
}

/// Keep only recognized protocol tokens and re-emit them in canonical
/// order. An input with no recognized token yields the default set.
pub fn normalize_protocols(raw: &str) -> String {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let retained: Vec<&str> = RECOGNIZED_PROTOCOLS
        .iter()
        .copied()
        .filter(|p| tokens.contains(p))
        .collect();

    if retained.is_empty() {
        if !tokens.is_empty() {
            tracing::debug!(value = raw, "no recognized proxy-ssl protocol, using default");
        }
        return DEFAULT_PROXY_SSL_PROTOCOLS.to_string();
    }

    retained.join(" ")
}

/// Accept exactly "on" or "off", anything else takes the given default.
pub fn normalize_on_off(raw: &str, default: &str) -> String {
    match raw {
        "on" | "off" => raw.to_string(),
        _ => {
            if !raw.is_empty() {
                tracing::debug!(value = raw, default, "invalid on/off value, using default");
            }
            default.to_string()
        }
    }
}

/// Parse a non-negative verify depth, falling back to the default on any
/// malformed or negative input.
pub fn normalize_verify_depth(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(depth) => depth,
        Err(_) => {
            if !raw.is_empty() {
                tracing::debug!(value = raw, "invalid proxy-ssl verify depth, using default");
            }
            DEFAULT_PROXY_SSL_VERIFY_DEPTH
        }
    }
}

/// Parses the proxy-ssl-* annotations of a routing rule into a
/// [`ProxySslConfig`], resolving the mandatory secret reference through the
/// injected resolver.
pub struct ProxySslParser<R> {
    resolver: R,
}

impl<R> ProxySslParser<R>
where
    R: AuthCertResolver,
{
    /// Create a new parser with the given secret resolution capability.
    pub fn new(resolver: R) -> Self {
        ProxySslParser { resolver }
    }
}

impl<R> IngressAnnotator for ProxySslParser<R>
where
    R: AuthCertResolver,
{
    // Associated types
    type Output = ProxySslConfig;

    fn parse(&self, ing: &Ingress) -> Result<ProxySslConfig, AnnotationError> {
        // The secret reference is the only mandatory annotation. Its absence
        // or a resolver rejection fails the whole parse.
        let secret = get_string_annotation(ing, PROXY_SSL_SECRET_ANNOTATION)?;
        let auth_ssl_cert = self.resolver.get_auth_certificate(&secret)?;

        // Each optional annotation is validated independently. Invalid
        // values never fail the parse, they take the field default.
        let ciphers = get_string_annotation(ing, PROXY_SSL_CIPHERS_ANNOTATION).unwrap_or_default();

        let protocols = normalize_protocols(
            &get_string_annotation(ing, PROXY_SSL_PROTOCOLS_ANNOTATION).unwrap_or_default(),
        );

        let proxy_ssl_name =
            get_string_annotation(ing, PROXY_SSL_NAME_ANNOTATION).unwrap_or_default();

        let proxy_ssl_server_name = normalize_on_off(
            &get_string_annotation(ing, PROXY_SSL_SERVER_NAME_ANNOTATION).unwrap_or_default(),
            DEFAULT_PROXY_SSL_SERVER_NAME,
        );

        let proxy_ssl_session_reuse = normalize_on_off(
            &get_string_annotation(ing, PROXY_SSL_SESSION_REUSE_ANNOTATION).unwrap_or_default(),
            DEFAULT_PROXY_SSL_SESSION_REUSE,
        );

        let verify = normalize_on_off(
            &get_string_annotation(ing, PROXY_SSL_VERIFY_ANNOTATION).unwrap_or_default(),
            DEFAULT_PROXY_SSL_VERIFY,
        );

        let verify_depth = normalize_verify_depth(
            &get_string_annotation(ing, PROXY_SSL_VERIFY_DEPTH_ANNOTATION).unwrap_or_default(),
        );

        Ok(ProxySslConfig {
            auth_ssl_cert,
            ciphers,
            protocols,
            proxy_ssl_name,
            proxy_ssl_server_name,
            proxy_ssl_session_reuse,
            verify,
            verify_depth,
        })
    }
}
