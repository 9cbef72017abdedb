// Copyright Relaygate Contributors
// SPDX-License-Identifier: Apache-2.0

use relaygate_resolver::errors::ResolverError;
use thiserror::Error;

use crate::ingress::Ingress;

/// Prefix qualifying all relaygate annotation keys.
pub const ANNOTATION_PREFIX: &str = "relaygate.ingress.kubernetes.io";

/// Qualify a bare annotation suffix with the relaygate prefix.
pub fn annotation_with_prefix(suffix: &str) -> String {
    format!("{}/{}", ANNOTATION_PREFIX, suffix)
}

/// Errors for annotation parsing.
#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("ingress rule without annotations")]
    MissingAnnotations,

    #[error("annotation {0} is not present in the ingress rule")]
    MissingAnnotation(String),

    #[error("annotation {name} contains invalid content: {value}")]
    InvalidContent { name: String, value: String },

    #[error("secret resolution error: {0}")]
    SecretResolution(#[from] ResolverError),
}

impl AnnotationError {
    /// True if the error denotes an absent annotation rather than a
    /// present-but-invalid one.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            AnnotationError::MissingAnnotations | AnnotationError::MissingAnnotation(_)
        )
    }
}

/// Read a string annotation by its bare suffix. Absent or empty values are
/// reported as missing.
pub fn get_string_annotation(ing: &Ingress, name: &str) -> Result<String, AnnotationError> {
    if ing.annotations().is_empty() {
        return Err(AnnotationError::MissingAnnotations);
    }

    let key = annotation_with_prefix(name);
    match ing.annotations().get(&key) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(AnnotationError::MissingAnnotation(name.to_string())),
    }
}

/// Read an integer annotation by its bare suffix.
pub fn get_int_annotation(ing: &Ingress, name: &str) -> Result<i32, AnnotationError> {
    let raw = get_string_annotation(ing, name)?;
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AnnotationError::InvalidContent {
            name: name.to_string(),
            value: raw,
        })
}

/// An annotation parser producing a typed configuration from an ingress
/// rule. Constructed with whatever capabilities it needs injected; holds no
/// mutable state of its own.
pub trait IngressAnnotator {
    // Associated types
    type Output;

    /// Parse the annotations of the ingress rule into a validated
    /// configuration, or fail with a descriptive error.
    fn parse(&self, ing: &Ingress) -> Result<Self::Output, AnnotationError>;
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn build_ingress(data: &[(&str, &str)]) -> Ingress {
        let mut annotations = BTreeMap::new();
        for (name, value) in data {
            annotations.insert(annotation_with_prefix(name), value.to_string());
        }
        Ingress::new("foo", "default").with_annotations(annotations)
    }

    #[test]
    fn test_annotation_with_prefix() {
        assert_eq!(
            annotation_with_prefix("proxy-ssl-secret"),
            "relaygate.ingress.kubernetes.io/proxy-ssl-secret"
        );
    }

    #[test]
    fn test_get_string_annotation() {
        let ing = build_ingress(&[("proxy-ssl-ciphers", "HIGH:-SHA")]);
        assert_eq!(
            get_string_annotation(&ing, "proxy-ssl-ciphers").unwrap(),
            "HIGH:-SHA"
        );
    }

    #[test]
    fn test_get_string_annotation_missing() {
        let ing = build_ingress(&[("proxy-ssl-ciphers", "HIGH:-SHA")]);
        let err = get_string_annotation(&ing, "proxy-ssl-name").unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_get_string_annotation_no_annotations() {
        let ing = Ingress::new("foo", "default");
        let err = get_string_annotation(&ing, "proxy-ssl-ciphers").unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_get_string_annotation_empty_value() {
        let ing = build_ingress(&[("proxy-ssl-ciphers", "")]);
        let err = get_string_annotation(&ing, "proxy-ssl-ciphers").unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_get_int_annotation() {
        let ing = build_ingress(&[("proxy-ssl-verify-depth", "3")]);
        assert_eq!(get_int_annotation(&ing, "proxy-ssl-verify-depth").unwrap(), 3);
    }

    #[test]
    fn test_get_int_annotation_invalid() {
        let ing = build_ingress(&[("proxy-ssl-verify-depth", "abcd")]);
        let err = get_int_annotation(&ing, "proxy-ssl-verify-depth").unwrap_err();
        assert!(!err.is_missing());
        assert!(matches!(err, AnnotationError::InvalidContent { .. }));
    }
}
