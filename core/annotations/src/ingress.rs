// Copyright Relaygate Contributors
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Object metadata for a routing rule. Only the fields the annotation
/// parsers read are modeled here.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, JsonSchema)]
pub struct Metadata {
    pub name: String,
    pub namespace: String,

    /// Free-form configuration directives attached to the object.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// A routing rule carrying annotations for the annotation parsers.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, JsonSchema)]
pub struct Ingress {
    pub metadata: Metadata,
}

impl Ingress {
    /// Create a new Ingress with the given name and namespace.
    pub fn new(name: &str, namespace: &str) -> Self {
        Ingress {
            metadata: Metadata {
                name: name.to_string(),
                namespace: namespace.to_string(),
                annotations: BTreeMap::new(),
            },
        }
    }

    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.metadata.annotations = annotations;
        self
    }

    pub fn set_annotations(&mut self, annotations: BTreeMap<String, String>) {
        self.metadata.annotations = annotations;
    }

    /// Get the annotation map
    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.metadata.annotations
    }

    /// Get the namespace of the object
    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }
}
