// Copyright Relaygate Contributors
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors for secret resolution.
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("malformed secret reference {0}: expected namespace/name")]
    MalformedReference(String),

    #[error("there is no secret with name {0}")]
    SecretNotFound(String),
}
