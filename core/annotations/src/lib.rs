// Copyright Relaygate Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod ingress;
pub mod parser;
pub mod proxy_ssl;

pub use ingress::Ingress;
pub use parser::{AnnotationError, IngressAnnotator};
