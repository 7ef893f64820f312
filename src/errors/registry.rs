// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for decoder registration.

use crate::types::chain::ChainName;

/// Errors that can occur when populating the decoder registry.
///
/// All variants indicate packaging bugs that surface at process startup,
/// before any dispatch occurs; none of them is recoverable at runtime.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two registrations share the same protocol:event key and their chain
    /// scopes overlap, which would make dispatch ambiguous on the listed
    /// chains. Registrations for the same key are only allowed when their
    /// scopes are disjoint.
    #[error("conflicting registration for {key}: chain scopes overlap on [{}]", overlap_list(.chains))]
    Conflict {
        /// The `protocol:event` key both registrations share
        key: String,
        /// Chains present in both scopes
        chains: Vec<ChainName>,
    },

    /// A registration was attempted with an empty chain scope.
    #[error("chain scope must contain at least one chain")]
    EmptyScope,

    /// A schema failed validation at registration time, e.g. a field type
    /// that does not parse as a Solidity type or more than three indexed
    /// fields.
    #[error("invalid schema for event {event}: {details}")]
    InvalidSchema {
        /// Event name of the rejected schema
        event: String,
        /// Details about the failure
        details: String,
    },
}

impl RegistryError {
    /// Create an `InvalidSchema` error for a specific event.
    pub fn invalid_schema(event: impl Into<String>, details: impl Into<String>) -> Self {
        RegistryError::InvalidSchema {
            event: event.into(),
            details: details.into(),
        }
    }
}

fn overlap_list(chains: &[ChainName]) -> String {
    chains
        .iter()
        .map(ChainName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
