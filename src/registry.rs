// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The decoder registry: every protocol's event registrations, keyed by
//! protocol+event identity and scoped to chains.
//!
//! The registry is populated once at startup by an explicit initialization
//! step (see [`protocols::register_all`](crate::protocols::register_all))
//! and is effectively immutable afterwards, so concurrent lookups from the
//! dispatch engine need no locking — share it behind an `Arc`.
//!
//! # Uniqueness invariant
//!
//! The same `protocol:event` key may be registered multiple times only when
//! the registrations' chain scopes are disjoint. [`DecoderRegistry::register`]
//! enforces this with [`RegistryError::Conflict`], so for any
//! `(protocol, event, chain)` triple at most one registration can match.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::B256;
use tracing::debug;

use crate::errors::RegistryError;
use crate::handler::EventHandler;
use crate::schema::EventSchema;
use crate::types::chain::{ChainName, ChainScope, ProtocolId};

/// Composite identity of a decoder registration: `protocol:event`.
///
/// # Examples
///
/// ```
/// use logsense::DecoderKey;
///
/// let key = DecoderKey::new("aave-v3", "Borrow");
/// assert_eq!(key.to_string(), "aave-v3:Borrow");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecoderKey {
    protocol: ProtocolId,
    event: String,
}

impl DecoderKey {
    /// Create a key from a protocol id and event name
    pub fn new(protocol: impl Into<ProtocolId>, event: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            event: event.into(),
        }
    }

    /// Protocol half of the key
    pub fn protocol(&self) -> &ProtocolId {
        &self.protocol
    }

    /// Event-name half of the key
    pub fn event(&self) -> &str {
        &self.event
    }
}

impl std::fmt::Display for DecoderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.protocol, self.event)
    }
}

/// One immutable decoder registration.
///
/// Owned exclusively by the registry; the dispatch engine borrows it for
/// the duration of one dispatch call.
pub struct Registration {
    key: DecoderKey,
    scope: ChainScope,
    schema: EventSchema,
    signature: B256,
    handler: Arc<dyn EventHandler>,
}

impl Registration {
    /// Registration identity
    pub fn key(&self) -> &DecoderKey {
        &self.key
    }

    /// Chains this registration serves
    pub fn scope(&self) -> &ChainScope {
        &self.scope
    }

    /// Schema used to decode matching logs
    pub fn schema(&self) -> &EventSchema {
        &self.schema
    }

    /// Precomputed signature hash, matched against topic0
    pub fn signature(&self) -> B256 {
        self.signature
    }

    /// The decode body invoked for matching logs
    pub fn handler(&self) -> &Arc<dyn EventHandler> {
        &self.handler
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("scope", &self.scope)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Descriptor for a protocol known to the registry.
///
/// `sender_aliases` are the contract display names the upstream indexer
/// attaches to logs of this protocol; they are matched case-insensitively
/// during dispatch to resolve a log to its protocol.
#[derive(Debug, Clone)]
pub struct ProtocolInfo {
    /// Protocol id, e.g. `aave-v3`
    pub id: ProtocolId,
    /// Sender display names that map to this protocol
    pub sender_aliases: Vec<String>,
}

impl ProtocolInfo {
    /// Create a protocol descriptor
    pub fn new<I, S>(id: impl Into<ProtocolId>, sender_aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            sender_aliases: sender_aliases.into_iter().map(Into::into).collect(),
        }
    }
}

/// Append-only store of decoder registrations plus the protocol catalog
/// used to resolve log senders to protocols.
#[derive(Default)]
pub struct DecoderRegistry {
    /// All registrations, in insertion order
    registrations: Vec<Registration>,
    /// Registration indices per protocol, in insertion order
    by_protocol: HashMap<ProtocolId, Vec<usize>>,
    /// Lowercased sender alias → protocol id
    aliases: HashMap<String, ProtocolId>,
}

impl DecoderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a protocol to the catalog, making its sender aliases resolvable.
    ///
    /// Later registrations win when two protocols claim the same alias.
    pub fn register_protocol(&mut self, info: ProtocolInfo) {
        for alias in &info.sender_aliases {
            self.aliases
                .insert(alias.to_lowercase(), info.id.clone());
        }
    }

    /// Insert a registration.
    ///
    /// Fails with [`RegistryError::Conflict`] if an existing registration
    /// shares the key and its chain scope intersects the new scope, which
    /// would make dispatch ambiguous on the shared chains.
    pub fn register(
        &mut self,
        key: DecoderKey,
        scope: ChainScope,
        schema: EventSchema,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), RegistryError> {
        for existing in &self.registrations {
            if existing.key == key && existing.scope.intersects(&scope) {
                return Err(RegistryError::Conflict {
                    key: key.to_string(),
                    chains: existing.scope.intersection(&scope),
                });
            }
        }

        let signature = schema.signature_hash();
        debug!(
            key = %key,
            scope = %scope,
            signature = %signature,
            "Registered event decoder"
        );

        let index = self.registrations.len();
        self.by_protocol
            .entry(key.protocol().clone())
            .or_default()
            .push(index);
        self.registrations.push(Registration {
            key,
            scope,
            schema,
            signature,
            handler,
        });
        Ok(())
    }

    /// The single registration matching `(protocol, event, chain)`, if any.
    ///
    /// By the conflict invariant at most one registration can match.
    pub fn lookup(
        &self,
        protocol: &ProtocolId,
        event: &str,
        chain: &ChainName,
    ) -> Option<&Registration> {
        self.candidates(protocol)
            .find(|reg| reg.key.event() == event && reg.scope.contains(chain))
    }

    /// All registrations for `protocol`, in insertion order.
    ///
    /// The signature resolver iterates these to find which event a log's
    /// topic0 corresponds to.
    pub fn candidates(&self, protocol: &ProtocolId) -> impl Iterator<Item = &Registration> {
        self.by_protocol
            .get(protocol)
            .into_iter()
            .flatten()
            .map(|&index| &self.registrations[index])
    }

    /// Resolve a log sender's display name to a protocol id
    pub fn resolve_protocol(&self, sender_name: &str) -> Option<&ProtocolId> {
        self.aliases.get(&sender_name.to_lowercase())
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether the registry has no registrations
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("registrations", &self.registrations.len())
            .field("protocols", &self.by_protocol.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::errors::HandlerError;
    use crate::handler::{EventHandler, HandlerContext};
    use crate::schema::EventField;
    use crate::types::event::NormalizedEvent;

    struct NoopHandler;

    #[async_trait]
    impl EventHandler for NoopHandler {
        async fn handle(
            &self,
            _cx: HandlerContext<'_>,
        ) -> Result<NormalizedEvent, HandlerError> {
            unreachable!("registry tests never dispatch")
        }
    }

    fn swap_schema() -> EventSchema {
        EventSchema::new(
            "Swap",
            vec![
                EventField::indexed("sender", "address"),
                EventField::new("amount", "uint256"),
            ],
        )
        .unwrap()
    }

    fn register_swap(
        registry: &mut DecoderRegistry,
        chains: &[&str],
    ) -> Result<(), RegistryError> {
        registry.register(
            DecoderKey::new("dex", "Swap"),
            ChainScope::new(chains.iter().copied()).unwrap(),
            swap_schema(),
            Arc::new(NoopHandler),
        )
    }

    #[test]
    fn test_disjoint_scopes_coexist() {
        let mut registry = DecoderRegistry::new();
        register_swap(&mut registry, &["eth-mainnet"]).unwrap();
        register_swap(&mut registry, &["matic-mainnet"]).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_overlapping_scope_conflicts() {
        let mut registry = DecoderRegistry::new();
        register_swap(&mut registry, &["eth-mainnet"]).unwrap();
        register_swap(&mut registry, &["matic-mainnet"]).unwrap();

        let err = register_swap(&mut registry, &["eth-mainnet"]).unwrap_err();
        match err {
            RegistryError::Conflict { key, chains } => {
                assert_eq!(key, "dex:Swap");
                assert_eq!(chains, vec![ChainName::from("eth-mainnet")]);
            }
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_overlap_conflicts() {
        let mut registry = DecoderRegistry::new();
        register_swap(&mut registry, &["eth-mainnet", "base-mainnet"]).unwrap();
        // Overlaps on base-mainnet only, still rejected
        let err = register_swap(&mut registry, &["base-mainnet", "avalanche-mainnet"]);
        assert!(matches!(err, Err(RegistryError::Conflict { .. })));
    }

    #[test]
    fn test_same_event_different_protocols() {
        let mut registry = DecoderRegistry::new();
        register_swap(&mut registry, &["eth-mainnet"]).unwrap();
        registry
            .register(
                DecoderKey::new("other-dex", "Swap"),
                ChainScope::single("eth-mainnet"),
                swap_schema(),
                Arc::new(NoopHandler),
            )
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_lookup_respects_chain() {
        let mut registry = DecoderRegistry::new();
        register_swap(&mut registry, &["eth-mainnet"]).unwrap();

        let dex = ProtocolId::from("dex");
        assert!(registry
            .lookup(&dex, "Swap", &ChainName::from("eth-mainnet"))
            .is_some());
        assert!(registry
            .lookup(&dex, "Swap", &ChainName::from("matic-mainnet"))
            .is_none());
        assert!(registry
            .lookup(&dex, "Burn", &ChainName::from("eth-mainnet"))
            .is_none());
    }

    #[test]
    fn test_lookup_selects_scope_matching_registration() {
        let mut registry = DecoderRegistry::new();
        register_swap(&mut registry, &["eth-mainnet"]).unwrap();
        register_swap(&mut registry, &["matic-mainnet"]).unwrap();

        let dex = ProtocolId::from("dex");
        let reg = registry
            .lookup(&dex, "Swap", &ChainName::from("matic-mainnet"))
            .unwrap();
        assert!(reg.scope().contains(&ChainName::from("matic-mainnet")));
    }

    #[test]
    fn test_protocol_alias_resolution() {
        let mut registry = DecoderRegistry::new();
        registry.register_protocol(ProtocolInfo::new("aave-v3", ["Aave V3", "AAVE-V3"]));

        assert_eq!(
            registry.resolve_protocol("aave v3"),
            Some(&ProtocolId::from("aave-v3"))
        );
        assert_eq!(
            registry.resolve_protocol("AAVE-v3"),
            Some(&ProtocolId::from("aave-v3"))
        );
        assert!(registry.resolve_protocol("Compound").is_none());
    }

    #[test]
    fn test_candidates_in_insertion_order() {
        let mut registry = DecoderRegistry::new();
        register_swap(&mut registry, &["eth-mainnet"]).unwrap();
        register_swap(&mut registry, &["matic-mainnet"]).unwrap();

        let dex = ProtocolId::from("dex");
        let scopes: Vec<_> = registry
            .candidates(&dex)
            .map(|reg| reg.scope().clone())
            .collect();
        assert_eq!(scopes.len(), 2);
        assert!(scopes[0].contains(&ChainName::from("eth-mainnet")));
        assert!(scopes[1].contains(&ChainName::from("matic-mainnet")));
    }
}
