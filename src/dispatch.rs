// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The dispatch engine: per-log matching, decoding, and handler invocation.
//!
//! Each log moves through resolving → matched → decoding → enriching →
//! normalized, and can fail out at any step with a typed
//! [`DispatchError`]. The engine is stateless per call and holds no
//! mutable state at all, so one engine can serve concurrent callers.
//!
//! # Failure isolation
//!
//! A transaction's logs are processed sequentially and independently.
//! `Unrecognized` is the expected outcome for most logs (contracts the
//! registry does not cover); a `DecodeFailure` on one log is reported for
//! that log only and never aborts its siblings.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::enrichment::EnrichmentOrchestrator;
use crate::errors::DispatchError;
use crate::handler::HandlerContext;
use crate::registry::DecoderRegistry;
use crate::resolver::resolve_event;
use crate::types::event::NormalizedEvent;
use crate::types::log::{RawLogEvent, TransactionContext};

/// Matches raw logs against the registry and invokes the registered
/// handlers.
///
/// The registry is shared immutably; registration must be complete before
/// the engine is constructed.
pub struct DispatchEngine {
    registry: Arc<DecoderRegistry>,
    enrichment: EnrichmentOrchestrator,
}

impl DispatchEngine {
    /// Create an engine over a populated registry and an enrichment
    /// orchestrator
    pub fn new(registry: Arc<DecoderRegistry>, enrichment: EnrichmentOrchestrator) -> Self {
        Self {
            registry,
            enrichment,
        }
    }

    /// Dispatch a single raw log.
    ///
    /// Steps:
    /// 1. Resolve the emitting protocol from the log's sender name, then
    ///    the event from its topic0 signature. No match →
    ///    [`DispatchError::Unrecognized`].
    /// 2. Look up the registration for `(protocol, event, chain)`. A
    ///    registration existing only for other chains →
    ///    [`DispatchError::UnsupportedChain`].
    /// 3. Decode the log with the registration's schema. Structural
    ///    mismatch → [`DispatchError::DecodeFailure`].
    /// 4. Invoke the handler; its event is passed through untransformed.
    pub async fn dispatch(
        &self,
        log: &RawLogEvent,
        tx: &TransactionContext,
    ) -> Result<NormalizedEvent, DispatchError> {
        // Resolving: sender name → protocol, topic0 → event.
        let sender_name = match log.sender_name.as_deref() {
            Some(name) => name,
            None => return Err(DispatchError::Unrecognized),
        };
        let protocol = match self.registry.resolve_protocol(sender_name) {
            Some(protocol) => protocol.clone(),
            None => return Err(DispatchError::Unrecognized),
        };
        let resolved = resolve_event(log, self.registry.candidates(&protocol));
        let event = match resolved {
            Some(registration) => registration.key().event().to_string(),
            None => return Err(DispatchError::Unrecognized),
        };

        // Matched: the chain-scoped registration for the resolved key.
        let registration = match self.registry.lookup(&protocol, &event, &tx.chain) {
            Some(registration) => registration,
            None => {
                debug!(
                    protocol = %protocol,
                    event = %event,
                    chain = %tx.chain,
                    "Event recognized but not registered for this chain"
                );
                return Err(DispatchError::UnsupportedChain {
                    protocol,
                    event,
                    chain: tx.chain.clone(),
                });
            }
        };

        // Decoding: schema application. Arguments live only for this call.
        let decoded = registration.schema().decode(log).map_err(|source| {
            warn!(
                protocol = %protocol,
                event = %event,
                error = %source,
                "Failed to decode matched log"
            );
            DispatchError::DecodeFailure {
                protocol: protocol.clone(),
                event: event.clone(),
                source,
            }
        })?;

        // Enriching + normalizing happen inside the handler; the engine
        // passes its result through untransformed.
        let cx = HandlerContext {
            decoded: &decoded,
            log,
            tx,
            chain: &tx.chain,
            enrichment: &self.enrichment,
        };
        registration
            .handler()
            .handle(cx)
            .await
            .map_err(|e| DispatchError::Handler {
                protocol,
                event,
                details: e.to_string(),
            })
    }

    /// Dispatch every log of a transaction, in log order.
    ///
    /// Each log's outcome is independent; the returned vector is parallel
    /// to `tx.logs`.
    pub async fn dispatch_transaction(
        &self,
        tx: &TransactionContext,
    ) -> Vec<Result<NormalizedEvent, DispatchError>> {
        let mut outcomes = Vec::with_capacity(tx.logs.len());
        for log in &tx.logs {
            outcomes.push(self.dispatch(log, tx).await);
        }
        let decoded = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        debug!(
            chain = %tx.chain,
            logs = tx.logs.len(),
            decoded,
            "Dispatched transaction logs"
        );
        outcomes
    }
}

impl std::fmt::Debug for DispatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEngine")
            .field("registry", &self.registry)
            .field("enrichment", &self.enrichment)
            .finish()
    }
}
