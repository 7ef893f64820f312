//! The handler seam between the dispatch engine and per-protocol decode
//! bodies.
//!
//! Handlers are interchangeable leaves: each one turns already-decoded event
//! arguments plus transaction context into a [`NormalizedEvent`], requesting
//! pricing enrichment along the way. They are stored by reference in their
//! [`Registration`](crate::Registration) and invoked by the dispatch engine
//! with bounded, read-only inputs.

use async_trait::async_trait;

use crate::enrichment::EnrichmentOrchestrator;
use crate::errors::HandlerError;
use crate::schema::DecodedArgs;
use crate::types::chain::ChainName;
use crate::types::event::NormalizedEvent;
use crate::types::log::{RawLogEvent, TransactionContext};

/// Everything a handler may read while building its event.
///
/// All references are scoped to the current dispatch call; handlers must not
/// retain decoded arguments beyond it.
pub struct HandlerContext<'a> {
    /// Typed arguments decoded from the log by the registered schema
    pub decoded: &'a DecodedArgs,
    /// The raw log, for sender metadata
    pub log: &'a RawLogEvent,
    /// The enclosing transaction
    pub tx: &'a TransactionContext,
    /// Chain the transaction executed on
    pub chain: &'a ChainName,
    /// Orchestrator for concurrent pricing lookups
    pub enrichment: &'a EnrichmentOrchestrator,
}

/// A per-protocol event decode body.
///
/// Implementations are pure with respect to the registry: given the same
/// context and pricing results they produce the same event. Enrichment is
/// the only suspension point, and a missing price must degrade the output
/// (omit price-derived fields) rather than fail it.
///
/// # Example
///
/// ```rust,ignore
/// struct TransferHandler;
///
/// #[async_trait]
/// impl EventHandler for TransferHandler {
///     async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
///         let from = cx.decoded.address("from")?;
///         let to = cx.decoded.address("to")?;
///         // ... enrich, then build the normalized record
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Build a normalized event from decoded arguments and context.
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError>;
}
