// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # logsense
//!
//! Decode EVM transaction logs into structured, human-readable events.
//!
//! logsense recognizes which protocol and event produced a raw log, decodes
//! its binary payload into typed fields, enriches the result with off-chain
//! USD pricing data, and emits a normalized record usable by downstream UIs.
//!
//! The crate is organized around a [`DecoderRegistry`] of per-protocol event
//! registrations and a [`DispatchEngine`] that matches each raw log against
//! the registry by its topic0 signature, decodes it with the registered
//! schema, and invokes the registered handler.
//!
//! # Architecture
//!
//! 1. **Registration** happens once at startup: every protocol module adds
//!    its [`EventSchema`]s and handlers to a [`DecoderRegistry`], scoped to
//!    the chains the protocol is deployed on.
//! 2. **Dispatch** happens once per log: the engine resolves the emitting
//!    protocol from the log's sender metadata, matches the leading topic
//!    against the protocol's registered signatures, decodes the payload, and
//!    hands the typed arguments to the handler.
//! 3. **Enrichment** is orchestrated by handlers through the
//!    [`EnrichmentOrchestrator`], which fans out one concurrent pricing
//!    lookup per asset and tolerates partial failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use logsense::{DecoderRegistry, DispatchEngine, EnrichmentOrchestrator};
//!
//! // Startup: build the registry from the bundled protocol modules.
//! let mut registry = DecoderRegistry::new();
//! logsense::protocols::register_all(&mut registry)?;
//!
//! let enrichment = EnrichmentOrchestrator::new(Arc::new(pricing_client));
//! let engine = DispatchEngine::new(Arc::new(registry), enrichment);
//!
//! // Per transaction: each log's outcome is independent.
//! for outcome in engine.dispatch_transaction(&tx).await {
//!     match outcome {
//!         Ok(event) => println!("{}: {}", event.protocol.name, event.name),
//!         Err(e) if e.is_unrecognized() => {} // most logs; expected
//!         Err(e) => eprintln!("skipped log: {e}"),
//!     }
//! }
//! ```

pub mod dispatch;
pub mod enrichment;
pub mod errors;
pub mod handler;
pub mod normalize;
pub mod protocols;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod types;

pub use dispatch::DispatchEngine;
pub use enrichment::{
    AssetPricing, DateRange, EnrichmentOrchestrator, PricePoint, PricingSource, QuoteCurrency,
    TokenPriceRecord,
};
pub use errors::{
    DecodeError, DispatchError, HandlerError, LogsenseError, PricingError, RegistryError,
};
pub use handler::{EventHandler, HandlerContext};
pub use registry::{DecoderKey, DecoderRegistry, ProtocolInfo, Registration};
pub use schema::{DecodedArgs, EventField, EventSchema};
pub use types::chain::{ChainName, ChainScope, ProtocolId};
pub use types::event::{
    DecodedAction, EventCategory, EventDetail, EventToken, NormalizedEvent, ProtocolMeta,
    RenderKind,
};
pub use types::log::{RawLogEvent, TransactionContext};
pub use types::tokens::{NormalizedAmount, TokenAmount, TokenDecimals, TokenPrice, UsdValue};
