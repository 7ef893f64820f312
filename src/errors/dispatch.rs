// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for log dispatch and event handlers.

use super::DecodeError;
use crate::types::chain::{ChainName, ProtocolId};

/// Per-log outcome when dispatch cannot produce a normalized event.
///
/// These are reported per log and never abort processing of sibling logs in
/// the same transaction.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No registration matches the log's signature. This is the expected
    /// outcome for the majority of logs, since most contracts are not in the
    /// registry; callers should skip these silently.
    #[error("no registered decoder recognizes this log")]
    Unrecognized,

    /// The signature matches a known event, but no registration for it
    /// covers the transaction's chain.
    #[error("{protocol}:{event} is not registered for chain {chain}")]
    UnsupportedChain {
        /// Protocol the event belongs to
        protocol: ProtocolId,
        /// Event name that matched by signature
        event: String,
        /// Chain the transaction executed on
        chain: ChainName,
    },

    /// The registered schema could not be applied to the log's topics/data.
    #[error("failed to decode {protocol}:{event}: {source}")]
    DecodeFailure {
        /// Protocol the event belongs to
        protocol: ProtocolId,
        /// Event name that matched by signature
        event: String,
        /// The underlying decode error
        #[source]
        source: DecodeError,
    },

    /// The handler matched and decoded but failed to build an event.
    #[error("handler for {protocol}:{event} failed: {details}")]
    Handler {
        /// Protocol the event belongs to
        protocol: ProtocolId,
        /// Event name that matched by signature
        event: String,
        /// Details about the handler failure
        details: String,
    },
}

impl DispatchError {
    /// Whether this is the expected no-match outcome.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, DispatchError::Unrecognized)
    }
}

/// Errors a handler can return while building a normalized event.
///
/// Handlers mostly fail through their typed accessors on decoded arguments,
/// which produce [`DecodeError`]s; `Invalid` covers everything else.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A typed accessor on the decoded arguments failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The decoded arguments were structurally valid but semantically
    /// unusable for this event.
    #[error("{0}")]
    Invalid(String),
}

impl HandlerError {
    /// Create an `Invalid` error with details.
    pub fn invalid(details: impl Into<String>) -> Self {
        HandlerError::Invalid(details.into())
    }
}
