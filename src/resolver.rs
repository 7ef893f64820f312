// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Signature resolution: matching a raw log's leading topic against
//! registered event signatures.
//!
//! The dispatch engine does not need to know a log's event name up front.
//! It iterates the registrations of the log's emitting protocol and finds
//! the one whose precomputed signature hash equals `topics[0]`.
//!
//! # Tie-break policy
//!
//! If multiple registrations under the same protocol carry the same
//! signature hash (legitimate for overloaded names across protocol
//! versions), the first one in registration order wins. This is a
//! deliberate, deterministic policy rather than an error: genuine
//! collisions are rare and protocol-scoped, and registration order is
//! fixed at startup.

use crate::registry::Registration;
use crate::types::log::RawLogEvent;

/// Find the first registration (in registration order) whose signature
/// matches the log's topic0.
///
/// Logs without topics carry no signature and never match.
pub fn resolve_event<'a>(
    log: &RawLogEvent,
    mut candidates: impl Iterator<Item = &'a Registration>,
) -> Option<&'a Registration> {
    let topic0 = log.topic0()?;
    candidates.find(|reg| reg.signature() == *topic0)
}
