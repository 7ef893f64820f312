// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Core data types for log decoding.
//!
//! This module contains:
//! - Chain and protocol identity types used for registration scoping
//! - Read-only input types for raw logs and transaction context
//! - The normalized output record returned to callers
//! - Token value newtypes used for amount scaling and USD conversion

pub mod chain;
pub mod event;
pub mod log;
pub mod tokens;

pub use chain::{ChainName, ChainScope, ProtocolId};
pub use event::{
    DecodedAction, EventCategory, EventDetail, EventToken, NormalizedEvent, ProtocolMeta,
    RenderKind,
};
pub use log::{RawLogEvent, TransactionContext};
pub use tokens::{NormalizedAmount, TokenAmount, TokenDecimals, TokenPrice, UsdValue};
