// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical ERC-20 event decoders: Transfer and Approval.
//!
//! These events are universal across ERC-20 tokens, so the emitting token
//! itself is the priced asset (`log.sender_address`). When the pricing
//! source has no data for the token, the entry falls back to the sender
//! contract metadata the indexer attached to the log.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{HandlerError, RegistryError};
use crate::handler::{EventHandler, HandlerContext};
use crate::registry::{DecoderKey, DecoderRegistry, ProtocolInfo};
use crate::schema::{EventField, EventSchema};
use crate::types::chain::ChainScope;
use crate::types::event::{
    DecodedAction, EventCategory, EventDetail, EventToken, NormalizedEvent, ProtocolMeta,
};
use crate::types::log::RawLogEvent;
use crate::types::tokens::{TokenAmount, TokenDecimals};

const PROTOCOL: &str = "erc20";

const SUPPORTED_CHAINS: [&str; 7] = [
    "eth-mainnet",
    "avalanche-mainnet",
    "arbitrum-mainnet",
    "optimism-mainnet",
    "matic-mainnet",
    "base-mainnet",
    "bsc-mainnet",
];

/// Register the ERC-20 decoders.
///
/// The catalog aliases here cover generic labels; deployments that label
/// individual token contracts add their names via
/// [`DecoderRegistry::register_protocol`].
pub fn register(registry: &mut DecoderRegistry) -> Result<(), RegistryError> {
    registry.register_protocol(ProtocolInfo::new(PROTOCOL, ["ERC-20", "ERC20", "ERC20 Token"]));

    registry.register(
        DecoderKey::new(PROTOCOL, "Transfer"),
        ChainScope::new(SUPPORTED_CHAINS)?,
        transfer_schema()?,
        Arc::new(TransferHandler),
    )?;
    registry.register(
        DecoderKey::new(PROTOCOL, "Approval"),
        ChainScope::new(SUPPORTED_CHAINS)?,
        approval_schema()?,
        Arc::new(ApprovalHandler),
    )?;
    Ok(())
}

fn protocol_meta(log: &RawLogEvent) -> ProtocolMeta {
    ProtocolMeta {
        logo: log.sender_logo_url.clone(),
        name: log
            .sender_name
            .clone()
            .unwrap_or_else(|| "ERC-20".to_string()),
    }
}

/// Token entry for the emitting contract, priced when possible and built
/// from sender metadata otherwise.
async fn token_entry(
    cx: &HandlerContext<'_>,
    heading: &str,
    amount: TokenAmount,
) -> EventToken {
    let pricing = cx
        .enrichment
        .fetch_price(cx.chain, cx.log.sender_address, cx.tx.price_date())
        .await;
    match &pricing {
        Some(pricing) => EventToken::priced(heading, amount, pricing),
        None => EventToken::unpriced(
            heading,
            amount,
            cx.log.sender_contract_decimals.map(TokenDecimals::new),
            cx.log.sender_contract_ticker_symbol.clone(),
            cx.log.sender_logo_url.clone(),
        ),
    }
}

fn transfer_schema() -> Result<EventSchema, RegistryError> {
    EventSchema::new(
        "Transfer",
        vec![
            EventField::indexed("from", "address"),
            EventField::indexed("to", "address"),
            EventField::new("value", "uint256"),
        ],
    )
}

struct TransferHandler;

#[async_trait]
impl EventHandler for TransferHandler {
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
        let from = cx.decoded.address("from")?;
        let to = cx.decoded.address("to")?;
        let value = TokenAmount::new(cx.decoded.uint("value")?);

        let details = vec![
            EventDetail::address("From", from),
            EventDetail::address("To", to),
        ];
        let token = token_entry(&cx, "Transfer Amount", value).await;

        Ok(NormalizedEvent {
            action: DecodedAction::Transferred,
            category: EventCategory::Token,
            name: "Transfer".to_string(),
            protocol: protocol_meta(cx.log),
            details,
            tokens: vec![token],
        })
    }
}

fn approval_schema() -> Result<EventSchema, RegistryError> {
    EventSchema::new(
        "Approval",
        vec![
            EventField::indexed("owner", "address"),
            EventField::indexed("spender", "address"),
            EventField::new("value", "uint256"),
        ],
    )
}

struct ApprovalHandler;

#[async_trait]
impl EventHandler for ApprovalHandler {
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
        let owner = cx.decoded.address("owner")?;
        let spender = cx.decoded.address("spender")?;
        let value = TokenAmount::new(cx.decoded.uint("value")?);

        let details = vec![
            EventDetail::address("Owner", owner),
            EventDetail::address("Spender", spender),
        ];
        let token = token_entry(&cx, "Approved Amount", value).await;

        Ok(NormalizedEvent {
            action: DecodedAction::Approved,
            category: EventCategory::Token,
            name: "Approval".to_string(),
            protocol: protocol_meta(cx.log),
            details,
            tokens: vec![token],
        })
    }
}
